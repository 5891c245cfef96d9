//! Response formatting
//!
//! Every dispatched command produces exactly one [`Response`]. Whether the
//! rendered text is actually transmitted is the dispatcher's decision (print
//! flags and verbosity); this module only formats.

use core::fmt::Write;

use heapless::String;

use crate::verbosity::VerbosityLevel;

/// Maximum rendered response length, CRLF included
pub const MAX_RESPONSE_LEN: usize = 48;

/// The full error taxonomy surfaced over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// The line matched no token in the vocabulary
    UnknownCommand,
    /// The token exists but is not compiled into this image
    UnsupportedCommand,
    /// A recognized token with a malformed argument
    InvalidArgument,
    /// The line overran the input buffer before its terminator
    InputTooLong,
    /// A calibration flow is already underway
    CalibrationInProgress,
    /// The ADC could not supply a sample
    SampleUnavailable,
    /// The captured points would produce a zero or inverted scale factor
    InvalidCalibration,
    /// The record could not be persisted (it remains active in memory)
    StorageFailure,
}

impl CommandError {
    /// The reason token printed after `ERR:`
    pub fn as_str(self) -> &'static str {
        match self {
            CommandError::UnknownCommand => "UNKNOWN_COMMAND",
            CommandError::UnsupportedCommand => "UNSUPPORTED_COMMAND",
            CommandError::InvalidArgument => "INVALID_ARGUMENT",
            CommandError::InputTooLong => "INPUT_TOO_LONG",
            CommandError::CalibrationInProgress => "CALIBRATION_IN_PROGRESS",
            CommandError::SampleUnavailable => "SAMPLE_UNAVAILABLE",
            CommandError::InvalidCalibration => "INVALID_CALIBRATION",
            CommandError::StorageFailure => "STORAGE_FAILURE",
        }
    }
}

/// Success payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Payload {
    /// A single reported value (raw code or calibrated units)
    Value(i32),
    /// Full state dump: calibration record plus verbosity level
    Dump {
        zero_offset: i16,
        gain_units: i32,
        gain_span: u16,
        level: VerbosityLevel,
    },
}

/// Outcome of one dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Command succeeded, optionally carrying a payload
    Ok(Option<Payload>),
    /// Command failed; state is unchanged unless documented otherwise
    Err(CommandError),
}

impl Response {
    /// Render the wire text for this response
    pub fn render(&self) -> String<MAX_RESPONSE_LEN> {
        let mut out = String::new();
        // The buffer is sized for the largest dump; formatting cannot fail.
        let _ = match self {
            Response::Ok(None) => write!(out, "OK\r\n"),
            Response::Ok(Some(Payload::Value(v))) => write!(out, "OK:{}\r\n", v),
            Response::Ok(Some(Payload::Dump {
                zero_offset,
                gain_units,
                gain_span,
                level,
            })) => write!(
                out,
                "OK:Z={} G={}/{} L={}\r\n",
                zero_offset,
                gain_units,
                gain_span,
                (level.as_digit() - b'0')
            ),
            Response::Err(e) => write!(out, "ERR:{}\r\n", e.as_str()),
        };
        out
    }

    /// True for the success variant
    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok(_))
    }
}
