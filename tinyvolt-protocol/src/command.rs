//! Command vocabulary
//!
//! A completed line is classified into exactly one [`Command`] token by
//! exact match against the compiled vocabulary. Token spellings are fixed
//! for the life of a firmware image; case matters.

use crate::verbosity::VerbosityLevel;

/// A parsed command token
///
/// Created by [`Command::parse`], consumed exactly once by the dispatcher.
/// Whether the device honors a token is decided by the compiled feature set,
/// not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `+` / `INC`: step the working value up
    Increment,
    /// `-` / `DEC`: step the working value down
    Decrement,
    /// `C`: report the working value as a raw code
    ReportCode,
    /// `V`: sample and report in calibrated units
    ReportVolts,
    /// `Z`: capture the zero-point sample
    CalibrateZero,
    /// `F`: capture the full-scale sample
    CalibrateFullScale,
    /// `D`: dump the calibration record and verbosity level
    DumpState,
    /// `L<n>`: set the verbosity level
    SetVerbosity(VerbosityLevel),
}

/// Errors from command classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The line matches no token in the vocabulary
    UnknownCommand,
    /// A recognized token with a missing or malformed argument
    InvalidArgument,
}

impl Command {
    /// Classify a completed line into a command token
    pub fn parse(line: &[u8]) -> Result<Self, ParseError> {
        match line {
            b"+" | b"INC" => Ok(Command::Increment),
            b"-" | b"DEC" => Ok(Command::Decrement),
            b"C" => Ok(Command::ReportCode),
            b"V" => Ok(Command::ReportVolts),
            b"Z" => Ok(Command::CalibrateZero),
            b"F" => Ok(Command::CalibrateFullScale),
            b"D" => Ok(Command::DumpState),
            [b'L', rest @ ..] => match rest {
                [digit] => VerbosityLevel::from_digit(*digit)
                    .map(Command::SetVerbosity)
                    .ok_or(ParseError::InvalidArgument),
                _ => Err(ParseError::InvalidArgument),
            },
            _ => Err(ParseError::UnknownCommand),
        }
    }
}
