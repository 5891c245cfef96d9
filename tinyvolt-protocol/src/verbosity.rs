//! Verbosity levels for device output
//!
//! The level is ordered: everything at or below the configured level is
//! emitted, everything above is suppressed before formatting so disabled
//! output costs no transport bandwidth.

/// Output verbosity, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum VerbosityLevel {
    /// No output at all
    Silent = 0,
    /// Error responses only
    Error = 1,
    /// Error and success responses
    #[default]
    Success = 2,
    /// Everything, including per-command debug lines
    Debug = 3,
}

impl VerbosityLevel {
    /// Parse a level from its ASCII digit (the `L<n>` argument)
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            b'0' => Some(VerbosityLevel::Silent),
            b'1' => Some(VerbosityLevel::Error),
            b'2' => Some(VerbosityLevel::Success),
            b'3' => Some(VerbosityLevel::Debug),
            _ => None,
        }
    }

    /// The level as its protocol digit
    pub fn as_digit(self) -> u8 {
        b'0' + self as u8
    }
}
