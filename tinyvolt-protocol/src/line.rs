//! Line accumulation for the command stream
//!
//! Bytes arrive one at a time from the transport; the reader collects them
//! until a CR or LF terminator and hands back the completed line. A line
//! longer than [`MAX_LINE_LEN`] is an error, not a crash: the overlong input
//! is discarded through its terminator and the reader resumes cleanly.

use heapless::Vec;

/// Maximum accepted command line length, terminator excluded
///
/// Generous for the vocabulary: the longest token (`INC`, `L<n>`) is three
/// bytes.
pub const MAX_LINE_LEN: usize = 16;

/// A completed command line, terminator stripped
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors from line accumulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Input exceeded [`MAX_LINE_LEN`] before a terminator arrived
    TooLong,
}

/// State machine accumulating transport bytes into command lines
#[derive(Debug, Clone, Default)]
pub struct LineReader {
    buffer: Line,
    /// Discarding an overlong line until its terminator
    discarding: bool,
    /// A CR just completed a line; swallow one following LF
    swallow_lf: bool,
}

impl LineReader {
    /// Create a new line reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the reader, dropping any partial input
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
        self.swallow_lf = false;
    }

    /// Feed a single byte from the transport
    ///
    /// Returns `Ok(Some(line))` when a non-empty line is complete,
    /// `Ok(None)` when more bytes are needed (empty lines are skipped), or
    /// `Err(LineError::TooLong)` once per overlong line. After the error the
    /// reader keeps discarding until the terminator, then accepts input
    /// again.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if self.swallow_lf {
            self.swallow_lf = false;
            if byte == b'\n' {
                return Ok(None);
            }
        }

        match byte {
            b'\r' | b'\n' => {
                self.swallow_lf = byte == b'\r';
                if self.discarding {
                    self.discarding = false;
                    return Ok(None);
                }
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = self.buffer.clone();
                self.buffer.clear();
                Ok(Some(line))
            }
            _ if self.discarding => Ok(None),
            _ => {
                if self.buffer.push(byte).is_err() {
                    self.buffer.clear();
                    self.discarding = true;
                    return Err(LineError::TooLong);
                }
                Ok(None)
            }
        }
    }
}
