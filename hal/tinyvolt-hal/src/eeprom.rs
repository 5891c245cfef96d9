//! EEPROM storage abstraction
//!
//! A flat byte-addressed persistent block. The calibration store in
//! `tinyvolt-core` layers slot management and integrity checking on top;
//! implementations only move bytes.

/// Errors from EEPROM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError {
    /// Access outside the device's capacity
    OutOfBounds,
    /// The underlying write or read failed
    Io,
}

/// Byte-addressed persistent storage
pub trait Eeprom {
    /// Total capacity in bytes
    fn capacity(&self) -> usize;

    /// Read `buf.len()` bytes starting at `offset`
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), EepromError>;

    /// Write `data` starting at `offset`
    ///
    /// The write is not assumed atomic; power loss may leave any prefix of
    /// `data` committed. Callers needing atomicity must layer it above.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError>;
}

/// Placeholder for builds without persistent storage
///
/// Every access fails, so a store layered on top falls back to its factory
/// defaults. Used where the calibration record is session-only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEeprom;

impl Eeprom for NoEeprom {
    fn capacity(&self) -> usize {
        0
    }

    fn read(&mut self, _offset: usize, _buf: &mut [u8]) -> Result<(), EepromError> {
        Err(EepromError::OutOfBounds)
    }

    fn write(&mut self, _offset: usize, _data: &[u8]) -> Result<(), EepromError> {
        Err(EepromError::OutOfBounds)
    }
}
