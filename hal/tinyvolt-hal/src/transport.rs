//! Serial transport abstraction
//!
//! Commands arrive and responses leave through a single byte-oriented
//! transport. On real hardware the receive side is typically fed by an
//! interrupt into a small buffer; the trait only exposes the non-blocking
//! pull the dispatcher needs.

/// Byte transport for the command interface
///
/// `read_byte` must never block: the main loop polls it and yields between
/// bytes. `write_bytes` may block until the data has been handed to the
/// hardware.
pub trait Transport {
    /// Error type for transport operations
    type Error;

    /// Read the next received byte, if one is available
    ///
    /// Returns `Ok(None)` when no byte is pending (would block).
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Write data to the transport
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}
