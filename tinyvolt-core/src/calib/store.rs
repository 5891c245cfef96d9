//! Persistent calibration store
//!
//! Keeps the committed record across power loss in two ping-pong EEPROM
//! slots. Every save goes to the slot NOT holding the newest valid record,
//! tagged with an incrementing sequence number and a CRC32 over the
//! serialized bytes. A write torn by power loss can only corrupt the stale
//! slot, so the previously committed record still loads; atomicity comes
//! from the layout, not from the EEPROM.

use serde::{Deserialize, Serialize};
use tinyvolt_hal::Eeprom;

use super::record::CalibrationRecord;

/// Magic number identifying a Tinyvolt calibration slot ("TVC1")
pub const STORE_MAGIC: u32 = 0x5456_4331;

/// Current slot format version
pub const STORE_VERSION: u8 = 1;

/// Bytes reserved per slot (serialized record plus CRC, with headroom)
pub const SLOT_LEN: usize = 32;

/// Number of ping-pong slots
pub const SLOT_COUNT: usize = 2;

/// EEPROM capacity the store requires
pub const REQUIRED_CAPACITY: usize = SLOT_LEN * SLOT_COUNT;

/// Errors from store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// The EEPROM rejected the access or is too small
    Storage,
    /// The record did not serialize into a slot
    Encoding,
}

/// One serialized slot, CRC excluded
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct StoredRecord {
    magic: u32,
    version: u8,
    seq: u32,
    record: CalibrationRecord,
}

/// Slot bookkeeping for load/save cycles
///
/// `load` decides which slot holds the newest valid record; `save` writes
/// the other one. The store holds no record itself; the engine's copy is
/// canonical.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationStore {
    next_seq: u32,
    next_slot: usize,
}

impl Default for CalibrationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CalibrationStore {
    /// Create a store; call [`load`](Self::load) before saving
    pub const fn new() -> Self {
        Self {
            next_seq: 1,
            next_slot: 0,
        }
    }

    /// Load the newest valid record, or the fallback if none validates
    pub fn load<E: Eeprom>(
        &mut self,
        eeprom: &mut E,
        fallback: CalibrationRecord,
    ) -> CalibrationRecord {
        let mut newest: Option<(u32, usize, CalibrationRecord)> = None;

        for slot in 0..SLOT_COUNT {
            if let Some((seq, record)) = read_slot(eeprom, slot) {
                let newer = match newest {
                    Some((best_seq, _, _)) => seq_newer(seq, best_seq),
                    None => true,
                };
                if newer {
                    newest = Some((seq, slot, record));
                }
            }
        }

        match newest {
            Some((seq, slot, record)) => {
                self.next_seq = seq.wrapping_add(1);
                self.next_slot = (slot + 1) % SLOT_COUNT;
                record
            }
            None => {
                self.next_seq = 1;
                self.next_slot = 0;
                fallback
            }
        }
    }

    /// Persist the record to the stale slot
    pub fn save<E: Eeprom>(
        &mut self,
        eeprom: &mut E,
        record: &CalibrationRecord,
    ) -> Result<(), StoreError> {
        if eeprom.capacity() < REQUIRED_CAPACITY {
            return Err(StoreError::Storage);
        }

        let stored = StoredRecord {
            magic: STORE_MAGIC,
            version: STORE_VERSION,
            seq: self.next_seq,
            record: *record,
        };

        let mut buf = [0u8; SLOT_LEN];
        let used = postcard::to_slice(&stored, &mut buf[..SLOT_LEN - 4])
            .map_err(|_| StoreError::Encoding)?
            .len();
        let crc = crc32(&buf[..used]);
        buf[used..used + 4].copy_from_slice(&crc.to_le_bytes());

        eeprom
            .write(self.next_slot * SLOT_LEN, &buf[..used + 4])
            .map_err(|_| StoreError::Storage)?;

        self.next_seq = self.next_seq.wrapping_add(1);
        self.next_slot = (self.next_slot + 1) % SLOT_COUNT;
        Ok(())
    }
}

/// Read and validate one slot
fn read_slot<E: Eeprom>(eeprom: &mut E, slot: usize) -> Option<(u32, CalibrationRecord)> {
    let mut buf = [0u8; SLOT_LEN];
    eeprom.read(slot * SLOT_LEN, &mut buf).ok()?;

    let (stored, rest) = postcard::take_from_bytes::<StoredRecord>(&buf).ok()?;
    if rest.len() < 4 {
        return None;
    }
    let used = SLOT_LEN - rest.len();
    let crc = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
    if crc != crc32(&buf[..used]) {
        return None;
    }
    if stored.magic != STORE_MAGIC || stored.version != STORE_VERSION {
        return None;
    }
    if !stored.record.is_valid() {
        return None;
    }
    Some((stored.seq, stored.record))
}

/// Wrapping sequence comparison: is `a` newer than `b`?
fn seq_newer(a: u32, b: u32) -> bool {
    a != b && a.wrapping_sub(b) < u32::MAX / 2
}

/// CRC32, IEEE 802.3 polynomial
fn crc32(data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc: u32 = 0xFFFF_FFFF;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    !crc
}
