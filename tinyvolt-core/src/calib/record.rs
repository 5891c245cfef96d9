//! The calibration record and the fixed-point conversion it defines
//!
//! Two-point model: one captured sample pins the zero reading, a second
//! pins the full-scale reading. The scale factor is kept as the exact
//! rational `gain_units / gain_span` instead of a rounded multiplier, so
//! repeated conversions cannot drift; the target part has no hardware float
//! and all arithmetic here is integer.

use serde::{Deserialize, Serialize};

/// The committed calibration for one device
///
/// `raw_to_units(code) = round((code - zero_offset) * gain_units / gain_span)`
///
/// Invariants: `gain_units != 0` and `gain_span != 0`. The two calibration
/// commands are the only mutators, and the record is always read and written
/// as one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationRecord {
    /// Raw code that reads as zero units
    pub zero_offset: i16,
    /// Units reported at full scale
    pub gain_units: i32,
    /// Raw span (full-scale code minus zero code) covering `gain_units`
    pub gain_span: u16,
}

impl CalibrationRecord {
    /// Factory default: raw codes pass through unscaled
    pub const fn identity(full_scale_code: u16) -> Self {
        Self {
            zero_offset: 0,
            gain_units: full_scale_code as i32,
            gain_span: full_scale_code,
        }
    }

    /// Check the record invariants
    pub const fn is_valid(&self) -> bool {
        self.gain_units != 0 && self.gain_span != 0
    }

    /// Convert a raw code to calibrated units
    pub fn raw_to_units(&self, code: u16) -> i32 {
        let delta = code as i64 - self.zero_offset as i64;
        div_round(delta * self.gain_units as i64, self.gain_span as i64) as i32
    }

    /// Exact inverse of [`raw_to_units`](Self::raw_to_units)
    ///
    /// The result can fall outside the converter's range; callers clamp
    /// where a representable code is required.
    pub fn units_to_raw(&self, units: i32) -> i32 {
        let raw = self.zero_offset as i64
            + div_round(units as i64 * self.gain_span as i64, self.gain_units as i64);
        raw as i32
    }
}

/// Integer division rounding half away from zero
fn div_round(num: i64, den: i64) -> i64 {
    let quot = num / den;
    let rem = num % den;
    if rem.abs() * 2 >= den.abs() {
        quot + num.signum() * den.signum()
    } else {
        quot
    }
}
