//! Calibration state machine and working value
//!
//! Two independent one-shot flows: zero capture and full-scale capture.
//! Each transitions `Idle -> Awaiting*Sample -> Idle`; the flows never nest,
//! and starting one while the other is underway is an error. The engine
//! also owns the transient working raw value that the step commands adjust.

use super::record::CalibrationRecord;

/// Where the engine is in a calibration flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationState {
    /// No calibration underway
    #[default]
    Idle,
    /// Zero capture started, waiting for the sample
    AwaitingZeroSample,
    /// Full-scale capture started, waiting for the sample
    AwaitingFullScaleSample,
}

/// Errors from calibration transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// A flow is already underway
    InProgress,
    /// A sample was applied with no flow underway
    NotCalibrating,
    /// The captured points would produce a zero or inverted scale factor
    InvalidCalibration,
}

/// Build-time conversion constants for one device
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Largest representable raw code
    pub max_code: u16,
    /// Units reported at the full-scale reference point
    pub reference_full_scale: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_code: 1023,
            reference_full_scale: 100,
        }
    }
}

/// The calibration engine
///
/// Owns the committed [`CalibrationRecord`], the capture state machine, and
/// the transient working value. The record mutates only through a completed
/// capture; the working value only through the step operations.
#[derive(Debug, Clone)]
pub struct CalibrationEngine {
    config: EngineConfig,
    record: CalibrationRecord,
    state: CalibrationState,
    working: u16,
}

impl CalibrationEngine {
    /// Create an engine with the factory-default record
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            record: CalibrationRecord::identity(config.max_code),
            state: CalibrationState::Idle,
            working: 0,
        }
    }

    /// The committed record
    pub fn record(&self) -> &CalibrationRecord {
        &self.record
    }

    /// Replace the record wholesale (boot-time restore from storage)
    pub fn restore_record(&mut self, record: CalibrationRecord) {
        if record.is_valid() {
            self.record = record;
        }
    }

    /// Current capture state
    pub fn state(&self) -> CalibrationState {
        self.state
    }

    /// The transient working raw value
    pub fn working(&self) -> u16 {
        self.working
    }

    /// Step the working value up by one code, clamped at full scale
    pub fn increment(&mut self) -> u16 {
        self.working = (self.working + 1).min(self.config.max_code);
        self.working
    }

    /// Step the working value down by one code, clamped at zero
    pub fn decrement(&mut self) -> u16 {
        self.working = self.working.saturating_sub(1);
        self.working
    }

    /// Convert through the committed record
    pub fn raw_to_units(&self, code: u16) -> i32 {
        self.record.raw_to_units(code)
    }

    /// Start the zero capture flow
    pub fn begin_zero(&mut self) -> Result<(), CalibrationError> {
        if self.state != CalibrationState::Idle {
            return Err(CalibrationError::InProgress);
        }
        self.state = CalibrationState::AwaitingZeroSample;
        Ok(())
    }

    /// Start the full-scale capture flow
    pub fn begin_full_scale(&mut self) -> Result<(), CalibrationError> {
        if self.state != CalibrationState::Idle {
            return Err(CalibrationError::InProgress);
        }
        self.state = CalibrationState::AwaitingFullScaleSample;
        Ok(())
    }

    /// Abandon any flow underway (e.g. the sampler had nothing to give)
    pub fn abort(&mut self) {
        self.state = CalibrationState::Idle;
    }

    /// Complete the zero flow: the sampled code now reads as zero units
    pub fn apply_zero_sample(&mut self, raw: u16) -> Result<(), CalibrationError> {
        if self.state != CalibrationState::AwaitingZeroSample {
            return Err(CalibrationError::NotCalibrating);
        }
        self.state = CalibrationState::Idle;
        self.record.zero_offset = raw.min(self.config.max_code) as i16;
        Ok(())
    }

    /// Complete the full-scale flow relative to the committed zero offset
    ///
    /// The sampled code will read as the configured reference value. A
    /// sample at or below the zero offset, or a zero reference, would make
    /// the scale factor zero or inverted and is rejected; the engine returns
    /// to idle either way.
    pub fn apply_full_scale_sample(&mut self, raw: u16) -> Result<(), CalibrationError> {
        if self.state != CalibrationState::AwaitingFullScaleSample {
            return Err(CalibrationError::NotCalibrating);
        }
        self.state = CalibrationState::Idle;

        let span = raw as i32 - self.record.zero_offset as i32;
        if span <= 0 || self.config.reference_full_scale == 0 {
            return Err(CalibrationError::InvalidCalibration);
        }

        self.record.gain_units = self.config.reference_full_scale;
        self.record.gain_span = span as u16;
        Ok(())
    }
}

impl Default for CalibrationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
