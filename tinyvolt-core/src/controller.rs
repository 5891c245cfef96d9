//! Command dispatch
//!
//! The controller is the device's single thread of control: it drains the
//! transport one byte at a time, accumulates lines, classifies them against
//! the compiled vocabulary, checks the feature set, routes to the owning
//! component, and emits the response subject to the print flags and the
//! verbosity level. Every command runs to completion before the next byte
//! is processed; no error is fatal, the loop always returns to listening.

use core::fmt::Write as _;

use heapless::String;
use tinyvolt_hal::{Adc, Eeprom, Transport};
use tinyvolt_protocol::{
    Command, CommandError, LineError, LineReader, ParseError, Payload, Response, VerbosityLevel,
    MAX_RESPONSE_LEN,
};

use crate::calib::{CalibrationEngine, CalibrationError, CalibrationStore, EngineConfig};
use crate::features::FeatureSet;
use crate::verbosity::VerbosityController;

/// One-shot startup announcement (only with the boot-message capability)
pub const BOOT_MESSAGE: &[u8] = b"tinyvolt ready\r\n";

/// Which calibration point a capture command targets
#[derive(Clone, Copy)]
enum CalPoint {
    Zero,
    FullScale,
}

/// The command dispatcher and owner of all mutable device state
pub struct Controller {
    features: FeatureSet,
    verbosity: VerbosityController,
    engine: CalibrationEngine,
    store: CalibrationStore,
    reader: LineReader,
}

impl Controller {
    /// Create a controller for the given compiled feature set
    pub fn new(features: FeatureSet, config: EngineConfig) -> Self {
        Self {
            features,
            verbosity: VerbosityController::default(),
            engine: CalibrationEngine::new(config),
            store: CalibrationStore::new(),
            reader: LineReader::new(),
        }
    }

    /// The calibration engine (read access for ports and tests)
    pub fn engine(&self) -> &CalibrationEngine {
        &self.engine
    }

    /// Current verbosity level
    pub fn verbosity_level(&self) -> VerbosityLevel {
        self.verbosity.level()
    }

    /// Boot-time work: restore the persisted record, announce startup
    ///
    /// Without the persistence capability the engine keeps its factory
    /// default and every session starts uncalibrated.
    pub fn boot<T, E>(&mut self, transport: &mut T, eeprom: &mut E) -> Result<(), T::Error>
    where
        T: Transport,
        E: Eeprom,
    {
        if self.features.eeprom_calibration {
            let fallback = *self.engine.record();
            let record = self.store.load(eeprom, fallback);
            self.engine.restore_record(record);
        }
        if self.features.boot_message {
            transport.write_bytes(BOOT_MESSAGE)?;
        }
        Ok(())
    }

    /// Drain pending input and execute any completed commands
    ///
    /// Returns once the transport has no byte ready; the main loop calls
    /// this from its single polling point.
    pub fn poll<T, A, E>(
        &mut self,
        transport: &mut T,
        adc: &mut A,
        eeprom: &mut E,
    ) -> Result<(), T::Error>
    where
        T: Transport,
        A: Adc,
        E: Eeprom,
    {
        while let Some(byte) = transport.read_byte()? {
            match self.reader.feed(byte) {
                Ok(Some(line)) => {
                    let response = self.execute(&line, transport, adc, eeprom)?;
                    self.emit(transport, &response)?;
                }
                Ok(None) => {}
                Err(LineError::TooLong) => {
                    self.emit(transport, &Response::Err(CommandError::InputTooLong))?;
                }
            }
        }
        Ok(())
    }

    /// Classify, gate, and dispatch one completed line
    fn execute<T, A, E>(
        &mut self,
        line: &[u8],
        transport: &mut T,
        adc: &mut A,
        eeprom: &mut E,
    ) -> Result<Response, T::Error>
    where
        T: Transport,
        A: Adc,
        E: Eeprom,
    {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(ParseError::UnknownCommand) => {
                return Ok(Response::Err(CommandError::UnknownCommand))
            }
            Err(ParseError::InvalidArgument) => {
                return Ok(Response::Err(CommandError::InvalidArgument))
            }
        };

        if !self.features.supports(command) {
            return Ok(Response::Err(CommandError::UnsupportedCommand));
        }

        Ok(match command {
            Command::Increment => {
                self.engine.increment();
                Response::Ok(None)
            }
            Command::Decrement => {
                self.engine.decrement();
                Response::Ok(None)
            }
            Command::ReportCode => {
                let code = self.engine.working();
                if self.debug_active(self.features.code_command_debug) {
                    self.debug_line(transport, "code", code as i32)?;
                }
                Response::Ok(Some(Payload::Value(code as i32)))
            }
            Command::ReportVolts => match adc.sample_raw() {
                Err(_) => Response::Err(CommandError::SampleUnavailable),
                Ok(raw) => {
                    if self.debug_active(self.features.volts_command_debug) {
                        self.debug_line(transport, "volts_raw", raw as i32)?;
                    }
                    Response::Ok(Some(Payload::Value(self.engine.raw_to_units(raw))))
                }
            },
            Command::CalibrateZero => self.calibrate(transport, adc, eeprom, CalPoint::Zero)?,
            Command::CalibrateFullScale => {
                self.calibrate(transport, adc, eeprom, CalPoint::FullScale)?
            }
            Command::DumpState => {
                let record = self.engine.record();
                Response::Ok(Some(Payload::Dump {
                    zero_offset: record.zero_offset,
                    gain_units: record.gain_units,
                    gain_span: record.gain_span,
                    level: self.verbosity.level(),
                }))
            }
            Command::SetVerbosity(level) => {
                self.verbosity.set_level(level);
                Response::Ok(None)
            }
        })
    }

    /// Run one capture flow: begin, sample, apply, persist
    fn calibrate<T, A, E>(
        &mut self,
        transport: &mut T,
        adc: &mut A,
        eeprom: &mut E,
        point: CalPoint,
    ) -> Result<Response, T::Error>
    where
        T: Transport,
        A: Adc,
        E: Eeprom,
    {
        let begun = match point {
            CalPoint::Zero => self.engine.begin_zero(),
            CalPoint::FullScale => self.engine.begin_full_scale(),
        };
        if let Err(e) = begun {
            return Ok(Response::Err(e.into()));
        }

        let raw = match adc.sample_raw() {
            Ok(raw) => raw,
            Err(_) => {
                self.engine.abort();
                return Ok(Response::Err(CommandError::SampleUnavailable));
            }
        };

        let (debug_flag, debug_tag) = match point {
            CalPoint::Zero => (self.features.calibrate_zero_command_debug, "zero_raw"),
            CalPoint::FullScale => (
                self.features.calibrate_full_scale_command_debug,
                "full_scale_raw",
            ),
        };
        if self.debug_active(debug_flag) {
            self.debug_line(transport, debug_tag, raw as i32)?;
        }

        let applied = match point {
            CalPoint::Zero => self.engine.apply_zero_sample(raw),
            CalPoint::FullScale => self.engine.apply_full_scale_sample(raw),
        };
        if let Err(e) = applied {
            return Ok(Response::Err(e.into()));
        }

        if self.features.eeprom_calibration
            && self.store.save(eeprom, self.engine.record()).is_err()
        {
            // The record stays committed for the session even though it
            // could not be persisted.
            return Ok(Response::Err(CommandError::StorageFailure));
        }

        Ok(Response::Ok(None))
    }

    /// Whether a per-command debug path may emit right now
    fn debug_active(&self, flag: bool) -> bool {
        flag && self.verbosity.allows(VerbosityLevel::Debug)
    }

    /// Emit one debug side-line
    fn debug_line<T: Transport>(
        &self,
        transport: &mut T,
        tag: &str,
        value: i32,
    ) -> Result<(), T::Error> {
        let mut out: String<MAX_RESPONSE_LEN> = String::new();
        let _ = write!(out, "DBG:{}={}\r\n", tag, value);
        transport.write_bytes(out.as_bytes())
    }

    /// Emit a response subject to the print flags and verbosity
    ///
    /// The response was already computed and its side effects applied;
    /// suppression drops only the text.
    fn emit<T: Transport>(&self, transport: &mut T, response: &Response) -> Result<(), T::Error> {
        let printable = match response {
            Response::Ok(_) => {
                self.features.success_printing && self.verbosity.allows(VerbosityLevel::Success)
            }
            Response::Err(_) => {
                self.features.error_printing && self.verbosity.allows(VerbosityLevel::Error)
            }
        };
        if printable {
            transport.write_bytes(response.render().as_bytes())?;
        }
        Ok(())
    }
}

impl From<CalibrationError> for CommandError {
    fn from(e: CalibrationError) -> Self {
        match e {
            CalibrationError::InProgress => CommandError::CalibrationInProgress,
            CalibrationError::NotCalibrating | CalibrationError::InvalidCalibration => {
                CommandError::InvalidCalibration
            }
        }
    }
}
