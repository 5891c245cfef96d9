//! End-to-end command loop scenarios
//!
//! Drives the controller through the same poll interface a hardware port
//! uses, with in-memory collaborators standing in for the serial transport,
//! the ADC, and the EEPROM.

use std::collections::VecDeque;
use std::convert::Infallible;

use tinyvolt_core::calib::EngineConfig;
use tinyvolt_core::{CalibrationRecord, Controller, FeatureSet};
use tinyvolt_hal::{Adc, Eeprom, EepromError, NoEeprom, Transport};
use tinyvolt_protocol::VerbosityLevel;

struct MockTransport {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl MockTransport {
    fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
        }
    }

    fn push_input(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    fn output(&self) -> String {
        String::from_utf8(self.tx.clone()).unwrap()
    }

    fn clear_output(&mut self) {
        self.tx.clear();
    }
}

impl Transport for MockTransport {
    type Error = Infallible;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.rx.pop_front())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.extend_from_slice(data);
        Ok(())
    }
}

struct MockAdc {
    samples: VecDeque<u16>,
}

impl MockAdc {
    fn new(samples: &[u16]) -> Self {
        Self {
            samples: samples.iter().copied().collect(),
        }
    }

    fn empty() -> Self {
        Self::new(&[])
    }
}

impl Adc for MockAdc {
    type Error = ();

    fn sample_raw(&mut self) -> Result<u16, Self::Error> {
        self.samples.pop_front().ok_or(())
    }
}

struct MemEeprom {
    data: Vec<u8>,
}

impl MemEeprom {
    fn new() -> Self {
        Self {
            data: vec![0xFF; 64],
        }
    }
}

impl Eeprom for MemEeprom {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), EepromError> {
        let end = offset + buf.len();
        if end > self.data.len() {
            return Err(EepromError::OutOfBounds);
        }
        buf.copy_from_slice(&self.data[offset..end]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        let end = offset + data.len();
        if end > self.data.len() {
            return Err(EepromError::OutOfBounds);
        }
        self.data[offset..end].copy_from_slice(data);
        Ok(())
    }
}

/// EEPROM whose writes always fail (worn-out part)
struct BrokenEeprom;

impl Eeprom for BrokenEeprom {
    fn capacity(&self) -> usize {
        64
    }

    fn read(&mut self, _offset: usize, _buf: &mut [u8]) -> Result<(), EepromError> {
        Err(EepromError::Io)
    }

    fn write(&mut self, _offset: usize, _data: &[u8]) -> Result<(), EepromError> {
        Err(EepromError::Io)
    }
}

fn run<A: Adc, E: Eeprom>(
    controller: &mut Controller,
    transport: &mut MockTransport,
    adc: &mut A,
    eeprom: &mut E,
    input: &str,
) -> String {
    transport.clear_output();
    transport.push_input(input.as_bytes());
    controller.poll(transport, adc, eeprom).unwrap();
    transport.output()
}

fn meter_features() -> FeatureSet {
    // Increment/decrement/code/dump/verbosity with full printing
    FeatureSet {
        increment_command: true,
        decrement_command: true,
        code_command: true,
        dump_command: true,
        runtime_verbosity: true,
        error_printing: true,
        success_printing: true,
        ..FeatureSet::none()
    }
}

fn calibration_features() -> FeatureSet {
    FeatureSet {
        calibrate_zero_command: true,
        calibrate_full_scale_command: true,
        volts_command: true,
        dump_command: true,
        error_printing: true,
        success_printing: true,
        ..FeatureSet::none()
    }
}

#[test]
fn step_commands_net_one_count() {
    let mut controller = Controller::new(meter_features(), EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut adc = MockAdc::empty();
    let mut eeprom = NoEeprom;

    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "INC\rINC\rDEC\rC\r",
    );
    assert_eq!(out, "OK\r\nOK\r\nOK\r\nOK:1\r\n");
    assert_eq!(controller.engine().working(), 1);
}

#[test]
fn calibrate_then_measure_reads_reference() {
    let mut controller = Controller::new(calibration_features(), EngineConfig::default());
    let mut transport = MockTransport::new();
    // Z samples 512, F samples 1023, V samples 1023
    let mut adc = MockAdc::new(&[512, 1023, 1023]);
    let mut eeprom = NoEeprom;

    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "Z\rF\rV\r",
    );
    assert_eq!(out, "OK\r\nOK\r\nOK:100\r\n");
}

#[test]
fn calibration_survives_reboot_with_persistence() {
    let features = FeatureSet {
        eeprom_calibration: true,
        ..calibration_features()
    };
    let mut eeprom = MemEeprom::new();

    let dump_before = {
        let mut controller = Controller::new(features, EngineConfig::default());
        let mut transport = MockTransport::new();
        let mut adc = MockAdc::new(&[512, 1023]);
        controller.boot(&mut transport, &mut eeprom).unwrap();
        run(
            &mut controller,
            &mut transport,
            &mut adc,
            &mut eeprom,
            "Z\rF\rD\r",
        )
        .lines()
        .last()
        .unwrap()
        .to_string()
    };
    assert_eq!(dump_before, "OK:Z=512 G=100/511 L=2");

    // Reboot: a fresh controller over the same EEPROM
    let mut controller = Controller::new(features, EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut adc = MockAdc::empty();
    controller.boot(&mut transport, &mut eeprom).unwrap();

    let dump_after = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "D\r",
    );
    assert_eq!(dump_after.trim_end(), dump_before);
}

#[test]
fn session_calibration_resets_without_persistence() {
    let features = calibration_features();
    let mut eeprom = NoEeprom;

    {
        let mut controller = Controller::new(features, EngineConfig::default());
        let mut transport = MockTransport::new();
        let mut adc = MockAdc::new(&[512, 1023]);
        controller.boot(&mut transport, &mut eeprom).unwrap();
        run(
            &mut controller,
            &mut transport,
            &mut adc,
            &mut eeprom,
            "Z\rF\r",
        );
    }

    let mut controller = Controller::new(features, EngineConfig::default());
    let mut transport = MockTransport::new();
    controller.boot(&mut transport, &mut eeprom).unwrap();
    assert_eq!(
        *controller.engine().record(),
        CalibrationRecord::identity(1023)
    );
}

#[test]
fn silent_level_suppresses_text_but_keeps_side_effects() {
    let mut controller = Controller::new(meter_features(), EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut adc = MockAdc::empty();
    let mut eeprom = NoEeprom;

    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "L0\rINC\rINC\rBOGUS\r",
    );
    // L0 itself succeeded before the level dropped; its OK was computed at
    // the new level and is already suppressed.
    assert_eq!(out, "");
    assert_eq!(controller.engine().working(), 2);
    assert_eq!(controller.verbosity_level(), VerbosityLevel::Silent);
}

#[test]
fn disabled_command_is_unsupported_and_mutates_nothing() {
    let mut controller = Controller::new(meter_features(), EngineConfig::default());
    let mut transport = MockTransport::new();
    // A sample is queued; an unsupported V must not consume it
    let mut adc = MockAdc::new(&[777]);
    let mut eeprom = NoEeprom;

    let record_before = *controller.engine().record();
    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "V\rZ\rF\r",
    );
    assert_eq!(
        out,
        "ERR:UNSUPPORTED_COMMAND\r\nERR:UNSUPPORTED_COMMAND\r\nERR:UNSUPPORTED_COMMAND\r\n"
    );
    assert_eq!(*controller.engine().record(), record_before);
    assert_eq!(adc.samples.len(), 1);
}

#[test]
fn unknown_and_malformed_input_recovers() {
    let mut controller = Controller::new(meter_features(), EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut adc = MockAdc::empty();
    let mut eeprom = NoEeprom;

    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "HELP\rL9\rAAAAAAAAAAAAAAAAAAAAAAAA\rC\r",
    );
    assert_eq!(
        out,
        "ERR:UNKNOWN_COMMAND\r\nERR:INVALID_ARGUMENT\r\nERR:INPUT_TOO_LONG\r\nOK:0\r\n"
    );
}

#[test]
fn sample_unavailable_is_recoverable() {
    let mut controller = Controller::new(calibration_features(), EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut adc = MockAdc::empty();
    let mut eeprom = NoEeprom;

    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "Z\r",
    );
    assert_eq!(out, "ERR:SAMPLE_UNAVAILABLE\r\n");

    // The aborted flow left the engine idle; a retry with a sample works
    let mut adc = MockAdc::new(&[512]);
    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "Z\r",
    );
    assert_eq!(out, "OK\r\n");
}

#[test]
fn invalid_full_scale_sample_is_rejected() {
    let mut controller = Controller::new(calibration_features(), EngineConfig::default());
    let mut transport = MockTransport::new();
    // Full-scale sample at the zero point: zero span
    let mut adc = MockAdc::new(&[512, 512]);
    let mut eeprom = NoEeprom;

    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "Z\rF\r",
    );
    assert_eq!(out, "OK\r\nERR:INVALID_CALIBRATION\r\n");
}

#[test]
fn storage_failure_keeps_session_calibration() {
    let features = FeatureSet {
        eeprom_calibration: true,
        ..calibration_features()
    };
    let mut controller = Controller::new(features, EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut adc = MockAdc::new(&[512, 1023, 1023]);
    let mut eeprom = BrokenEeprom;

    controller.boot(&mut transport, &mut eeprom).unwrap();
    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "Z\rF\rV\r",
    );
    // Both captures fail to persist but stay effective: V still reads the
    // calibrated reference.
    assert_eq!(
        out,
        "ERR:STORAGE_FAILURE\r\nERR:STORAGE_FAILURE\r\nOK:100\r\n"
    );
    assert_eq!(controller.engine().record().zero_offset, 512);
}

#[test]
fn boot_message_emitted_when_enabled() {
    let features = FeatureSet {
        boot_message: true,
        ..meter_features()
    };
    let mut controller = Controller::new(features, EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut eeprom = NoEeprom;

    controller.boot(&mut transport, &mut eeprom).unwrap();
    assert_eq!(transport.output(), "tinyvolt ready\r\n");

    let mut transport = MockTransport::new();
    let mut controller = Controller::new(meter_features(), EngineConfig::default());
    controller.boot(&mut transport, &mut eeprom).unwrap();
    assert_eq!(transport.output(), "");
}

#[test]
fn print_flags_gate_text_independently() {
    let features = FeatureSet {
        success_printing: false,
        ..meter_features()
    };
    let mut controller = Controller::new(features, EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut adc = MockAdc::empty();
    let mut eeprom = NoEeprom;

    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "INC\rBOGUS\r",
    );
    // Success silent, error still printed; the increment still applied
    assert_eq!(out, "ERR:UNKNOWN_COMMAND\r\n");
    assert_eq!(controller.engine().working(), 1);

    let features = FeatureSet {
        error_printing: false,
        ..meter_features()
    };
    let mut controller = Controller::new(features, EngineConfig::default());
    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "INC\rBOGUS\r",
    );
    assert_eq!(out, "OK\r\n");
}

#[test]
fn debug_flag_emits_side_line_at_debug_level() {
    let features = FeatureSet {
        code_command_debug: true,
        ..meter_features()
    };
    let mut controller = Controller::new(features, EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut adc = MockAdc::empty();
    let mut eeprom = NoEeprom;

    // Default level (Success) keeps the debug path silent
    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "INC\rC\r",
    );
    assert_eq!(out, "OK\r\nOK:1\r\n");

    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "L3\rC\r",
    );
    assert_eq!(out, "OK\r\nDBG:code=1\r\nOK:1\r\n");
}

#[test]
fn fixed_verbosity_rejects_level_changes() {
    let features = FeatureSet {
        runtime_verbosity: false,
        ..meter_features()
    };
    let mut controller = Controller::new(features, EngineConfig::default());
    let mut transport = MockTransport::new();
    let mut adc = MockAdc::empty();
    let mut eeprom = NoEeprom;

    let out = run(
        &mut controller,
        &mut transport,
        &mut adc,
        &mut eeprom,
        "L0\rINC\r",
    );
    assert_eq!(out, "ERR:UNSUPPORTED_COMMAND\r\nOK\r\n");
    assert_eq!(controller.verbosity_level(), VerbosityLevel::Success);
}
