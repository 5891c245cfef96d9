//! Host-side simulator for the Tinyvolt meter
//!
//! Runs the real controller against stdin/stdout with an adjustable fake
//! ADC and a file-backed EEPROM, so the full command set can be exercised
//! without hardware:
//!
//! ```text
//! $ cargo run -p tinyvolt-sim
//! tinyvolt ready
//! INC
//! OK
//! C
//! OK:1
//! ```
//!
//! Lines starting with `!` are simulator directives, handled before the
//! firmware sees them: `!adc <code>` sets the value the fake ADC samples,
//! `!quit` exits. Everything else is fed byte-for-byte into the controller,
//! with a stdin-reader thread standing in for the receive interrupt on the
//! far side of the SPSC queue.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tinyvolt_core::calib::store::REQUIRED_CAPACITY;
use tinyvolt_core::calib::EngineConfig;
use tinyvolt_core::rx::{RxConsumer, RxQueue};
use tinyvolt_core::{Controller, FeatureSet};
use tinyvolt_hal::{Adc, Eeprom, EepromError, Transport};

const EEPROM_FILE: &str = "tinyvolt-eeprom.bin";

/// Queue consumer plus stdout as the device transport
struct SimTransport {
    rx: RxConsumer<'static>,
}

impl Transport for SimTransport {
    type Error = io::Error;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.rx.dequeue())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        stdout.flush()
    }
}

/// ADC returning whatever `!adc` last set
struct SimAdc {
    value: Arc<AtomicU16>,
}

impl Adc for SimAdc {
    type Error = ();

    fn sample_raw(&mut self) -> Result<u16, Self::Error> {
        Ok(self.value.load(Ordering::Relaxed).min(1023))
    }
}

/// File-backed EEPROM so calibration survives simulator restarts
struct FileEeprom {
    data: Vec<u8>,
    path: PathBuf,
}

impl FileEeprom {
    fn open(path: PathBuf) -> Self {
        let data = match std::fs::read(&path) {
            Ok(bytes) if bytes.len() == REQUIRED_CAPACITY => bytes,
            _ => vec![0xFF; REQUIRED_CAPACITY],
        };
        Self { data, path }
    }
}

impl Eeprom for FileEeprom {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), EepromError> {
        let end = offset.checked_add(buf.len()).ok_or(EepromError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(EepromError::OutOfBounds);
        }
        buf.copy_from_slice(&self.data[offset..end]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), EepromError> {
        let end = offset.checked_add(data.len()).ok_or(EepromError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(EepromError::OutOfBounds);
        }
        self.data[offset..end].copy_from_slice(data);
        std::fs::write(&self.path, &self.data).map_err(|_| EepromError::Io)
    }
}

fn main() -> io::Result<()> {
    let queue: &'static mut RxQueue = Box::leak(Box::new(RxQueue::new()));
    let (mut producer, consumer) = queue.split();

    let adc_value = Arc::new(AtomicU16::new(512));
    let quit = Arc::new(AtomicBool::new(false));

    // Stdin reader plays the role of the receive interrupt
    {
        let adc_value = Arc::clone(&adc_value);
        let quit = Arc::clone(&quit);
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if let Some(directive) = line.strip_prefix('!') {
                    match directive.split_once(' ') {
                        Some(("adc", code)) => {
                            if let Ok(code) = code.trim().parse::<u16>() {
                                adc_value.store(code, Ordering::Relaxed);
                            } else {
                                eprintln!("sim: bad code in `!adc`");
                            }
                        }
                        _ if directive == "quit" => break,
                        _ => eprintln!("sim: unknown directive `!{}`", directive),
                    }
                    continue;
                }
                for &b in line.as_bytes() {
                    // Overrun drops, same as the hardware queue
                    let _ = producer.enqueue(b);
                }
                let _ = producer.enqueue(b'\r');
            }
            quit.store(true, Ordering::Relaxed);
        });
    }

    let mut transport = SimTransport { rx: consumer };
    let mut adc = SimAdc { value: adc_value };
    let mut eeprom = FileEeprom::open(PathBuf::from(EEPROM_FILE));

    let mut controller = Controller::new(FeatureSet::from_build(), EngineConfig::default());
    controller.boot(&mut transport, &mut eeprom)?;

    while !quit.load(Ordering::Relaxed) {
        controller.poll(&mut transport, &mut adc, &mut eeprom)?;
        thread::sleep(Duration::from_millis(5));
    }
    Ok(())
}
