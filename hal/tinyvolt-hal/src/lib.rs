//! Tinyvolt Hardware Abstraction Layer
//!
//! This crate defines the trait boundary between the board-agnostic command
//! and calibration logic (`tinyvolt-core`) and the chip-specific drivers
//! (hardware SPI, bit-banged USI serial, the ADC sampling routine, EEPROM
//! access). The core never touches a register; ports implement these traits.
//!
//! # Traits
//!
//! - [`transport::Transport`] - serial byte transport (command input,
//!   response output)
//! - [`adc::Adc`] - raw sample acquisition
//! - [`eeprom::Eeprom`] - byte-addressed persistent storage block

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod eeprom;
pub mod transport;

// Re-export key traits at crate root for convenience
pub use adc::Adc;
pub use eeprom::{Eeprom, EepromError, NoEeprom};
pub use transport::Transport;
