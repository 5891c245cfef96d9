//! Board-agnostic core logic for the Tinyvolt meter firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Compiled feature selection ([`features::FeatureSet`])
//! - Two-point calibration model, engine, and persistent store
//! - Command dispatch over the serial protocol ([`controller::Controller`])
//! - Verbosity gating for device output
//! - The interrupt-to-main receive byte queue
//!
//! Hardware ports supply the [`tinyvolt_hal`] trait implementations; the
//! host simulator and the tests drive the same code with in-memory
//! collaborators.

#![no_std]
#![deny(unsafe_code)]

pub mod calib;
pub mod controller;
pub mod features;
pub mod rx;
pub mod verbosity;

pub use calib::{CalibrationEngine, CalibrationRecord, CalibrationStore, EngineConfig};
pub use controller::Controller;
pub use features::FeatureSet;
pub use verbosity::VerbosityController;
