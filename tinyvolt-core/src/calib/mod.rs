//! Two-point calibration
//!
//! The model, the state machine that captures it, and the persistent store
//! that keeps it across power loss.

pub mod engine;
pub mod record;
pub mod store;

pub use engine::{CalibrationEngine, CalibrationError, CalibrationState, EngineConfig};
pub use record::CalibrationRecord;
pub use store::{CalibrationStore, StoreError};
