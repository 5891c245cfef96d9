//! Runtime verbosity state
//!
//! One process-wide level, owned by the controller and threaded through to
//! every output decision. Mutation is only reachable through the `L` command
//! when the runtime-verbosity capability is compiled in; otherwise the
//! compiled default stands for the life of the process.

use tinyvolt_protocol::VerbosityLevel;

/// Holder for the current verbosity level
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VerbosityController {
    level: VerbosityLevel,
}

impl VerbosityController {
    /// Create a controller at the given level
    pub const fn new(level: VerbosityLevel) -> Self {
        Self { level }
    }

    /// Current level
    pub fn level(&self) -> VerbosityLevel {
        self.level
    }

    /// Set the level
    pub fn set_level(&mut self, level: VerbosityLevel) {
        self.level = level;
    }

    /// Whether output classified at `level` may be emitted
    ///
    /// Checked before formatting, so suppressed output costs nothing.
    pub fn allows(&self, level: VerbosityLevel) -> bool {
        level <= self.level
    }
}
