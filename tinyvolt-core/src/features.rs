//! Compiled capability selection
//!
//! Each cargo feature of this crate bakes one capability into the image.
//! At runtime the selection is a single immutable [`FeatureSet`] consulted
//! by the dispatcher before every command, which keeps conditional
//! compilation out of the logic while preserving "absent means not present"
//! semantics. Tests and the simulator construct arbitrary sets directly.

use tinyvolt_protocol::Command;

// A `-debug` flag is a companion to its parent capability; enabling one
// without the other is a build configuration error.
#[cfg(all(feature = "code-command-debug", not(feature = "code-command")))]
compile_error!("feature `code-command-debug` requires `code-command`");

#[cfg(all(feature = "volts-command-debug", not(feature = "volts-command")))]
compile_error!("feature `volts-command-debug` requires `volts-command`");

#[cfg(all(
    feature = "calibrate-zero-command-debug",
    not(feature = "calibrate-zero-command")
))]
compile_error!("feature `calibrate-zero-command-debug` requires `calibrate-zero-command`");

#[cfg(all(
    feature = "calibrate-full-scale-command-debug",
    not(feature = "calibrate-full-scale-command")
))]
compile_error!(
    "feature `calibrate-full-scale-command-debug` requires `calibrate-full-scale-command`"
);

/// The capabilities compiled into one firmware image
///
/// Fixed for the lifetime of the process. A command whose capability is
/// absent is rejected as unsupported with no side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeatureSet {
    pub boot_message: bool,
    pub increment_command: bool,
    pub decrement_command: bool,
    pub code_command: bool,
    pub code_command_debug: bool,
    pub volts_command: bool,
    pub volts_command_debug: bool,
    pub calibrate_zero_command: bool,
    pub calibrate_zero_command_debug: bool,
    pub calibrate_full_scale_command: bool,
    pub calibrate_full_scale_command_debug: bool,
    pub dump_command: bool,
    pub runtime_verbosity: bool,
    pub eeprom_calibration: bool,
    pub error_printing: bool,
    pub success_printing: bool,
}

impl FeatureSet {
    /// The selection baked into this build via cargo features
    pub const fn from_build() -> Self {
        Self {
            boot_message: cfg!(feature = "boot-message"),
            increment_command: cfg!(feature = "increment-command"),
            decrement_command: cfg!(feature = "decrement-command"),
            code_command: cfg!(feature = "code-command"),
            code_command_debug: cfg!(feature = "code-command-debug"),
            volts_command: cfg!(feature = "volts-command"),
            volts_command_debug: cfg!(feature = "volts-command-debug"),
            calibrate_zero_command: cfg!(feature = "calibrate-zero-command"),
            calibrate_zero_command_debug: cfg!(feature = "calibrate-zero-command-debug"),
            calibrate_full_scale_command: cfg!(feature = "calibrate-full-scale-command"),
            calibrate_full_scale_command_debug: cfg!(
                feature = "calibrate-full-scale-command-debug"
            ),
            dump_command: cfg!(feature = "dump-command"),
            runtime_verbosity: cfg!(feature = "runtime-verbosity"),
            eeprom_calibration: cfg!(feature = "eeprom-calibration"),
            error_printing: cfg!(feature = "error-printing"),
            success_printing: cfg!(feature = "success-printing"),
        }
    }

    /// A set with every capability absent
    pub const fn none() -> Self {
        Self {
            boot_message: false,
            increment_command: false,
            decrement_command: false,
            code_command: false,
            code_command_debug: false,
            volts_command: false,
            volts_command_debug: false,
            calibrate_zero_command: false,
            calibrate_zero_command_debug: false,
            calibrate_full_scale_command: false,
            calibrate_full_scale_command_debug: false,
            dump_command: false,
            runtime_verbosity: false,
            eeprom_calibration: false,
            error_printing: false,
            success_printing: false,
        }
    }

    /// A set with every capability present
    pub const fn all() -> Self {
        Self {
            boot_message: true,
            increment_command: true,
            decrement_command: true,
            code_command: true,
            code_command_debug: true,
            volts_command: true,
            volts_command_debug: true,
            calibrate_zero_command: true,
            calibrate_zero_command_debug: true,
            calibrate_full_scale_command: true,
            calibrate_full_scale_command_debug: true,
            dump_command: true,
            runtime_verbosity: true,
            eeprom_calibration: true,
            error_printing: true,
            success_printing: true,
        }
    }

    /// Check that no debug flag is set without its parent capability
    ///
    /// Build-selected sets are already enforced by `compile_error!`; this
    /// covers sets constructed at runtime.
    pub const fn is_valid(&self) -> bool {
        (self.code_command || !self.code_command_debug)
            && (self.volts_command || !self.volts_command_debug)
            && (self.calibrate_zero_command || !self.calibrate_zero_command_debug)
            && (self.calibrate_full_scale_command || !self.calibrate_full_scale_command_debug)
    }

    /// Membership test for a parsed command token
    pub fn supports(&self, command: Command) -> bool {
        match command {
            Command::Increment => self.increment_command,
            Command::Decrement => self.decrement_command,
            Command::ReportCode => self.code_command,
            Command::ReportVolts => self.volts_command,
            Command::CalibrateZero => self.calibrate_zero_command,
            Command::CalibrateFullScale => self.calibrate_full_scale_command,
            Command::DumpState => self.dump_command,
            Command::SetVerbosity(_) => self.runtime_verbosity,
        }
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::from_build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyvolt_protocol::VerbosityLevel;

    #[test]
    fn test_build_selection_is_valid() {
        assert!(FeatureSet::from_build().is_valid());
    }

    #[test]
    fn test_none_supports_nothing() {
        let set = FeatureSet::none();
        for cmd in [
            Command::Increment,
            Command::Decrement,
            Command::ReportCode,
            Command::ReportVolts,
            Command::CalibrateZero,
            Command::CalibrateFullScale,
            Command::DumpState,
            Command::SetVerbosity(VerbosityLevel::Silent),
        ] {
            assert!(!set.supports(cmd));
        }
    }

    #[test]
    fn test_all_supports_everything() {
        let set = FeatureSet::all();
        assert!(set.is_valid());
        assert!(set.supports(Command::ReportVolts));
        assert!(set.supports(Command::SetVerbosity(VerbosityLevel::Debug)));
    }

    #[test]
    fn test_debug_without_parent_invalid() {
        let set = FeatureSet {
            volts_command_debug: true,
            ..FeatureSet::none()
        };
        assert!(!set.is_valid());

        let set = FeatureSet {
            volts_command: true,
            volts_command_debug: true,
            ..FeatureSet::none()
        };
        assert!(set.is_valid());
    }
}
