//! ADC sampling abstraction

/// Default full-scale code for the 10-bit converter on the target part
pub const DEFAULT_MAX_CODE: u16 = 1023;

/// Raw sample source
///
/// Implementations own the conversion trigger and any settling/averaging
/// policy. A sample request is bounded by the converter's latency; if the
/// converter cannot produce a code the implementation returns its error and
/// the calibration engine surfaces that as a sample-unavailable failure.
pub trait Adc {
    /// Error type for sampling operations
    type Error;

    /// Largest code this converter can produce
    const MAX_CODE: u16 = DEFAULT_MAX_CODE;

    /// Take one raw sample
    fn sample_raw(&mut self) -> Result<u16, Self::Error>;
}
