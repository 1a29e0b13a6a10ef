use thiserror::Error;

/// Primary error type for the localization crate
///
/// Only configuration and caller mistakes are reported as errors. Faults seen
/// while running (sensor misses, divergence) are recovered locally and show
/// up as outcome values instead.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LocalizationError {
    /// A color map entry is neither a valid color nor the ambient sentinel
    #[error("Invalid color id {value} at column {column}, row {row}")]
    InvalidColorId {
        /// Offending table value
        value: u8,
        /// Table column of the entry
        column: usize,
        /// Table row of the entry
        row: usize,
    },

    /// A configuration parameter is out of range
    #[error("Configuration error: {parameter} {reason}")]
    InvalidConfig {
        /// Configuration parameter that caused the error
        parameter: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Integration step with a zero, negative or non-finite time delta
    #[error("Invalid time step: {dt}")]
    NonPositiveTimeStep {
        /// Time value that caused the error
        dt: f32,
    },

    /// Integration requested before bias calibration completed
    #[error("Motion model is not calibrated")]
    NotCalibrated,
}

/// Result type for localization operations
pub type LocalizationResult<T> = Result<T, LocalizationError>;
