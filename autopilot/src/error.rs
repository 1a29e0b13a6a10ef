use fsk::FskError;
use localization::LocalizationError;
use thiserror::Error;

/// Errors raised while setting up the VLC subsystem
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AutopilotError {
    #[error("Localization: {0}")]
    Localization(#[from] LocalizationError),

    #[error("Light link: {0}")]
    Fsk(#[from] FskError),

    /// Task periods that cannot keep up with each other
    #[error("Invalid task periods: {reason}")]
    InvalidPeriods { reason: &'static str },
}

pub type AutopilotResult<T> = Result<T, AutopilotError>;
