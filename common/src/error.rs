//! Error types for the control core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlError {
    /// Motion was requested before homing completed, or after position trust
    /// was lost. Only a new calibration pass clears this.
    #[error("carriage motion refused: not calibrated")]
    NotCalibrated,

    #[error("square ({0}, {1}) is outside the board")]
    BadSquare(u8, u8),

    #[error("malformed move record {0:?}")]
    BadMoveRecord(String),

    #[error("config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type ControlResult<T> = Result<T, ControlError>;
