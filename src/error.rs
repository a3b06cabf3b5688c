//! Error taxonomy shared by the tables, the channel and the control loop.

use std::time::Duration;

/// Result type alias using ControlError
pub type Result<T> = std::result::Result<T, ControlError>;

#[derive(thiserror::Error, Debug)]
pub enum ControlError {
    #[error("Value {value} is out of range (must be {min}-{max})")]
    Range { value: i32, min: i32, max: i32 },

    #[error("Invalid configuration: {0}")]
    Validation(String),

    #[error("Command '{command}' failed after {attempts} attempt(s): {reason}")]
    ExecutionFailed {
        command: String,
        attempts: u32,
        reason: String,
    },

    #[error("Invalid temperature reading for sensor {sensor}: '{raw}'")]
    InvalidSensorReading { sensor: String, raw: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl ControlError {
    pub fn validation(reason: impl Into<String>) -> Self {
        ControlError::Validation(reason.into())
    }

    /// Cancellation ends the loop; every other runtime error only ends the cycle.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ControlError::Cancelled)
    }
}

/// Failure of a single attempt to invoke the external tool. Retried by the channel.
#[derive(thiserror::Error, Debug)]
pub enum TransientError {
    #[error("failed to spawn ipmitool: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("ipmitool did not finish within {0:?}")]
    Timeout(Duration),
}
