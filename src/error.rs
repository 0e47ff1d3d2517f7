//! Error handling for the humidity/temperature logger.
//!
//! Transient sensor read failures are not represented here; they are
//! [`SensorFault`](crate::sensor::SensorFault) values and never escape an
//! aggregator.

use std::path::PathBuf;

/// A specialized `Result` type for logger operations.
pub type Result<T> = std::result::Result<T, LoggerError>;

/// The main error type for logger setup and storage operations.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Pin argument is not a number inside the supported range
    #[error("Invalid pin number '{pin}'.  Must be between {min} and {max}")]
    InvalidPin { pin: String, min: u8, max: u8 },

    /// The same pin was requested more than once in a run
    #[error("Pin {0} is already in use by another sensor")]
    DuplicatePin(u8),

    /// Log file could not be opened or prepared
    #[error("Failed to open log file {}: {source}", .path.display())]
    StorageOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be written to its log file
    #[error("Failed to write to log file {}: {source}", .path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// GPIO operation failed
    #[error("GPIO error: {0}")]
    Gpio(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LoggerError {
    /// Create a new invalid pin error for the given argument text.
    pub fn invalid_pin(pin: impl Into<String>) -> Self {
        Self::InvalidPin {
            pin: pin.into(),
            min: crate::MIN_PIN,
            max: crate::MAX_PIN,
        }
    }

    /// Create a new GPIO error
    pub fn gpio_error(msg: impl Into<String>) -> Self {
        Self::Gpio(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error comes from operator input rather than the host.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidPin { .. } | Self::DuplicatePin(_) | Self::Config(_)
        )
    }
}
