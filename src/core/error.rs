//! Error types for the logger system

use super::config_loader::FailedDriver;
use super::driver::DriverId;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Configuration source could not be read
    #[error("Failed to read configuration from '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration source is not valid JSON for a `Config`
    #[error("Invalid configuration JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A factory could not build its driver
    #[error("Failed to create driver '{driver}': {message}")]
    DriverCreation { driver: String, message: String },

    /// Every configured driver failed to construct
    #[error("all drivers failed to initialize ({} failed)", .failures.len())]
    AllDriversFailed { failures: Vec<FailedDriver> },

    /// At least one configured driver failed while others came up
    #[error("some drivers failed to initialize: {}", join_ids(.driver_ids))]
    SomeDriversFailed { driver_ids: Vec<DriverId> },

    /// A serializing wrapper was asked to wrap another serializing wrapper
    #[error("Serializing driver cannot wrap '{driver}', which is already serializing")]
    NestedSerializingDriver { driver: String },

    /// Embedded database failure
    #[error("Database error while {operation}: {message}")]
    Database { operation: String, message: String },
}

fn join_ids(ids: &[DriverId]) -> String {
    ids.iter()
        .map(DriverId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl LoggerError {
    /// Create a configuration read error with the offending path
    pub fn config_read(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::ConfigRead {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a driver creation error
    pub fn driver_creation(driver: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::DriverCreation {
            driver: driver.into(),
            message: message.into(),
        }
    }

    pub fn nested_serializing(driver: impl Into<String>) -> Self {
        LoggerError::NestedSerializingDriver {
            driver: driver.into(),
        }
    }

    /// Create a database error
    pub fn database(operation: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Database {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Per-driver failures carried by an `AllDriversFailed` error
    pub fn failures(&self) -> &[FailedDriver] {
        match self {
            LoggerError::AllDriversFailed { failures } => failures,
            _ => &[],
        }
    }
}
