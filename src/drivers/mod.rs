//! Driver implementations

pub mod format;

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "console")]
pub use console::{ConsoleConfig, ConsoleDriver, ConsoleDriverFactory, CONSOLE_DRIVER_ID};
#[cfg(feature = "file")]
pub use file::{FileConfig, FileDriver, FileDriverFactory, FILE_DRIVER_ID};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConfig, SqliteDriver, SqliteDriverFactory, SQLITE_DRIVER_ID};

pub use crate::core::{Driver, DriverFactory};

use crate::core::{LoggerError, Result};
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

/// Decode a driver payload; JSON `null` means "all defaults"
#[cfg(any(feature = "console", feature = "file", feature = "sqlite"))]
pub(crate) fn parse_payload<T>(driver: &str, payload: &RawValue) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let config: Option<T> = serde_json::from_str(payload.get()).map_err(|e| {
        LoggerError::driver_creation(driver, format!("invalid configuration: {}", e))
    })?;
    Ok(config.unwrap_or_default())
}

/// Factories for every driver compiled into this build, in the order
/// console, file, sqlite
#[allow(unused_mut)]
pub fn builtin_factories() -> Vec<Box<dyn DriverFactory>> {
    let mut factories: Vec<Box<dyn DriverFactory>> = Vec::new();
    #[cfg(feature = "console")]
    factories.push(Box::new(ConsoleDriverFactory));
    #[cfg(feature = "file")]
    factories.push(Box::new(FileDriverFactory));
    #[cfg(feature = "sqlite")]
    factories.push(Box::new(SqliteDriverFactory));
    factories
}
