//! Core driver orchestration types and traits

pub mod config;
pub mod config_loader;
pub mod driver;
pub mod driver_manager;
pub mod error;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod serializing;

pub use config::{load_config_from_file, Config};
pub use config_loader::{
    create_manager_from_file, create_manager_with_config, match_config_with_drivers, DriverBuild,
    FailedDriver, ManagerInit,
};
pub use driver::{Driver, DriverFactory, DriverId, TxId};
pub use driver_manager::DriverManager;
pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, TransactionLogger};
pub use metrics::DriverMetrics;
pub use record::{KnownParams, Param, Record};
pub use serializing::{SerializingDriver, SerializingDriverFactory, SERIAL_DRIVER_ID_SUFFIX};
