//! # Rust Driver Logger
//!
//! A pluggable logging facade: one stream of log records and transaction
//! boundaries fanned out to several independently configured drivers.
//!
//! ## Features
//!
//! - **Fan-out**: every record reaches every driver, in registration order
//! - **Transactions**: group records under a shared, monotonically issued id
//! - **Config-driven**: build drivers from a JSON config, tolerating partial failure
//! - **Serializing wrapper**: share drivers that cannot take concurrent calls
//! - **Built-in drivers**: console, file and SQLite

pub mod core;
pub mod drivers;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::drivers::{ConsoleDriver, ConsoleDriverFactory};
    #[cfg(feature = "file")]
    pub use crate::drivers::{FileDriver, FileDriverFactory};
    #[cfg(feature = "sqlite")]
    pub use crate::drivers::{SqliteDriver, SqliteDriverFactory};
    pub use crate::drivers::builtin_factories;
    pub use crate::core::{
        create_manager_with_config, load_config_from_file, Config, Driver, DriverFactory,
        DriverId, DriverManager, LogLevel, Logger, LoggerBuilder, LoggerError, ManagerInit,
        Param, Record, Result, SerializingDriver, SerializingDriverFactory, TransactionLogger,
        TxId,
    };
}

#[cfg(feature = "console")]
pub use crate::drivers::{ConsoleDriver, ConsoleDriverFactory};
#[cfg(feature = "file")]
pub use crate::drivers::{FileDriver, FileDriverFactory};
#[cfg(feature = "sqlite")]
pub use crate::drivers::{SqliteDriver, SqliteDriverFactory};
pub use crate::drivers::builtin_factories;
pub use crate::core::{
    create_manager_from_file, create_manager_with_config, load_config_from_file,
    match_config_with_drivers, Config, Driver, DriverBuild, DriverFactory, DriverId,
    DriverManager, DriverMetrics, FailedDriver, KnownParams, LogLevel, Logger, LoggerBuilder,
    LoggerError, ManagerInit, Param, Record, Result, SerializingDriver, SerializingDriverFactory,
    TransactionLogger, TxId,
};
