//! Logging macros for ergonomic log message formatting.
//!
//! The macros accept anything with a `log(LogLevel, impl Into<String>)`
//! method, so they work on both [`Logger`](crate::Logger) and
//! [`TransactionLogger`](crate::TransactionLogger).
//!
//! # Examples
//!
//! ```
//! use rust_driver_logger::prelude::*;
//! use rust_driver_logger::{info, warn};
//!
//! let logger = Logger::new(DriverManager::new());
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let tx = logger.begin_transaction(&Record::new().with("UserID", "42"));
//! warn!(tx, "Retry attempt {} of {}", 3, 5);
//! tx.end_transaction();
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_driver_logger::prelude::*;
/// # let logger = Logger::new(DriverManager::new());
/// use rust_driver_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_driver_logger::prelude::*;
/// # let logger = Logger::new(DriverManager::new());
/// use rust_driver_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
