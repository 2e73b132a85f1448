//! Main logger implementation

use super::{
    config::Config,
    config_loader::create_manager_with_config,
    driver::{Driver, DriverFactory, TxId},
    driver_manager::DriverManager,
    error::{LoggerError, Result},
    log_level::LogLevel,
    metrics::DriverMetrics,
    record::{Param, Record},
    serializing::SerializingDriver,
};

/// Public logging surface over a [`DriverManager`].
///
/// Every severity call produces a record with `message`, `time` (Unix
/// seconds) and `level`, and hands it to all drivers.
///
/// # Example
///
/// ```
/// use rust_driver_logger::prelude::*;
///
/// let logger = Logger::new(DriverManager::new());
/// logger.info("service started");
///
/// let tx = logger.begin_transaction_with_component(
///     &Record::new().with("UserID", "123"),
///     "billing",
/// );
/// tx.warn("card declined, retrying");
/// tx.end_transaction();
/// ```
#[derive(Debug)]
pub struct Logger {
    manager: DriverManager,
}

impl Logger {
    #[must_use]
    pub fn new(manager: DriverManager) -> Self {
        Self { manager }
    }

    /// Build a logger from configuration.
    ///
    /// Returns the logger together with a `SomeDriversFailed` warning when the
    /// start was degraded; fails with `AllDriversFailed` when nothing came up.
    pub fn from_config(
        factories: &[Box<dyn DriverFactory>],
        config: &Config,
    ) -> Result<(Self, Option<LoggerError>)> {
        let (manager, warning) = create_manager_with_config(factories, config)?.into_parts();
        Ok((Self::new(manager), warning))
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_driver_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .driver(ConsoleDriver::new())
    ///     .build();
    /// logger.debug("ready");
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn manager(&self) -> &DriverManager {
        &self.manager
    }

    pub fn metrics(&self) -> &DriverMetrics {
        self.manager.metrics()
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.manager.log(&Record::entry(level, message));
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Start a transaction; records logged through the returned value carry its id
    pub fn begin_transaction(&self, attributes: &Record) -> TransactionLogger<'_> {
        self.start_transaction(attributes, None)
    }

    /// Start a transaction whose records also carry `component`
    pub fn begin_transaction_with_component(
        &self,
        attributes: &Record,
        component: impl Into<String>,
    ) -> TransactionLogger<'_> {
        self.start_transaction(attributes, Some(component.into()))
    }

    fn start_transaction(&self, attributes: &Record, component: Option<String>) -> TransactionLogger<'_> {
        let id = self.manager.begin_transaction(attributes);
        TransactionLogger {
            logger: self,
            id,
            component,
        }
    }

    /// Stop every driver. Further calls reach no driver.
    pub fn stop(&mut self) {
        self.manager.stop();
    }
}

/// Logger bound to one transaction.
///
/// Dropping it without [`end_transaction`](Self::end_transaction) leaves the
/// transaction open in every driver.
#[derive(Debug)]
pub struct TransactionLogger<'a> {
    logger: &'a Logger,
    id: TxId,
    component: Option<String>,
}

impl TransactionLogger<'_> {
    pub fn id(&self) -> TxId {
        self.id
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let mut record = Record::entry(level, message).with(Param::TX_ID, self.id.to_string());
        if let Some(ref component) = self.component {
            record.insert(Param::COMPONENT, component.as_str());
        }
        self.logger.manager.log(&record);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// End the transaction; consumes the value so it cannot be ended twice
    pub fn end_transaction(self) {
        self.logger.manager.end_transaction(self.id);
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_driver_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .serialized_driver(ConsoleDriver::with_user_readable_time(true))
///     .build();
/// assert_eq!(logger.manager().len(), 1);
/// ```
#[derive(Default)]
pub struct LoggerBuilder {
    drivers: Vec<Box<dyn Driver>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a driver; fan-out follows the order drivers are added
    #[must_use = "builder methods return a new value"]
    pub fn driver<D: Driver + 'static>(mut self, driver: D) -> Self {
        self.drivers.push(Box::new(driver));
        self
    }

    /// Add a driver wrapped in a [`SerializingDriver`]
    ///
    /// # Panics
    ///
    /// Panics if `driver` is already serializing.
    #[must_use = "builder methods return a new value"]
    pub fn serialized_driver<D: Driver + 'static>(mut self, driver: D) -> Self {
        self.drivers.push(SerializingDriver::boxed(Box::new(driver)));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_driver(mut self, driver: Box<dyn Driver>) -> Self {
        self.drivers.push(driver);
        self
    }

    pub fn build(self) -> Logger {
        let mut manager = DriverManager::new();
        manager.add_drivers(self.drivers);
        Logger::new(manager)
    }
}
