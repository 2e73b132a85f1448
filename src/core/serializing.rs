//! Serializing decorator for drivers that cannot take concurrent calls

use super::{
    driver::{Driver, DriverFactory, DriverId, TxId},
    error::{LoggerError, Result},
    record::Record,
};
use parking_lot::Mutex;
use serde_json::value::RawValue;

/// Appended to the wrapped factory's id
pub const SERIAL_DRIVER_ID_SUFFIX: &str = "-serial";

/// Wraps one driver so that at most one call is inside it at any time.
///
/// All four operations take the same lock, so a `log` never overlaps a
/// `begin_transaction` on the wrapped driver either.
pub struct SerializingDriver {
    inner: Box<dyn Driver>,
    lock: Mutex<()>,
}

impl SerializingDriver {
    /// Wrap `driver`.
    ///
    /// # Panics
    ///
    /// Panics if `driver` is itself serializing. Use [`SerializingDriver::try_new`]
    /// to get an error instead.
    pub fn new(driver: Box<dyn Driver>) -> Self {
        match Self::try_new(driver) {
            Ok(serializing) => serializing,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(driver: Box<dyn Driver>) -> Result<Self> {
        if driver.is_serializing() {
            return Err(LoggerError::nested_serializing(driver.name()));
        }
        Ok(Self {
            inner: driver,
            lock: Mutex::new(()),
        })
    }

    pub fn boxed(driver: Box<dyn Driver>) -> Box<dyn Driver> {
        Box::new(Self::new(driver))
    }
}

impl Driver for SerializingDriver {
    fn log(&self, record: &Record) {
        let _guard = self.lock.lock();
        self.inner.log(record);
    }

    fn begin_transaction(&self, id: TxId, attributes: &Record) {
        let _guard = self.lock.lock();
        self.inner.begin_transaction(id, attributes);
    }

    fn end_transaction(&self, id: TxId) {
        let _guard = self.lock.lock();
        self.inner.end_transaction(id);
    }

    fn stop(&mut self) {
        let _guard = self.lock.lock();
        self.inner.stop();
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn is_serializing(&self) -> bool {
        true
    }
}

/// Factory decorator whose drivers come out wrapped in a [`SerializingDriver`].
///
/// Registered under the inner id with [`SERIAL_DRIVER_ID_SUFFIX`] appended, so
/// a config can choose `"file"` or `"file-serial"`.
pub struct SerializingDriverFactory {
    inner: Box<dyn DriverFactory>,
}

impl SerializingDriverFactory {
    /// # Panics
    ///
    /// Panics if `factory` is itself a serializing factory.
    pub fn new(factory: Box<dyn DriverFactory>) -> Self {
        match Self::try_new(factory) {
            Ok(serializing) => serializing,
            Err(e) => panic!("{}", e),
        }
    }

    pub fn try_new(factory: Box<dyn DriverFactory>) -> Result<Self> {
        if factory.is_serializing() {
            return Err(LoggerError::nested_serializing(factory.driver_id().as_str()));
        }
        Ok(Self { inner: factory })
    }
}

impl DriverFactory for SerializingDriverFactory {
    fn driver_id(&self) -> DriverId {
        DriverId::new(format!("{}{}", self.inner.driver_id(), SERIAL_DRIVER_ID_SUFFIX))
    }

    fn create_driver(&self, config: &RawValue) -> Result<Box<dyn Driver>> {
        // An inner factory handing back a serializing driver is a nesting error
        let driver = self.inner.create_driver(config)?;
        Ok(Box::new(SerializingDriver::try_new(driver)?))
    }

    fn is_serializing(&self) -> bool {
        true
    }
}
