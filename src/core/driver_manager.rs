//! Fan-out of records and transaction boundaries to every registered driver

use super::{
    driver::{Driver, TxId},
    metrics::DriverMetrics,
    record::Record,
};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

/// Owns an ordered set of drivers and issues transaction identifiers.
///
/// Every operation is delivered to each driver in the order the drivers were
/// added. The fan-out itself takes no lock: concurrent callers may reach the
/// same driver at the same time. Only the transaction counter is atomic.
pub struct DriverManager {
    drivers: Vec<Box<dyn Driver>>,
    last_tx_id: AtomicU64,
    metrics: DriverMetrics,
    stopped: bool,
}

impl DriverManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            drivers: Vec::new(),
            last_tx_id: AtomicU64::new(0),
            metrics: DriverMetrics::new(),
            stopped: false,
        }
    }

    /// Append a driver. No deduplication: adding the same backend twice
    /// delivers everything to it twice.
    pub fn add_driver(&mut self, driver: Box<dyn Driver>) {
        self.drivers.push(driver);
    }

    pub fn add_drivers(&mut self, drivers: impl IntoIterator<Item = Box<dyn Driver>>) {
        self.drivers.extend(drivers);
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    /// Driver names in fan-out order
    pub fn driver_names(&self) -> Vec<&str> {
        self.drivers.iter().map(|d| d.name()).collect()
    }

    pub fn metrics(&self) -> &DriverMetrics {
        &self.metrics
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn log(&self, record: &Record) {
        self.metrics.record_dispatched();
        self.dispatch("log", |driver| driver.log(record));
    }

    /// Issue the next transaction id and announce it to every driver.
    ///
    /// The increment is atomic, so concurrent callers always receive distinct
    /// ids forming the sequence 1, 2, 3, ... without gaps.
    pub fn begin_transaction(&self, attributes: &Record) -> TxId {
        let id = TxId::new(self.last_tx_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.metrics.record_transaction_begun();
        self.dispatch("begin_transaction", |driver| {
            driver.begin_transaction(id, attributes)
        });
        id
    }

    /// Forward an end event. Unknown or already-ended ids are forwarded as is.
    pub fn end_transaction(&self, id: TxId) {
        self.metrics.record_transaction_ended();
        self.dispatch("end_transaction", |driver| driver.end_transaction(id));
    }

    /// Stop every driver once, in order, and release them.
    ///
    /// The manager keeps no drivers afterwards, so later calls reach nobody
    /// and a second `stop` does nothing.
    pub fn stop(&mut self) {
        self.stopped = true;
        for (idx, mut driver) in std::mem::take(&mut self.drivers).into_iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| driver.stop()));
            if let Err(panic_info) = result {
                self.report_panic(idx, driver.name(), "stop", panic_info.as_ref());
            }
        }
    }

    /// Per-driver panic isolation: a driver that panics is reported and the
    /// remaining drivers still receive the call.
    fn dispatch(&self, operation: &str, call: impl Fn(&dyn Driver)) {
        for (idx, driver) in self.drivers.iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| call(driver.as_ref())));
            if let Err(panic_info) = result {
                self.report_panic(idx, driver.name(), operation, panic_info.as_ref());
            }
        }
    }

    fn report_panic(&self, idx: usize, name: &str, operation: &str, panic_info: &(dyn Any + Send)) {
        self.metrics.record_driver_panic();
        eprintln!(
            "[LOGGER CRITICAL] Driver #{} ({}) panicked during {}: {}. \
             Other drivers continue to function.",
            idx,
            name,
            operation,
            panic_message(panic_info)
        );
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Default for DriverManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DriverManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverManager")
            .field("drivers", &self.driver_names())
            .field("last_tx_id", &self.last_tx_id.load(Ordering::SeqCst))
            .field("stopped", &self.stopped)
            .finish()
    }
}

impl Drop for DriverManager {
    fn drop(&mut self) {
        // Drivers still owned here were never stopped
        if !self.drivers.is_empty() {
            self.stop();
        }
    }
}
