//! Driver manager metrics
//!
//! Counters for what the manager has dispatched to its drivers and how many
//! driver calls panicked.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for driver manager observability
///
/// # Example
///
/// ```
/// use rust_driver_logger::DriverMetrics;
///
/// let metrics = DriverMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_driver_panic();
///
/// assert_eq!(metrics.records_dispatched(), 1);
/// assert_eq!(metrics.driver_panics(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DriverMetrics {
    /// Records handed to the fan-out (counted once per record, not per driver)
    records_dispatched: AtomicU64,

    transactions_begun: AtomicU64,

    transactions_ended: AtomicU64,

    /// Individual driver calls that panicked
    driver_panics: AtomicU64,
}

impl DriverMetrics {
    pub const fn new() -> Self {
        Self {
            records_dispatched: AtomicU64::new(0),
            transactions_begun: AtomicU64::new(0),
            transactions_ended: AtomicU64::new(0),
            driver_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_dispatched(&self) -> u64 {
        self.records_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn transactions_begun(&self) -> u64 {
        self.transactions_begun.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn transactions_ended(&self) -> u64 {
        self.transactions_ended.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn driver_panics(&self) -> u64 {
        self.driver_panics.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.records_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_transaction_begun(&self) -> u64 {
        self.transactions_begun.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_transaction_ended(&self) -> u64 {
        self.transactions_ended.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_driver_panic(&self) -> u64 {
        self.driver_panics.fetch_add(1, Ordering::Relaxed)
    }

    /// Transactions begun but not (yet) ended; duplicate ends can push this to zero early
    pub fn open_transactions(&self) -> u64 {
        self.transactions_begun()
            .saturating_sub(self.transactions_ended())
    }
}
