//! Driver and driver factory traits

use super::{error::Result, record::Record};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::borrow::Borrow;
use std::fmt;

/// Name of a driver kind; the key under `drivers` in the configuration
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(String);

impl DriverId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DriverId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DriverId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DriverId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction identifier issued by a `DriverManager`
///
/// Identifiers start at 1 for each manager and are never reused by it. The
/// string form stored under `txID` is the plain decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(u64);

impl TxId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A backend that absorbs log records and transaction boundaries.
///
/// None of the operations return errors: a driver that cannot write reports
/// the problem itself (stderr) and carries on. The manager may call
/// `log`, `begin_transaction` and `end_transaction` from several threads at
/// once; a driver that cannot tolerate that should be registered inside a
/// [`SerializingDriver`](crate::core::SerializingDriver).
pub trait Driver: Send + Sync {
    fn log(&self, record: &Record);

    fn begin_transaction(&self, id: TxId, attributes: &Record);

    fn end_transaction(&self, id: TxId);

    /// Release resources. Called exactly once, by the owning manager.
    fn stop(&mut self);

    fn name(&self) -> &str;

    /// True for drivers that already serialize every call
    fn is_serializing(&self) -> bool {
        false
    }
}

/// Builds a driver from its raw configuration payload
pub trait DriverFactory {
    fn driver_id(&self) -> DriverId;

    /// `config` is the JSON value found under this factory's id, verbatim
    fn create_driver(&self, config: &RawValue) -> Result<Box<dyn Driver>>;

    fn is_serializing(&self) -> bool {
        false
    }
}
