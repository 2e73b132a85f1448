//! Logger configuration
//!
//! The configuration is a JSON object with a single recognized key, `drivers`,
//! mapping driver ids to driver-specific payloads:
//!
//! ```json
//! {
//!   "drivers": {
//!     "console": { "userReadableTime": true },
//!     "file": { "filePath": "/var/log/app.log" }
//!   }
//! }
//! ```
//!
//! Payloads are kept as raw JSON and handed verbatim to the matching factory.

use super::{
    driver::DriverId,
    error::{LoggerError, Result},
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub drivers: BTreeMap<DriverId, Box<RawValue>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<DriverId, Box<RawValue>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Add or replace the payload for `id`
    #[must_use]
    pub fn with_driver(mut self, id: impl Into<DriverId>, payload: Box<RawValue>) -> Self {
        self.drivers.insert(id.into(), payload);
        self
    }

    /// Like [`Config::with_driver`], validating `payload` as JSON first
    pub fn with_driver_json(self, id: impl Into<DriverId>, payload: &str) -> Result<Self> {
        let raw = RawValue::from_string(payload.to_string())?;
        Ok(self.with_driver(id, raw))
    }

    pub fn driver(&self, id: &str) -> Option<&RawValue> {
        self.drivers.get(id).map(Box::as_ref)
    }

    pub fn contains_driver(&self, id: &str) -> bool {
        self.drivers.contains_key(id)
    }

    pub fn driver_ids(&self) -> impl Iterator<Item = &DriverId> {
        self.drivers.keys()
    }
}

impl FromStr for Config {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Read and parse a configuration file
pub fn load_config_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| LoggerError::config_read(path.display().to_string(), e))?;
    Config::from_slice(&data)
}
