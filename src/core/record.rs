//! Log records: string-valued parameter maps shared by every driver
//!
//! A [`Record`] maps parameter names to string values. Five parameters have
//! defined meaning (`message`, `time`, `level`, `component`, `txID`); any other
//! key is carried through to the drivers untouched.

use super::log_level::LogLevel;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Name of a record parameter
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Param(Cow<'static, str>);

impl Param {
    pub const MESSAGE: Param = Param(Cow::Borrowed("message"));
    /// Unix timestamp in seconds, decimal string
    pub const TIME: Param = Param(Cow::Borrowed("time"));
    pub const LEVEL: Param = Param(Cow::Borrowed("level"));
    pub const COMPONENT: Param = Param(Cow::Borrowed("component"));
    pub const TX_ID: Param = Param(Cow::Borrowed("txID"));

    pub fn new(name: impl Into<String>) -> Self {
        Param(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Param {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Param {
    fn from(name: &str) -> Self {
        Param::new(name)
    }
}

impl From<String> for Param {
    fn from(name: String) -> Self {
        Param::new(name)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One log record or set of transaction attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<Param, String>);

impl Record {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Base record for a severity call: message, current time and level
    pub fn entry(level: LogLevel, message: impl Into<String>) -> Self {
        Self::new()
            .with(Param::MESSAGE, message)
            .with(Param::TIME, Utc::now().timestamp().to_string())
            .with(Param::LEVEL, level.as_str())
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<Param>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a parameter, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<Param>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Param, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    pub fn message(&self) -> Option<&str> {
        self.get(Param::MESSAGE.as_str())
    }

    /// Level parsed case-insensitively; `None` when absent or unknown
    pub fn level(&self) -> Option<LogLevel> {
        self.get(Param::LEVEL.as_str())?.parse().ok()
    }

    pub fn component(&self) -> Option<&str> {
        self.get(Param::COMPONENT.as_str())
    }

    pub fn tx_id(&self) -> Option<&str> {
        self.get(Param::TX_ID.as_str())
    }
}

impl<K: Into<Param>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<Param>, V: Into<String>, const N: usize> From<[(K, V); N]> for Record {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for Record {
    type Item = (Param, String);
    type IntoIter = btree_map::IntoIter<Param, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Renders as `{key=value, ...}` in key order
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (key, value)) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        f.write_str("}")
    }
}

/// The well-known parameters of a record, normalized for output
///
/// Missing or unparseable `time` falls back to the current time; the level is
/// upper-cased; absent string parameters are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownParams {
    pub timestamp: i64,
    pub level: String,
    pub message: String,
    pub component: String,
    pub tx_id: String,
}

impl KnownParams {
    pub fn from_record(record: &Record) -> Self {
        let timestamp = record
            .get(Param::TIME.as_str())
            .and_then(|t| t.trim().parse::<i64>().ok())
            .filter(|t| *t != 0)
            .unwrap_or_else(|| Utc::now().timestamp());

        Self {
            timestamp,
            level: record
                .get(Param::LEVEL.as_str())
                .map(str::to_uppercase)
                .unwrap_or_default(),
            message: record.message().unwrap_or_default().to_string(),
            component: record.component().unwrap_or_default().to_string(),
            tx_id: record.tx_id().unwrap_or_default().to_string(),
        }
    }
}
