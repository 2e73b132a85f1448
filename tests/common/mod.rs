//! Shared test drivers and factories

#![allow(dead_code)]

use parking_lot::Mutex;
use rust_driver_logger::{Driver, DriverFactory, DriverId, LoggerError, Record, Result, TxId};
use serde_json::value::RawValue;
use std::sync::Arc;

/// One call observed by a [`RecordingDriver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Log { driver: String, record: Record },
    Begin { driver: String, id: TxId, attributes: Record },
    End { driver: String, id: TxId },
    Stop { driver: String },
}

impl Event {
    pub fn driver(&self) -> &str {
        match self {
            Event::Log { driver, .. }
            | Event::Begin { driver, .. }
            | Event::End { driver, .. }
            | Event::Stop { driver } => driver,
        }
    }
}

/// Event log shared between drivers so cross-driver ordering is visible
pub type Journal = Arc<Mutex<Vec<Event>>>;

pub struct RecordingDriver {
    name: String,
    journal: Journal,
}

impl RecordingDriver {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: Arc::clone(journal),
        }
    }

    pub fn boxed(name: &str, journal: &Journal) -> Box<dyn Driver> {
        Box::new(Self::new(name, journal))
    }
}

impl Driver for RecordingDriver {
    fn log(&self, record: &Record) {
        self.journal.lock().push(Event::Log {
            driver: self.name.clone(),
            record: record.clone(),
        });
    }

    fn begin_transaction(&self, id: TxId, attributes: &Record) {
        self.journal.lock().push(Event::Begin {
            driver: self.name.clone(),
            id,
            attributes: attributes.clone(),
        });
    }

    fn end_transaction(&self, id: TxId) {
        self.journal.lock().push(Event::End {
            driver: self.name.clone(),
            id,
        });
    }

    fn stop(&mut self) {
        self.journal.lock().push(Event::Stop {
            driver: self.name.clone(),
        });
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builds [`RecordingDriver`]s, remembering the payloads it was given
pub struct RecordingFactory {
    id: String,
    journal: Journal,
    pub payloads: Arc<Mutex<Vec<String>>>,
}

impl RecordingFactory {
    pub fn new(id: &str, journal: &Journal) -> Self {
        Self {
            id: id.to_string(),
            journal: Arc::clone(journal),
            payloads: Arc::default(),
        }
    }
}

impl DriverFactory for RecordingFactory {
    fn driver_id(&self) -> DriverId {
        DriverId::new(self.id.as_str())
    }

    fn create_driver(&self, config: &RawValue) -> Result<Box<dyn Driver>> {
        self.payloads.lock().push(config.get().to_string());
        Ok(RecordingDriver::boxed(&self.id, &self.journal))
    }
}

pub struct FailingFactory {
    id: String,
}

impl FailingFactory {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

impl DriverFactory for FailingFactory {
    fn driver_id(&self) -> DriverId {
        DriverId::new(self.id.as_str())
    }

    fn create_driver(&self, _config: &RawValue) -> Result<Box<dyn Driver>> {
        Err(LoggerError::driver_creation(self.id.as_str(), "failed to create driver"))
    }
}

pub fn events_for<'a>(events: &'a [Event], driver: &str) -> Vec<&'a Event> {
    events.iter().filter(|e| e.driver() == driver).collect()
}
