//! Builds a `DriverManager` from registered factories and a `Config`

use super::{
    config::{load_config_from_file, Config},
    driver::{Driver, DriverFactory, DriverId},
    driver_manager::DriverManager,
    error::{LoggerError, Result},
    log_level::LogLevel,
    record::{Param, Record},
};
use std::path::Path;

/// Record parameter naming the driver that failed to initialize
pub const DRIVER_ID_PARAM: &str = "driver_id";
/// Record parameter carrying the initialization error text
pub const ERROR_PARAM: &str = "error";

/// A configured driver whose factory returned an error
#[derive(Debug)]
pub struct FailedDriver {
    pub id: DriverId,
    pub error: LoggerError,
}

/// Outcome of a factory pass over one config entry
pub enum DriverBuild {
    Created(Box<dyn Driver>),
    Failed(FailedDriver),
}

/// A manager built from configuration, possibly with some drivers missing
#[derive(Debug)]
pub enum ManagerInit {
    /// Every configured driver came up
    Ready(DriverManager),
    /// Some configured drivers failed; the manager holds the rest
    Degraded {
        manager: DriverManager,
        failures: Vec<FailedDriver>,
    },
}

impl ManagerInit {
    pub fn manager(&self) -> &DriverManager {
        match self {
            ManagerInit::Ready(manager) | ManagerInit::Degraded { manager, .. } => manager,
        }
    }

    pub fn into_manager(self) -> DriverManager {
        match self {
            ManagerInit::Ready(manager) | ManagerInit::Degraded { manager, .. } => manager,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ManagerInit::Degraded { .. })
    }

    pub fn failures(&self) -> &[FailedDriver] {
        match self {
            ManagerInit::Ready(_) => &[],
            ManagerInit::Degraded { failures, .. } => failures,
        }
    }

    /// `SomeDriversFailed` for a degraded start, `None` otherwise
    pub fn warning(&self) -> Option<LoggerError> {
        match self {
            ManagerInit::Ready(_) => None,
            ManagerInit::Degraded { failures, .. } => Some(LoggerError::SomeDriversFailed {
                driver_ids: failures.iter().map(|f| f.id.clone()).collect(),
            }),
        }
    }

    /// Split into the manager and the degraded-start signal
    pub fn into_parts(self) -> (DriverManager, Option<LoggerError>) {
        let warning = self.warning();
        (self.into_manager(), warning)
    }
}

/// Run every factory whose id is present in `config`, in factory order.
///
/// Factories without a config entry are skipped. A failing factory does not
/// stop the pass.
pub fn match_config_with_drivers(
    factories: &[Box<dyn DriverFactory>],
    config: &Config,
) -> Vec<DriverBuild> {
    factories
        .iter()
        .filter_map(|factory| {
            let id = factory.driver_id();
            let payload = config.driver(id.as_str())?;
            Some(match factory.create_driver(payload) {
                Ok(driver) => DriverBuild::Created(driver),
                Err(error) => DriverBuild::Failed(FailedDriver { id, error }),
            })
        })
        .collect()
}

/// Build a manager from `config` using `factories`.
///
/// - every configured driver failed: `Err(AllDriversFailed)` carrying each failure
/// - some failed: `ManagerInit::Degraded`; each failure is also logged once,
///   in factory order, through the drivers that did come up
/// - none failed, or nothing configured: `ManagerInit::Ready`
pub fn create_manager_with_config(
    factories: &[Box<dyn DriverFactory>],
    config: &Config,
) -> Result<ManagerInit> {
    let mut drivers = Vec::new();
    let mut failures = Vec::new();
    for build in match_config_with_drivers(factories, config) {
        match build {
            DriverBuild::Created(driver) => drivers.push(driver),
            DriverBuild::Failed(failed) => failures.push(failed),
        }
    }

    if drivers.is_empty() && !failures.is_empty() {
        return Err(LoggerError::AllDriversFailed { failures });
    }

    let mut manager = DriverManager::new();
    manager.add_drivers(drivers);

    if failures.is_empty() {
        return Ok(ManagerInit::Ready(manager));
    }

    for failed in &failures {
        manager.log(&failure_record(failed));
    }
    Ok(ManagerInit::Degraded { manager, failures })
}

/// Load a config file and build a manager from it
pub fn create_manager_from_file(
    factories: &[Box<dyn DriverFactory>],
    path: impl AsRef<Path>,
) -> Result<ManagerInit> {
    let config = load_config_from_file(path)?;
    create_manager_with_config(factories, &config)
}

fn failure_record(failed: &FailedDriver) -> Record {
    Record::entry(
        LogLevel::Error,
        format!("driver '{}' failed to initialize", failed.id),
    )
    .with(Param::new(DRIVER_ID_PARAM), failed.id.as_str())
    .with(Param::new(ERROR_PARAM), failed.error.to_string())
}
