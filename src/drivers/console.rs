//! Console driver implementation

use super::format::{begin_transaction_record, end_transaction_record, format_line, render_line};
use super::parse_payload;
use crate::core::{Driver, DriverFactory, DriverId, KnownParams, LogLevel, Record, Result, TxId};
use colored::{Color, Colorize};
use serde::Deserialize;
use serde_json::value::RawValue;
use std::io::{self, Write};

pub const CONSOLE_DRIVER_ID: &str = "console";

/// Payload under `drivers.console`
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsoleConfig {
    pub user_readable_time: bool,
    pub colors: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            user_readable_time: false,
            colors: true,
        }
    }
}

/// Writes one line per record; `error` lines go to stderr, the rest to stdout
pub struct ConsoleDriver {
    config: ConsoleConfig,
}

impl ConsoleDriver {
    pub fn new() -> Self {
        Self::with_config(ConsoleConfig::default())
    }

    pub fn with_config(config: ConsoleConfig) -> Self {
        Self { config }
    }

    pub fn with_user_readable_time(user_readable_time: bool) -> Self {
        Self::with_config(ConsoleConfig {
            user_readable_time,
            ..ConsoleConfig::default()
        })
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.config.colors = colors;
        self
    }

    fn format(&self, record: &Record) -> String {
        if !self.config.colors {
            return format_line(record, self.config.user_readable_time);
        }
        let params = KnownParams::from_record(record);
        let padded = format!("{:<5}", params.level);
        let level = match record.level() {
            Some(level) => padded.color(level_color(level)).to_string(),
            None => padded,
        };
        render_line(&params, self.config.user_readable_time, &level)
    }
}

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Debug => Color::Blue,
        LogLevel::Info => Color::Green,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Error => Color::Red,
    }
}

impl Default for ConsoleDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for ConsoleDriver {
    fn log(&self, record: &Record) {
        let output = self.format(record);
        match record.level() {
            Some(LogLevel::Error) => eprintln!("{}", output),
            _ => println!("{}", output),
        }
    }

    fn begin_transaction(&self, id: TxId, attributes: &Record) {
        self.log(&begin_transaction_record(id, attributes));
    }

    fn end_transaction(&self, id: TxId) {
        self.log(&end_transaction_record(id));
    }

    fn stop(&mut self) {
        if let Err(e) = io::stdout().flush() {
            eprintln!("[LOGGER ERROR] Console driver failed to flush stdout on stop: {}", e);
        }
        if let Err(e) = io::stderr().flush() {
            eprintln!("[LOGGER ERROR] Console driver failed to flush stderr on stop: {}", e);
        }
    }

    fn name(&self) -> &str {
        CONSOLE_DRIVER_ID
    }
}

pub struct ConsoleDriverFactory;

impl DriverFactory for ConsoleDriverFactory {
    fn driver_id(&self) -> DriverId {
        DriverId::new(CONSOLE_DRIVER_ID)
    }

    fn create_driver(&self, config: &RawValue) -> Result<Box<dyn Driver>> {
        let config: ConsoleConfig = parse_payload(CONSOLE_DRIVER_ID, config)?;
        Ok(Box::new(ConsoleDriver::with_config(config)))
    }
}
