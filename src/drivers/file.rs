//! File driver implementation

use super::format::{begin_transaction_record, end_transaction_record, format_line};
use super::parse_payload;
use crate::core::{Driver, DriverFactory, DriverId, LoggerError, Record, Result, TxId};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::value::RawValue;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const FILE_DRIVER_ID: &str = "file";

/// Payload under `drivers.file`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileConfig {
    pub file_path: PathBuf,
    pub user_readable_time: bool,
}

/// Appends one line per record to a file, flushing after each line
pub struct FileDriver {
    path: PathBuf,
    user_readable_time: bool,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileDriver {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(FileConfig {
            file_path: path.into(),
            user_readable_time: false,
        })
    }

    pub fn with_config(config: FileConfig) -> Result<Self> {
        if config.file_path.as_os_str().is_empty() {
            return Err(LoggerError::config("FileDriver", "filePath is required"));
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.file_path)
            .map_err(|e| {
                LoggerError::driver_creation(
                    FILE_DRIVER_ID,
                    format!("failed to open file '{}': {}", config.file_path.display(), e),
                )
            })?;

        Ok(Self {
            path: config.file_path,
            user_readable_time: config.user_readable_time,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    #[must_use]
    pub fn with_user_readable_time(mut self, user_readable_time: bool) -> Self {
        self.user_readable_time = user_readable_time;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut guard = self.writer.lock();
        // Closed by stop(); nothing to write to
        let Some(writer) = guard.as_mut() else {
            return Ok(());
        };
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl Driver for FileDriver {
    fn log(&self, record: &Record) {
        let line = format_line(record, self.user_readable_time);
        if let Err(e) = self.write_line(&line) {
            eprintln!(
                "[LOGGER ERROR] File driver failed to write to '{}': {}",
                self.path.display(),
                e
            );
        }
    }

    fn begin_transaction(&self, id: TxId, attributes: &Record) {
        self.log(&begin_transaction_record(id, attributes));
    }

    fn end_transaction(&self, id: TxId) {
        self.log(&end_transaction_record(id));
    }

    fn stop(&mut self) {
        if let Some(mut writer) = self.writer.get_mut().take() {
            if let Err(e) = writer.flush() {
                eprintln!(
                    "[LOGGER ERROR] File driver failed to flush '{}' on stop: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }

    fn name(&self) -> &str {
        FILE_DRIVER_ID
    }
}

pub struct FileDriverFactory;

impl DriverFactory for FileDriverFactory {
    fn driver_id(&self) -> DriverId {
        DriverId::new(FILE_DRIVER_ID)
    }

    fn create_driver(&self, config: &RawValue) -> Result<Box<dyn Driver>> {
        let config: FileConfig = parse_payload(FILE_DRIVER_ID, config)?;
        Ok(Box::new(FileDriver::with_config(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use std::fs;
    use tempfile::tempdir;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn raw(json: String) -> Box<RawValue> {
        RawValue::from_string(json).unwrap()
    }

    #[test]
    fn test_writes_one_line_per_record() -> TestResult {
        let dir = tempdir()?;
        let log_path = dir.path().join("app.log");
        let mut driver = FileDriver::new(&log_path)?;

        driver.log(&Record::entry(LogLevel::Info, "first"));
        driver.begin_transaction(TxId::new(1), &Record::new().with("UserID", "123"));
        driver.log(&Record::entry(LogLevel::Warn, "inside").with("txID", "1"));
        driver.end_transaction(TxId::new(1));
        driver.stop();

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("INFO  first"));
        assert!(lines[1].contains("TX Begin; Params: {UserID=123}; TxID=[1]"));
        assert!(lines[2].contains("WARN  inside; TxID=[1]"));
        assert!(lines[3].contains("TX End; TxID=[1]"));
        Ok(())
    }

    #[test]
    fn test_appends_to_existing_file() -> TestResult {
        let dir = tempdir()?;
        let log_path = dir.path().join("app.log");
        fs::write(&log_path, "existing\n")?;

        let mut driver = FileDriver::new(&log_path)?;
        driver.log(&Record::entry(LogLevel::Debug, "new"));
        driver.stop();

        let content = fs::read_to_string(&log_path)?;
        assert!(content.starts_with("existing\n"));
        assert_eq!(content.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_log_after_stop_is_ignored() -> TestResult {
        let dir = tempdir()?;
        let log_path = dir.path().join("app.log");
        let mut driver = FileDriver::new(&log_path)?;
        driver.stop();
        driver.log(&Record::entry(LogLevel::Info, "late"));

        assert_eq!(fs::read_to_string(&log_path)?, "");
        Ok(())
    }

    #[test]
    fn test_factory_from_payload() -> TestResult {
        let dir = tempdir()?;
        let log_path = dir.path().join("factory.log");
        let payload = serde_json::json!({ "filePath": log_path, "userReadableTime": true });

        let driver = FileDriverFactory.create_driver(&raw(payload.to_string()))?;
        assert_eq!(driver.name(), "file");
        assert!(log_path.exists());
        Ok(())
    }

    #[test]
    fn test_factory_requires_path() {
        let err = FileDriverFactory.create_driver(&raw("{}".to_string())).err().unwrap();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_factory_reports_unopenable_path() -> TestResult {
        let dir = tempdir()?;
        let bad = dir.path().join("missing-dir").join("app.log");
        let payload = serde_json::json!({ "filePath": bad });

        let err = FileDriverFactory.create_driver(&raw(payload.to_string())).err().unwrap();
        assert!(err.to_string().contains("failed to open file"));
        Ok(())
    }
}
