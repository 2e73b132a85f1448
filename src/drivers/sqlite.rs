//! Embedded database driver backed by SQLite
//!
//! Records land in a `logs` table; each transaction becomes one row of a
//! `transactions` table with start and end timestamps plus any configured
//! attribute columns.

use super::parse_payload;
use crate::core::{
    Driver, DriverFactory, DriverId, KnownParams, LoggerError, Record, Result, TxId,
};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, params_from_iter, types::Value, Connection};
use serde::Deserialize;
use serde_json::value::RawValue;
use std::path::PathBuf;

pub const SQLITE_DRIVER_ID: &str = "sqlite";

const RESERVED_COLUMNS: [&str; 3] = ["start_timestamp", "id", "end_timestamp"];

/// Payload under `drivers.sqlite`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SqliteConfig {
    pub db_path: PathBuf,
    /// Transaction attributes stored as their own columns
    pub tx_attr: Vec<String>,
}

pub struct SqliteDriver {
    db_path: PathBuf,
    tx_attr: Vec<String>,
    conn: Mutex<Option<Connection>>,
}

impl SqliteDriver {
    pub fn open(config: SqliteConfig) -> Result<Self> {
        if config.db_path.as_os_str().is_empty() {
            return Err(LoggerError::config("SqliteDriver", "dbPath is required"));
        }
        for attr in &config.tx_attr {
            validate_column(attr)?;
        }

        let conn = Connection::open(&config.db_path)
            .map_err(|e| LoggerError::database("opening database", e.to_string()))?;
        conn.execute_batch(&schema(&config.tx_attr))
            .map_err(|e| LoggerError::database("creating tables", e.to_string()))?;

        Ok(Self {
            db_path: config.db_path,
            tx_attr: config.tx_attr,
            conn: Mutex::new(Some(conn)),
        })
    }

    fn with_connection(&self, operation: &str, f: impl FnOnce(&Connection) -> rusqlite::Result<()>) {
        let guard = self.conn.lock();
        let Some(conn) = guard.as_ref() else {
            return;
        };
        if let Err(e) = f(conn) {
            eprintln!(
                "[LOGGER ERROR] SQLite driver failed while {} in '{}': {}",
                operation,
                self.db_path.display(),
                e
            );
        }
    }
}

fn validate_column(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid_start || !valid_rest {
        return Err(LoggerError::config(
            "SqliteDriver",
            format!("txAttr '{}' is not a valid column name", name),
        ));
    }
    if RESERVED_COLUMNS.contains(&name.to_ascii_lowercase().as_str()) {
        return Err(LoggerError::config(
            "SqliteDriver",
            format!("txAttr '{}' collides with a built-in column", name),
        ));
    }
    Ok(())
}

fn schema(tx_attr: &[String]) -> String {
    let attr_columns: String = tx_attr
        .iter()
        .map(|attr| format!("\"{}\" TEXT,\n", attr))
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS transactions (
            start_timestamp INTEGER,
            id INTEGER,
            end_timestamp INTEGER,
            {}PRIMARY KEY (start_timestamp, id)
        );
        CREATE TABLE IF NOT EXISTS logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp INTEGER,
            level TEXT,
            message TEXT,
            component TEXT,
            tx_id TEXT
        );",
        attr_columns
    )
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

impl Driver for SqliteDriver {
    fn log(&self, record: &Record) {
        let p = KnownParams::from_record(record);
        self.with_connection("inserting log", |conn| {
            conn.execute(
                "INSERT INTO logs (timestamp, level, message, component, tx_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    p.timestamp,
                    p.level,
                    p.message,
                    non_empty(&p.component),
                    non_empty(&p.tx_id)
                ],
            )
            .map(|_| ())
        });
    }

    fn begin_transaction(&self, id: TxId, attributes: &Record) {
        let Ok(id) = i64::try_from(id.get()) else {
            eprintln!("[LOGGER ERROR] SQLite driver cannot store transaction id {}", id);
            return;
        };
        let p = KnownParams::from_record(attributes);

        let mut columns = vec!["start_timestamp".to_string(), "id".to_string()];
        let mut values = vec![Value::Integer(p.timestamp), Value::Integer(id)];
        for attr in &self.tx_attr {
            if let Some(value) = attributes.get(attr) {
                columns.push(format!("\"{}\"", attr));
                values.push(Value::Text(value.to_string()));
            }
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        let sql = format!(
            "INSERT INTO transactions ({}) VALUES ({})",
            columns.join(", "),
            placeholders
        );

        self.with_connection("recording transaction begin", |conn| {
            conn.execute(&sql, params_from_iter(values)).map(|_| ())
        });
    }

    fn end_transaction(&self, id: TxId) {
        let Ok(id) = i64::try_from(id.get()) else {
            eprintln!("[LOGGER ERROR] SQLite driver cannot store transaction id {}", id);
            return;
        };
        // Only the first end for an id is recorded
        self.with_connection("recording transaction end", |conn| {
            conn.execute(
                "UPDATE transactions SET end_timestamp = ?1
                 WHERE id = ?2 AND end_timestamp IS NULL",
                params![Utc::now().timestamp(), id],
            )
            .map(|_| ())
        });
    }

    fn stop(&mut self) {
        if let Some(conn) = self.conn.get_mut().take() {
            if let Err((_, e)) = conn.close() {
                eprintln!(
                    "[LOGGER ERROR] SQLite driver failed to close '{}': {}",
                    self.db_path.display(),
                    e
                );
            }
        }
    }

    fn name(&self) -> &str {
        SQLITE_DRIVER_ID
    }
}

pub struct SqliteDriverFactory;

impl DriverFactory for SqliteDriverFactory {
    fn driver_id(&self) -> DriverId {
        DriverId::new(SQLITE_DRIVER_ID)
    }

    fn create_driver(&self, config: &RawValue) -> Result<Box<dyn Driver>> {
        let config: SqliteConfig = parse_payload(SQLITE_DRIVER_ID, config)?;
        Ok(Box::new(SqliteDriver::open(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, Param};
    use tempfile::tempdir;

    fn open(path: PathBuf, tx_attr: &[&str]) -> SqliteDriver {
        SqliteDriver::open(SqliteConfig {
            db_path: path,
            tx_attr: tx_attr.iter().map(|s| s.to_string()).collect(),
        })
        .unwrap()
    }

    #[test]
    fn test_logs_are_inserted() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("logs.db");
        let mut driver = open(db_path.clone(), &[]);

        driver.log(&Record::entry(LogLevel::Warn, "low disk").with(Param::COMPONENT, "storage"));
        driver.log(&Record::entry(LogLevel::Info, "in tx").with(Param::TX_ID, "3"));
        driver.stop();

        let conn = Connection::open(&db_path).unwrap();
        let rows: Vec<(String, String, Option<String>, Option<String>)> = conn
            .prepare("SELECT level, message, component, tx_id FROM logs ORDER BY id")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();

        assert_eq!(
            rows,
            vec![
                ("WARN".to_string(), "low disk".to_string(), Some("storage".to_string()), None),
                ("INFO".to_string(), "in tx".to_string(), None, Some("3".to_string())),
            ]
        );
    }

    #[test]
    fn test_transaction_rows() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("tx.db");
        let mut driver = open(db_path.clone(), &["UserID", "Region"]);

        let attributes = Record::new()
            .with(Param::TIME, "1700000000")
            .with("UserID", "123")
            .with("Ignored", "x");
        driver.begin_transaction(TxId::new(1), &attributes);
        driver.end_transaction(TxId::new(1));
        driver.stop();

        let conn = Connection::open(&db_path).unwrap();
        let (start, id, end, user, region): (i64, i64, Option<i64>, Option<String>, Option<String>) = conn
            .query_row(
                "SELECT start_timestamp, id, end_timestamp, UserID, Region FROM transactions",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .unwrap();

        assert_eq!(start, 1_700_000_000);
        assert_eq!(id, 1);
        assert!(end.is_some());
        assert_eq!(user.as_deref(), Some("123"));
        assert_eq!(region, None);
    }

    #[test]
    fn test_second_end_keeps_first_timestamp() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("tx.db");
        let mut driver = open(db_path.clone(), &[]);

        driver.begin_transaction(TxId::new(1), &Record::new());
        driver.end_transaction(TxId::new(1));
        {
            let guard = driver.conn.lock();
            guard
                .as_ref()
                .unwrap()
                .execute("UPDATE transactions SET end_timestamp = 5 WHERE id = 1", [])
                .unwrap();
        }
        driver.end_transaction(TxId::new(1));
        driver.stop();

        let conn = Connection::open(&db_path).unwrap();
        let end: i64 = conn
            .query_row("SELECT end_timestamp FROM transactions WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(end, 5);
    }

    #[test]
    fn test_schema_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("again.db");
        open(db_path.clone(), &["UserID"]).stop();
        open(db_path, &["UserID"]).stop();
    }

    #[test]
    fn test_rejects_unsafe_column_names() {
        let dir = tempdir().unwrap();
        let err = SqliteDriver::open(SqliteConfig {
            db_path: dir.path().join("bad.db"),
            tx_attr: vec!["x TEXT); DROP TABLE logs; --".to_string()],
        })
        .err()
        .unwrap();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        assert!(validate_column("end_timestamp").is_err());
        assert!(validate_column("9lives").is_err());
        assert!(validate_column("user_id").is_ok());
    }

    #[test]
    fn test_factory_from_payload() {
        let dir = tempdir().unwrap();
        let payload = serde_json::json!({
            "dbPath": dir.path().join("factory.db"),
            "txAttr": ["UserID"],
        });
        let raw = RawValue::from_string(payload.to_string()).unwrap();

        let driver = SqliteDriverFactory.create_driver(&raw).unwrap();
        assert_eq!(driver.name(), "sqlite");
    }

    #[test]
    fn test_factory_requires_path() {
        let raw = RawValue::from_string("{}".to_string()).unwrap();
        let err = SqliteDriverFactory.create_driver(&raw).err().unwrap();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
