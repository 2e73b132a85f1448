//! Line format shared by the console and file drivers
//!
//! ```text
//! [1736332245] INFO  payment accepted; Comp=[billing]; TxID=[4]
//! [2025-01-08 10:30:45] WARN  disk almost full
//! ```

use crate::core::{KnownParams, LogLevel, Param, Record, TxId};
use chrono::{Local, TimeZone};

pub const TX_BEGIN_MESSAGE: &str = "TX Begin";
pub const TX_END_MESSAGE: &str = "TX End";

/// Format one record as a single output line (no trailing newline)
pub fn format_line(record: &Record, user_readable_time: bool) -> String {
    let params = KnownParams::from_record(record);
    let level = format!("{:<5}", params.level);
    render_line(&params, user_readable_time, &level)
}

/// Assemble a line around an already padded (possibly colored) level
pub(crate) fn render_line(params: &KnownParams, user_readable_time: bool, level: &str) -> String {
    let mut line = format!(
        "{}{} {}",
        format_timestamp(params.timestamp, user_readable_time),
        level,
        sanitize_message(&params.message)
    );

    if !params.component.is_empty() {
        line.push_str(&format!("; Comp=[{}]", params.component));
    }
    if !params.tx_id.is_empty() {
        line.push_str(&format!("; TxID=[{}]", params.tx_id));
    }
    line
}

fn format_timestamp(timestamp: i64, user_readable_time: bool) -> String {
    if user_readable_time {
        if let Some(time) = Local.timestamp_opt(timestamp, 0).single() {
            return time.format("[%Y-%m-%d %H:%M:%S] ").to_string();
        }
    }
    format!("[{:<10}] ", timestamp)
}

/// Escape line breaks and tabs so one record can never produce two lines
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Info record announcing a transaction start, with its attributes inline
pub fn begin_transaction_record(id: TxId, attributes: &Record) -> Record {
    Record::entry(
        LogLevel::Info,
        format!("{}; Params: {}", TX_BEGIN_MESSAGE, attributes),
    )
    .with(Param::TX_ID, id.to_string())
}

pub fn end_transaction_record(id: TxId) -> Record {
    Record::entry(LogLevel::Info, TX_END_MESSAGE).with(Param::TX_ID, id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_plain_line() {
        let line = format_line(
            &record(&[("time", "1700000000"), ("level", "info"), ("message", "hello")]),
            false,
        );
        assert_eq!(line, "[1700000000] INFO  hello");
    }

    #[test]
    fn test_short_timestamp_is_padded() {
        let line = format_line(&record(&[("time", "42"), ("level", "warn"), ("message", "m")]), false);
        assert_eq!(line, "[42        ] WARN  m");
    }

    #[test]
    fn test_optional_suffixes() {
        let line = format_line(
            &record(&[
                ("time", "1700000000"),
                ("level", "error"),
                ("message", "declined"),
                ("component", "billing"),
                ("txID", "3"),
            ]),
            false,
        );
        assert_eq!(line, "[1700000000] ERROR declined; Comp=[billing]; TxID=[3]");

        let line = format_line(&record(&[("time", "1700000000"), ("txID", "9")]), false);
        assert_eq!(line, "[1700000000]       ; TxID=[9]");
    }

    #[test]
    fn test_user_readable_time() {
        let line = format_line(&record(&[("time", "1700000000"), ("level", "debug")]), true);
        let expected = Local
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .unwrap()
            .format("[%Y-%m-%d %H:%M:%S] ")
            .to_string();
        assert!(line.starts_with(&expected), "{}", line);
        assert!(line.contains("DEBUG"));
    }

    #[test]
    fn test_injection_is_escaped() {
        let line = format_line(
            &record(&[("time", "1"), ("message", "login\nERROR fake entry")]),
            false,
        );
        assert_eq!(line.lines().count(), 1);
        assert!(line.contains("login\\nERROR fake entry"));
    }

    #[test]
    fn test_transaction_records() {
        let begin = begin_transaction_record(TxId::new(4), &record(&[("UserID", "123")]));
        assert_eq!(begin.message(), Some("TX Begin; Params: {UserID=123}"));
        assert_eq!(begin.tx_id(), Some("4"));
        assert_eq!(begin.level(), Some(LogLevel::Info));

        let end = end_transaction_record(TxId::new(4));
        assert_eq!(end.message(), Some("TX End"));
        assert_eq!(end.tx_id(), Some("4"));
    }
}
