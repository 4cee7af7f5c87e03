//! Logger initialization.
//!
//! Statement traces from the connection manager are tagged with the endpoint
//! they ran against, e.g. `ExecuteNonQuery [online]: INSERT INTO ...`, and
//! endpoint switches are logged at info. Bound values are never logged.

use std::io::Write;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use log::LevelFilter;

/// Initializes the logger with the specified level and format.
///
/// At `info` the output shows endpoint switches, queued writes and drain
/// results. At `debug` every statement is traced with its `[local]` or
/// `[online]` tag. sqlx's own statement logging is capped at `warn` so each
/// statement appears once.
///
/// `RUST_LOG` is read first and `level` overrides it for this crate. The JSON
/// format writes one object per line with `ts`, `level`, `target` and `msg`.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Trace every statement sent to either database
/// hotel_sync --log-level debug sync
///
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=hotel_sync::sync=debug hotel_sync sync
/// ```
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    // Read from RUST_LOG environment variable first, then override with CLI arg
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("sqlx", LevelFilter::Warn);
    builder.filter_module("hotel_sync", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{}",
                    json_line(
                        chrono::Utc::now().timestamp_millis(),
                        record.level(),
                        record.target(),
                        &record.args().to_string(),
                    )
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                writeln!(
                    buf,
                    "{} [{}] {}",
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init so a second initialization (tests) returns an error instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

/// One JSON log line. The message is escaped since statement traces carry
/// SQL with quotes.
fn json_line(ts: i64, level: log::Level, target: &str, msg: &str) -> String {
    serde_json::json!({
        "ts": ts,
        "level": level.as_str(),
        "target": target,
        "msg": msg,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_line_escapes_statement_trace() {
        let line = json_line(
            1_700_000_000_000,
            log::Level::Debug,
            "hotel_sync::storage::connection",
            "ExecuteNonQuery [online]: INSERT INTO tbl_Guest (name) VALUES ('O''Brien')",
        );
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["ts"], 1_700_000_000_000_i64);
        assert_eq!(parsed["level"], "DEBUG");
        assert_eq!(parsed["target"], "hotel_sync::storage::connection");
        assert!(parsed["msg"].as_str().unwrap().contains("[online]"));
    }

    #[test]
    fn test_init_logger_does_not_panic_twice() {
        // env_logger can only be installed once per process; the second call
        // must report an error rather than panic.
        let first = init_logger_with(LevelFilter::Info, LogFormat::Json);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Plain);
        assert!(first.is_err() || second.is_err());
    }
}
