//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DEFAULT_LOCAL_URL, DEFAULT_ONLINE_URL, DEFAULT_SYNC_INTERVAL_SECS, LOCAL_URL_ENV,
    ONLINE_URL_ENV,
};
use crate::storage::ConnectionConfig;
use crate::sync::SyncOptions;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use hotel_sync::Config;
///
/// let config = Config {
///     online_url: "sqlite:///srv/hotel/online.db".to_string(),
///     ..Default::default()
/// };
/// assert!(config.dual_write);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Local connection string
    pub local_url: String,

    /// Online connection string
    pub online_url: String,

    /// Mirror local inserts to the online database
    pub dual_write: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.local_url.clone(), self.online_url.clone())
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            dual_write: self.dual_write,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_url: DEFAULT_LOCAL_URL.to_string(),
            online_url: DEFAULT_ONLINE_URL.to_string(),
            dual_write: true,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Create the pending queue in the local database
/// hotel_sync migrate
///
/// # Insert a guest, falling back to the queue if the online database is down
/// hotel_sync insert --table tbl_Guest --data '{"name":"Alice","age":30}'
///
/// # Drain the queue every 30 seconds until Ctrl-C
/// hotel_sync sync --watch --interval-secs 30
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "hotel_sync",
    about = "Writes locally first and keeps an online database in sync."
)]
pub struct Opt {
    /// Local database connection string
    #[arg(long, global = true, env = LOCAL_URL_ENV, default_value = DEFAULT_LOCAL_URL)]
    pub local_url: String,

    /// Online database connection string
    #[arg(long, global = true, env = ONLINE_URL_ENV, default_value = DEFAULT_ONLINE_URL)]
    pub online_url: String,

    /// Write only to the local database
    #[arg(long, global = true)]
    pub no_dual_write: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply schema migrations
    Migrate {
        /// Also migrate the online database
        #[arg(long)]
        online: bool,
    },
    /// Insert one row with online fallback to the pending queue
    Insert(InsertArgs),
    /// Replay the pending queue against the online database
    Sync(SyncArgs),
    /// List queued writes
    Pending,
}

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Target table (trusted identifier)
    #[arg(long)]
    pub table: String,

    /// Row as a flat JSON object, e.g. '{"name":"Alice","age":30}'
    #[arg(long)]
    pub data: String,
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Keep draining periodically until interrupted
    #[arg(long)]
    pub watch: bool,

    /// Seconds between drains in watch mode
    #[arg(long, default_value_t = DEFAULT_SYNC_INTERVAL_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: u64,
}

impl From<&Opt> for Config {
    fn from(opt: &Opt) -> Self {
        Config {
            local_url: opt.local_url.clone(),
            online_url: opt.online_url.clone(),
            dual_write: !opt.no_dual_write,
            log_level: opt.log_level.clone(),
            log_format: opt.log_format.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.local_url, DEFAULT_LOCAL_URL);
        assert_eq!(config.online_url, DEFAULT_ONLINE_URL);
        assert!(config.dual_write);
        assert!(config.sync_options().dual_write);
    }

    #[test]
    fn test_config_from_opt() {
        let opt = Opt::try_parse_from([
            "hotel_sync",
            "--local-url",
            "sqlite:a.db",
            "--no-dual-write",
            "pending",
        ])
        .unwrap();
        let config = Config::from(&opt);
        assert_eq!(config.connection_config().local_url, "sqlite:a.db");
        assert!(!config.dual_write);
    }
}
