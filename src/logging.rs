//! File logging for termdeck.
//!
//! Logs go to `~/.termdeck/logs/termdeck_<timestamp>.log`. Files older than
//! the retention window are removed at startup.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default log retention in hours.
pub const DEFAULT_LOG_RETENTION_HOURS: u32 = 24;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,
    /// Log level (trace, debug, info, warn, error, off).
    pub level: String,
    /// Log retention period in hours.
    pub retention_hours: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: DEFAULT_LOG_LEVEL.to_string(),
            retention_hours: DEFAULT_LOG_RETENTION_HOURS,
        }
    }
}

impl LogConfig {
    /// Parses a log level, falling back to the default.
    #[must_use]
    pub fn parse_level(value: &str) -> String {
        let level = match value.trim().to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            "error" => "error",
            "off" | "none" | "disabled" => "off",
            _ => DEFAULT_LOG_LEVEL,
        };
        level.to_string()
    }

    /// Parses retention hours, falling back to the default.
    #[must_use]
    pub fn parse_retention(value: &str) -> u32 {
        value.trim().parse().unwrap_or(DEFAULT_LOG_RETENTION_HOURS)
    }

    /// Returns true if anything should be written.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.enabled && self.level != "off"
    }
}

/// Returns the log directory (~/.termdeck/logs/).
#[must_use]
pub fn log_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".termdeck")
        .join("logs")
}

/// Returns a fresh timestamped log file name.
#[must_use]
pub fn log_file_name() -> String {
    let now = chrono::Local::now();
    format!("termdeck_{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Deletes `.log` files in `dir` older than `retention_hours`.
///
/// Returns how many files were removed. A missing directory is not an error.
///
/// # Errors
/// Returns error if the directory cannot be read.
pub fn cleanup_old_logs(dir: &Path, retention_hours: u32) -> io::Result<u32> {
    if !dir.exists() {
        return Ok(0);
    }

    let retention = Duration::from_secs(u64::from(retention_hours) * 3600);
    let now = SystemTime::now();
    let mut deleted = 0;

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }

        let age = fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());
        if age.is_some_and(|age| age > retention) && fs::remove_file(&path).is_ok() {
            deleted += 1;
        }
    }

    Ok(deleted)
}

/// Initializes logging into [`log_directory`].
///
/// `RUST_LOG` overrides the configured level when set.
///
/// # Errors
/// Returns error if the log directory or file cannot be created.
pub fn init(config: &LogConfig) -> io::Result<()> {
    init_in(config, &log_directory()).map(|_| ())
}

/// Initializes logging into `dir`, returning the log file path.
///
/// Returns `Ok(None)` when logging is disabled.
///
/// # Errors
/// Returns error if the log directory or file cannot be created.
pub fn init_in(config: &LogConfig, dir: &Path) -> io::Result<Option<PathBuf>> {
    if !config.is_active() {
        return Ok(None);
    }

    fs::create_dir_all(dir)?;
    let deleted = cleanup_old_logs(dir, config.retention_hours)?;

    let log_path = dir.join(log_file_name());
    let log_file = File::create(&log_path)?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(false);

    // A second init in the same process keeps the first subscriber.
    if tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return Ok(None);
    }

    tracing::info!("termdeck logging initialized");
    tracing::info!("Log file: {}", log_path.display());
    tracing::info!(
        "Log level: {}, retention: {} hours",
        config.level,
        config.retention_hours
    );
    if deleted > 0 {
        tracing::info!("Cleaned up {} old log file(s)", deleted);
    }

    Ok(Some(log_path))
}
