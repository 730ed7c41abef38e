use std::fs::{self, File};
use std::path::PathBuf;

use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use super::error::{AppError, Result};

/// Environment variable overriding the log level.
pub const LOG_LEVEL_VAR: &str = "MIRRORPAD_LOG";

/// Returns the log file path: data_dir/mirrorpad/mirrorpad.log
pub fn log_path() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("mirrorpad");
    path.push("mirrorpad.log");
    path
}

/// Map a level name to a filter; unknown names give `None`.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn level_from_env() -> LevelFilter {
    std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Info)
}

/// Start writing the log file. Truncates the previous run's log.
pub fn init() -> Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)?;

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    WriteLogger::init(level_from_env(), config, file)
        .map_err(|e| AppError::Logging(e.to_string()))?;
    Ok(path)
}
