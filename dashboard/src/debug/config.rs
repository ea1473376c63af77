//! Logging configuration from environment variables

use lib_utils::get_env_or;
use std::path::PathBuf;

pub const DEFAULT_LOG_LEVEL: &str = "dashboard=info,warn";
pub const LOG_FILE_PREFIX: &str = "dashboard.log";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugConfig {
    /// Directory for the daily-rotated log files
    pub log_dir: PathBuf,
    /// Filter used when `RUST_LOG` is unset or invalid
    pub log_level: String,
    /// Mirror log output to stdout
    pub log_stdout: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_stdout: true,
        }
    }
}

impl DebugConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            log_dir: PathBuf::from(get_env_or("DASHBOARD_LOG_DIR", "logs")),
            log_level: get_env_or("RUST_LOG", DEFAULT_LOG_LEVEL),
            log_stdout: parse_flag(&get_env_or("DASHBOARD_LOG_STDOUT", "1")),
        }
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_PREFIX)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
