//! Core configuration types.
//! - Config holds gate settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::DEFAULT_FILE_MODE;
use crate::errors::ConfigError;
use crate::safe_io::DurabilityMode;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

/// Runtime configuration for a gate and its logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Permission bits for files created by write operations (Unix only)
    pub file_mode: u32,
    /// fsync policy for writes, copies and renames
    pub durability: DurabilityMode,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Emit structured JSON logs
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_mode: DEFAULT_FILE_MODE,
            durability: DurabilityMode::Full,
            log_level: LogLevel::Normal,
            log_file: None,
            json_logs: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_mode > 0o7777 {
            return Err(ConfigError::FileModeOutOfRange(self.file_mode));
        }
        Ok(())
    }
}

/// Parse permission bits written in octal, with or without a `0o`/`0` prefix.
pub fn parse_file_mode(s: &str) -> Result<u32, ConfigError> {
    let t = s.trim();
    let digits = t.strip_prefix("0o").unwrap_or(t);
    let mode = u32::from_str_radix(digits, 8).map_err(|_| ConfigError::InvalidFileMode(t.to_string()))?;
    if mode > 0o7777 {
        return Err(ConfigError::FileModeOutOfRange(mode));
    }
    Ok(mode)
}
