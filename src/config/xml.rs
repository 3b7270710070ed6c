//! XML configuration support.
//! - Parses config.xml with quick_xml + serde; unknown fields are rejected.
//! - Values are trimmed; an empty `log_file` means "no file logging".
//!
//! Example:
//! <config>
//!   <file_mode>644</file_mode>
//!   <durability>full</durability>
//!   <log_level>normal</log_level>
//!   <log_file>/var/log/filegate.log</log_file>
//!   <json_logs>false</json_logs>
//! </config>

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::config_path;
use super::types::{Config, LogLevel, parse_file_mode};
use crate::safe_io::DurabilityMode;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    file_mode: Option<String>,
    durability: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    json_logs: Option<bool>,
}

// Trim surrounding whitespace before parsing an optional bool.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<bool>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid boolean '{s}'"))),
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.file_mode.as_deref()) {
        cfg.file_mode = parse_file_mode(s)?;
    }
    if let Some(s) = non_empty(parsed.durability.as_deref()) {
        cfg.durability = s.parse::<DurabilityMode>()?;
    }
    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>()?;
    }
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);
    cfg.json_logs = parsed.json_logs.unwrap_or(false);

    cfg.validate()?;
    Ok(cfg)
}

/// Parse a Config from XML text.
pub fn parse_config_xml(contents: &str) -> Result<Config> {
    let parsed: XmlConfig = from_xml_str(contents).context("parse config xml")?;
    xml_to_config(parsed)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    parse_config_xml(&contents).with_context(|| format!("load config '{}'", path.display()))
}

/// Load the effective Config.
///
/// - `$FILEGATE_CONFIG` set: that file must exist and parse.
/// - Otherwise the OS default path is used if present; defaults if not.
pub fn load_config() -> Result<Config> {
    let Some((path, explicit)) = config_path() else {
        debug!("no config directory available; using defaults");
        return Ok(Config::default());
    };
    if !explicit && !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), explicit, "loaded config");
    Ok(cfg)
}
