//! Config module.
//! Provides configuration types, default paths and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{CONFIG_ENV_VAR, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{load_config, load_config_from_xml_path, parse_config_xml};

/// Mode for files written by the gate: owner read-write, group/other read.
pub const DEFAULT_FILE_MODE: u32 = 0o644;
