//! Typed error definitions for filegate.
//! Wrappers themselves return `io::Result`; these types cover the fatal signal and setup paths.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::gate::Op;

/// Raised when an operation hits a denial that makes continuing unsafe.
/// Handed to the installed `FatalHandler`; never returned to a wrapper's caller.
#[derive(Debug, Error)]
#[error("{op} [{}] failed: {source}", render_paths(.op, .paths))]
pub struct FatalFilesystemError {
    pub op: Op,
    pub paths: Vec<PathBuf>,
    #[source]
    pub source: io::Error,
}

impl FatalFilesystemError {
    /// Process exit status used when this error terminates the process.
    pub fn exit_code(&self) -> i32 {
        crate::fatal::EXIT_CODE_FILESYS_ERR
    }
}

fn render_paths(op: &Op, paths: &[PathBuf]) -> String {
    let labels = op.path_labels();
    paths
        .iter()
        .enumerate()
        .map(|(i, p)| match labels.get(i) {
            Some(label) => format!("{}={}", label, p.display()),
            None => p.display().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid file mode '{0}': expected octal permission bits (e.g. 644)")]
    InvalidFileMode(String),

    #[error("file mode {0:o} exceeds 0o7777")]
    FileModeOutOfRange(u32),

    #[error("invalid durability '{0}': expected 'data' or 'full'")]
    InvalidDurability(String),

    #[error("invalid log level '{0}': expected quiet, normal, info or debug")]
    InvalidLogLevel(String),

    #[error("filegate is already initialized")]
    AlreadyInitialized,
}
