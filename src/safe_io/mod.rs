//! Safe file I/O primitives used by the gate.
//!
//! Nothing here takes the gate; callers are expected to hold it.
//! - Writes go to a hidden temp sibling, are synced, then renamed into place.
//! - Copies reuse the same temp-then-rename path per file.
//! - `DurabilityMode::Full` adds fsync of the file and its parent directory.

mod atomic;
mod copy;
mod helpers;
mod metadata;
mod remove;
mod temp;
mod write;

pub use atomic::rename_durable;
pub use copy::copy;
pub use helpers::io_error_with_help_io;
pub use remove::remove_all;
pub use temp::TEMP_PREFIX;
pub use write::{write_file_safer, write_file_safer_by_reader, write_file_safer_without_change_time};

use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

/// Buffer size for streaming copies and reader-based writes.
pub(crate) const BUF_SIZE: usize = 1024 * 1024;

/// Durability mode controlling post-write flush behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DurabilityMode {
    /// Flush to the OS page cache only. Fastest; may lose data on power loss.
    Data,
    /// `sync_all` the written file and fsync the parent directory after rename.
    #[default]
    Full,
}

impl fmt::Display for DurabilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DurabilityMode::Data => "data",
            DurabilityMode::Full => "full",
        })
    }
}

impl FromStr for DurabilityMode {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "data" => Ok(DurabilityMode::Data),
            "full" => Ok(DurabilityMode::Full),
            _ => Err(ConfigError::InvalidDurability(s.to_string())),
        }
    }
}

/// What a copy does with the destination's timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimePolicy {
    /// Mirror the source's atime/mtime (and mode on Unix).
    Preserve,
    /// Leave the fresh timestamps from the write.
    Refresh,
}
