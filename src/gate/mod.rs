//! The access gate.
//!
//! One process-wide exclusive lock serializes every operation in this crate.
//! Each call runs acquire -> delegate -> classify -> release; a denied error
//! goes to the gate's `FatalHandler` instead of back to the caller.
//!
//! Design:
//! - `Gate` is a plain value so hosts and tests can build their own; the free
//!   functions in `ops` use a lazily created process-wide instance.
//! - The lock guards `()`: the filesystem is the shared state, not the mutex contents.
//! - A poisoned lock is recovered. Poisoning only means an earlier holder
//!   unwound (e.g. the `Unwind` fatal handler), which leaves nothing to repair.
//! - There is no per-path locking; reads and writes share the same lock.

mod classify;
mod ops;

pub use classify::{is_denied, is_denied_error};
pub use ops::{
    copy, copy_newtimes, move_path, read_file, remove, rename, with_exclusive_access,
    write_file, write_file_by_reader, write_file_without_change_time,
};

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::config::Config;
use crate::errors::{ConfigError, FatalFilesystemError};
use crate::fatal::{FatalHandler, ProcessExit};

/// Name of the operation running under the gate. Used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Move,
    Copy,
    CopyNewtimes,
    Rename,
    Remove,
    ReadFile,
    WriteFile,
    WriteFileWithoutChangeTime,
    WriteFileByReader,
    /// Caller-defined work passed to `with_exclusive_access`.
    Other(&'static str),
}

impl Op {
    /// Labels for the involved paths, in argument order. Empty for single-path ops.
    pub(crate) fn path_labels(&self) -> &'static [&'static str] {
        match self {
            Op::Move | Op::Copy | Op::CopyNewtimes => &["src", "dest"],
            Op::Rename => &["path", "new_path"],
            _ => &[],
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Op::Move => "move",
            Op::Copy | Op::CopyNewtimes => "copy",
            Op::Rename => "rename",
            Op::Remove => "remove file",
            Op::ReadFile => "read file",
            Op::WriteFile | Op::WriteFileWithoutChangeTime | Op::WriteFileByReader => "write file",
            Op::Other(name) => *name,
        };
        f.write_str(s)
    }
}

pub struct Gate {
    lock: Mutex<()>,
    config: Config,
    fatal: Box<dyn FatalHandler>,
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate").field("config", &self.config).finish_non_exhaustive()
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Gate {
    /// Gate that exits the process on denial.
    pub fn new(config: Config) -> Self {
        Self::with_fatal_handler(config, ProcessExit)
    }

    pub fn with_fatal_handler(config: Config, handler: impl FatalHandler + 'static) -> Self {
        Self {
            lock: Mutex::new(()),
            config,
            fatal: Box::new(handler),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run `f` while holding the gate exclusively.
    ///
    /// Blocks until the gate is free. A denied error never comes back: it is
    /// handed to the fatal handler while the gate is still held. Any other
    /// result is returned unchanged.
    pub fn with_exclusive_access<T, F>(&self, op: Op, paths: &[&Path], f: F) -> io::Result<T>
    where
        F: FnOnce() -> io::Result<T>,
    {
        let start = Instant::now();
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let waited = start.elapsed();
        if waited.is_zero() {
            trace!(op = %op, "gate acquired immediately");
        } else {
            trace!(op = %op, waited_us = saturating_micros(waited), "gate acquired after wait");
        }

        match f() {
            Ok(v) => Ok(v),
            Err(e) if is_denied(&e) => self.fatal.fatal(FatalFilesystemError {
                op,
                paths: paths.iter().map(|p| p.to_path_buf()).collect(),
                source: e,
            }),
            Err(e) => {
                debug!(op = %op, error = %e, "returning filesystem error to caller");
                Err(e)
            }
        }
    }
}

fn saturating_micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

static GLOBAL: OnceLock<Gate> = OnceLock::new();

/// The process-wide gate, created with `Config::default()` on first use
/// unless `init_global` ran before.
pub fn global() -> &'static Gate {
    GLOBAL.get_or_init(Gate::default)
}

/// Install the process-wide gate. Fails if it already exists (explicitly or by first use).
pub fn init_global(config: Config) -> Result<&'static Gate, ConfigError> {
    install_global(Gate::new(config))
}

/// Like `init_global`, with a custom fatal handler.
pub fn init_global_with_handler(
    config: Config,
    handler: impl FatalHandler + 'static,
) -> Result<&'static Gate, ConfigError> {
    install_global(Gate::with_fatal_handler(config, handler))
}

fn install_global(gate: Gate) -> Result<&'static Gate, ConfigError> {
    gate.config().validate()?;
    GLOBAL.set(gate).map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(global())
}
