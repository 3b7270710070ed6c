//! Fail-fast escalation for denied filesystem operations.
//!
//! The gate hands every denied error to a `FatalHandler`. Handlers never
//! return: the default one logs and exits the process, `Unwind` logs and
//! panics with the `FatalFilesystemError` as payload so a host that owns its
//! own top-level shutdown can catch it at the outermost frame.
//!
//! Notes:
//! - The gate lock is still held while a handler runs, so no other operation
//!   starts between the denial and process exit.
//! - `ProcessExit` drops the registered log writer guard first so buffered
//!   file logs reach disk.
//! - Without a global subscriber the error also goes to stderr, so a host
//!   that never set up logging still sees what killed it.

use std::fmt;
use tracing::error;

use crate::errors::FatalFilesystemError;
use crate::logging;

/// Exit status for filesystem denials.
pub const EXIT_CODE_FILESYS_ERR: i32 = 26;

pub trait FatalHandler: Send + Sync {
    fn fatal(&self, err: FatalFilesystemError) -> !;
}

/// Default handler: log, flush, `std::process::exit(26)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExit;

impl FatalHandler for ProcessExit {
    fn fatal(&self, err: FatalFilesystemError) -> ! {
        log_fatal(&err);
        logging::flush_registered_guard();
        std::process::exit(err.exit_code());
    }
}

/// Log, then unwind with the error as panic payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unwind;

impl FatalHandler for Unwind {
    fn fatal(&self, err: FatalFilesystemError) -> ! {
        log_fatal(&err);
        std::panic::panic_any(err);
    }
}

fn log_fatal(err: &FatalFilesystemError) {
    if !tracing::dispatcher::has_been_set() {
        eprintln!("fatal: {err} (exit code {})", err.exit_code());
    }
    error!(
        exit_code = err.exit_code(),
        op = %err.op,
        paths = %PathList(&err.paths),
        error = %err.source,
        "{}",
        err
    );
}

struct PathList<'a>(&'a [std::path::PathBuf]);

impl fmt::Display for PathList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p.display())?;
        }
        Ok(())
    }
}
