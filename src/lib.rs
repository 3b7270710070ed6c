//! Core library for `filegate`.
//!
//! Serialized filesystem primitives for a single process: every move, copy,
//! rename, remove, read and write goes through one exclusive gate, and a
//! denial that signals corruption risk (permission denied, file held by
//! another process) terminates the process instead of being returned.
//!
//! Quick start:
//!
//! ```no_run
//! # fn main() -> std::io::Result<()> {
//! filegate::write_file("notes/today.md", b"# Today\n")?;
//! let data = filegate::read_file("notes/today.md")?;
//! filegate::copy("notes", "backup/notes")?;
//! # let _ = data;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod fatal;
pub mod gate;
pub mod logging;
pub mod platform;
pub mod safe_io;

pub use config::{Config, LogLevel, load_config};
pub use errors::{ConfigError, FatalFilesystemError};
pub use fatal::{EXIT_CODE_FILESYS_ERR, FatalHandler, ProcessExit, Unwind};
pub use gate::{
    Gate, Op, copy, copy_newtimes, global, init_global, init_global_with_handler, is_denied,
    is_denied_error, move_path, read_file, remove, rename, with_exclusive_access, write_file,
    write_file_by_reader, write_file_without_change_time,
};
pub use safe_io::{DurabilityMode, TimePolicy};

/// Convenience prelude for hosts embedding the gate.
pub mod prelude {
    pub use crate::config::{Config, LogLevel, load_config};
    pub use crate::errors::FatalFilesystemError;
    pub use crate::fatal::{FatalHandler, ProcessExit, Unwind};
    pub use crate::gate::{
        Gate, Op, copy, copy_newtimes, move_path, read_file, remove, rename,
        with_exclusive_access, write_file, write_file_by_reader, write_file_without_change_time,
    };
    pub use crate::logging::init_from_config;
}
