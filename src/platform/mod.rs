//! Platform-specific helpers.
//! Hides Unix/Windows differences (file modes, directory fsync, log file
//! creation) behind one API so the rest of the crate stays platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{fsync_dir, open_log_file_secure_append, set_file_mode};

#[cfg(not(unix))]
pub use windows::{fsync_dir, open_log_file_secure_append, set_file_mode};
