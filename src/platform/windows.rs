//! Windows implementations of platform helpers (best-effort).
//!
//! Notes:
//! - Windows lacks POSIX mode semantics; modes are ignored and ACLs are left alone.
//! - Directory fsync is not available through std; it is a no-op here.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Open log file for appending.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// No-op on Windows; POSIX-style file modes are not applicable.
pub fn set_file_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

pub fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
