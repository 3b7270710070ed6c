//! Atomic rename helper.
//! - Plain `fs::rename`; the error is returned as-is so classification sees the OS error.
//! - With `DurabilityMode::Full`, best-effort fsync of the destination directory (Unix).

use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

use super::DurabilityMode;
use super::temp::parent_dir;
use crate::platform;

pub fn rename_durable(src: &Path, dst: &Path, durability: DurabilityMode) -> io::Result<()> {
    fs::rename(src, dst)?;

    if durability == DurabilityMode::Full {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        if let Err(e) = platform::fsync_dir(parent_dir(dst)) {
            trace!(path = %dst.display(), error = %e, "directory fsync after rename failed");
        }
    }
    Ok(())
}
