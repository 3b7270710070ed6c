//! Recursive removal. A path that is already gone counts as removed.

use std::fs;
use std::io;
use std::path::Path;

pub fn remove_all(path: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    let res = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        remove_non_dir(path)
    };
    match res {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(windows)]
fn remove_non_dir(path: &Path) -> io::Result<()> {
    // Directory symlinks/junctions need remove_dir on Windows.
    fs::remove_file(path).or_else(|e| fs::remove_dir(path).map_err(|_| e))
}

#[cfg(not(windows))]
fn remove_non_dir(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}
