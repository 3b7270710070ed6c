//! Guarded filesystem operations.
//! Every wrapper has the same shape: take the gate, delegate, classify, return.
//! Free functions at the bottom route through the process-wide gate.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

use super::{Gate, Op, global};
use crate::safe_io::{self, TimePolicy};

impl Gate {
    /// Atomic rename of `src` to `dest`. A no-op when both are the same path.
    pub fn move_path(&self, src: impl AsRef<Path>, dest: impl AsRef<Path>) -> io::Result<()> {
        let (src, dest) = (src.as_ref(), dest.as_ref());
        if src == dest {
            return Ok(());
        }
        let durability = self.config.durability;
        self.with_exclusive_access(Op::Move, &[src, dest], || {
            safe_io::rename_durable(src, dest, durability)
        })?;
        debug!(src = %src.display(), dest = %dest.display(), "moved");
        Ok(())
    }

    /// Copy a file or directory tree, keeping the source timestamps (and mode on Unix).
    pub fn copy(&self, src: impl AsRef<Path>, dest: impl AsRef<Path>) -> io::Result<()> {
        self.copy_with(Op::Copy, src.as_ref(), dest.as_ref(), TimePolicy::Preserve)
    }

    /// Copy a file or directory tree; the copies get fresh timestamps.
    pub fn copy_newtimes(&self, src: impl AsRef<Path>, dest: impl AsRef<Path>) -> io::Result<()> {
        self.copy_with(Op::CopyNewtimes, src.as_ref(), dest.as_ref(), TimePolicy::Refresh)
    }

    fn copy_with(&self, op: Op, src: &Path, dest: &Path, times: TimePolicy) -> io::Result<()> {
        let durability = self.config.durability;
        self.with_exclusive_access(op, &[src, dest], || {
            safe_io::copy(src, dest, times, durability)
        })?;
        debug!(src = %src.display(), dest = %dest.display(), ?times, "copied");
        Ok(())
    }

    pub fn rename(&self, path: impl AsRef<Path>, new_path: impl AsRef<Path>) -> io::Result<()> {
        let (path, new_path) = (path.as_ref(), new_path.as_ref());
        let durability = self.config.durability;
        self.with_exclusive_access(Op::Rename, &[path, new_path], || {
            safe_io::rename_durable(path, new_path, durability)
        })
    }

    /// Remove a file or a whole directory tree. A missing path is not an error.
    pub fn remove(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        self.with_exclusive_access(Op::Remove, &[path], || safe_io::remove_all(path))
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
        let path = path.as_ref();
        self.with_exclusive_access(Op::ReadFile, &[path], || fs::read(path))
    }

    /// Atomic write (temp file + rename) with the configured file mode.
    pub fn write_file(&self, path: impl AsRef<Path>, data: &[u8]) -> io::Result<()> {
        let path = path.as_ref();
        let (mode, durability) = (self.config.file_mode, self.config.durability);
        self.with_exclusive_access(Op::WriteFile, &[path], || {
            safe_io::write_file_safer(path, data, mode, durability)
        })
    }

    /// Like `write_file`, but an existing file keeps its previous access and modification times.
    pub fn write_file_without_change_time(&self, path: impl AsRef<Path>, data: &[u8]) -> io::Result<()> {
        let path = path.as_ref();
        let (mode, durability) = (self.config.file_mode, self.config.durability);
        self.with_exclusive_access(Op::WriteFileWithoutChangeTime, &[path], || {
            safe_io::write_file_safer_without_change_time(path, data, mode, durability)
        })
    }

    /// Like `write_file`, streaming the contents from `reader`.
    pub fn write_file_by_reader(&self, path: impl AsRef<Path>, reader: impl Read) -> io::Result<()> {
        let path = path.as_ref();
        let (mode, durability) = (self.config.file_mode, self.config.durability);
        self.with_exclusive_access(Op::WriteFileByReader, &[path], move || {
            safe_io::write_file_safer_by_reader(path, reader, mode, durability)
        })
    }
}

pub fn with_exclusive_access<T, F>(op: Op, paths: &[&Path], f: F) -> io::Result<T>
where
    F: FnOnce() -> io::Result<T>,
{
    global().with_exclusive_access(op, paths, f)
}

pub fn move_path(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> io::Result<()> {
    global().move_path(src, dest)
}

pub fn copy(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> io::Result<()> {
    global().copy(src, dest)
}

pub fn copy_newtimes(src: impl AsRef<Path>, dest: impl AsRef<Path>) -> io::Result<()> {
    global().copy_newtimes(src, dest)
}

pub fn rename(path: impl AsRef<Path>, new_path: impl AsRef<Path>) -> io::Result<()> {
    global().rename(path, new_path)
}

pub fn remove(path: impl AsRef<Path>) -> io::Result<()> {
    global().remove(path)
}

pub fn read_file(path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
    global().read_file(path)
}

pub fn write_file(path: impl AsRef<Path>, data: &[u8]) -> io::Result<()> {
    global().write_file(path, data)
}

pub fn write_file_without_change_time(path: impl AsRef<Path>, data: &[u8]) -> io::Result<()> {
    global().write_file_without_change_time(path, data)
}

pub fn write_file_by_reader(path: impl AsRef<Path>, reader: impl Read) -> io::Result<()> {
    global().write_file_by_reader(path, reader)
}
