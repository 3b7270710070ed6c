//! Atomic "safer" writes.
//!
//! Steps:
//! - Ensure the parent directory exists
//! - Create a unique hidden temp sibling (create_new, never clobbers)
//! - Fill it through a 1 MiB buffer, sync (Full), apply mode and optional times
//! - Rename over the target, fsync the parent directory (Full)
//! - On failure remove the temp file best-effort and return the original error

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tracing::warn;

use super::atomic::rename_durable;
use super::helpers::io_error_with_help_io;
use super::metadata::Times;
use super::temp::{parent_dir, unique_temp_path};
use super::{BUF_SIZE, DurabilityMode};
use crate::platform;

/// Everything a temp-then-rename write needs besides the bytes.
pub(super) struct TempWrite<'a> {
    pub target: &'a Path,
    pub mode: u32,
    pub durability: DurabilityMode,
    /// Applied to the temp file right before the rename.
    pub times: Option<Times>,
}

impl TempWrite<'_> {
    pub fn run<F>(&self, fill: F) -> io::Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let parent = parent_dir(self.target);
        fs::create_dir_all(parent).map_err(io_error_with_help_io("create parent directory", parent))?;

        let tmp = unique_temp_path(self.target);
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp)
            .map_err(io_error_with_help_io("create temporary file", &tmp))?;

        let result = self.fill_and_commit(file, &tmp, fill);
        if result.is_err()
            && let Err(e) = fs::remove_file(&tmp)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %tmp.display(), error = %e, "failed to remove temporary file");
        }
        result
    }

    fn fill_and_commit<F>(&self, file: File, tmp: &Path, fill: F) -> io::Result<()>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let mut writer = BufWriter::with_capacity(BUF_SIZE, file);
        fill(&mut writer)?;
        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if self.durability == DurabilityMode::Full {
            file.sync_all()?;
        }
        drop(file);

        platform::set_file_mode(tmp, self.mode)?;
        if let Some(times) = self.times {
            times.apply(tmp)?;
        }
        rename_durable(tmp, self.target, self.durability)
    }
}

/// Write `data` to `path` atomically; the file gets `mode` and a fresh mtime.
pub fn write_file_safer(path: &Path, data: &[u8], mode: u32, durability: DurabilityMode) -> io::Result<()> {
    TempWrite { target: path, mode, durability, times: None }.run(|w| w.write_all(data))
}

/// Like `write_file_safer`, but if `path` already existed its atime/mtime are kept.
pub fn write_file_safer_without_change_time(
    path: &Path,
    data: &[u8],
    mode: u32,
    durability: DurabilityMode,
) -> io::Result<()> {
    let times = match fs::metadata(path) {
        Ok(meta) => Some(Times::of(&meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };
    TempWrite { target: path, mode, durability, times }.run(|w| w.write_all(data))
}

/// Like `write_file_safer`, streaming from `reader`.
pub fn write_file_safer_by_reader<R: Read>(
    path: &Path,
    mut reader: R,
    mode: u32,
    durability: DurabilityMode,
) -> io::Result<()> {
    TempWrite { target: path, mode, durability, times: None }.run(|w| io::copy(&mut reader, w).map(|_| ()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safe_io::TEMP_PREFIX;
    use filetime::FileTime;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn temp_leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with(TEMP_PREFIX))
            .collect()
    }

    #[test]
    fn creates_parents_and_leaves_no_temp() {
        let td = tempdir().unwrap();
        let p = td.path().join("a/b/c.txt");
        write_file_safer(&p, b"hello", 0o644, DurabilityMode::Full).unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"hello");
        assert!(temp_leftovers(&td.path().join("a/b")).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn applies_mode_exactly() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let p = td.path().join("m.txt");
        write_file_safer(&p, b"x", 0o600, DurabilityMode::Data).unwrap();
        assert_eq!(fs::metadata(&p).unwrap().permissions().mode() & 0o777, 0o600);
        write_file_safer(&p, b"y", 0o644, DurabilityMode::Data).unwrap();
        assert_eq!(fs::metadata(&p).unwrap().permissions().mode() & 0o777, 0o644);
    }

    #[test]
    fn without_change_time_keeps_prior_mtime() {
        let td = tempdir().unwrap();
        let p = td.path().join("keep.txt");
        fs::write(&p, "old").unwrap();
        let past = FileTime::from_system_time(SystemTime::now() - Duration::from_secs(86_400));
        filetime::set_file_times(&p, past, past).unwrap();

        write_file_safer_without_change_time(&p, b"new", 0o644, DurabilityMode::Full).unwrap();
        let meta = fs::metadata(&p).unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"new");
        assert_eq!(FileTime::from_last_modification_time(&meta).unix_seconds(), past.unix_seconds());
    }

    #[test]
    fn without_change_time_on_new_file_just_writes() {
        let td = tempdir().unwrap();
        let p = td.path().join("fresh.txt");
        write_file_safer_without_change_time(&p, b"data", 0o644, DurabilityMode::Data).unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"data");
    }

    #[test]
    fn failing_reader_cleans_temp_and_keeps_target() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("stream reset"))
            }
        }

        let td = tempdir().unwrap();
        let p = td.path().join("target.txt");
        fs::write(&p, "intact").unwrap();
        let err = write_file_safer_by_reader(&p, Broken, 0o644, DurabilityMode::Full).unwrap_err();
        assert_eq!(err.to_string(), "stream reset");
        assert_eq!(fs::read_to_string(&p).unwrap(), "intact");
        assert!(temp_leftovers(td.path()).is_empty());
    }
}
