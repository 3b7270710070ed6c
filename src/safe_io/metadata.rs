//! Timestamp and permission carry-over for copies and time-preserving writes.

use filetime::{FileTime, set_file_times};
use std::fs;
use std::io;
use std::path::Path;
#[cfg(feature = "xattrs")]
use tracing::warn;

/// (atime, mtime) pair as captured from a file's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Times {
    pub atime: FileTime,
    pub mtime: FileTime,
}

impl Times {
    pub fn of(meta: &fs::Metadata) -> Self {
        Self {
            atime: FileTime::from_last_access_time(meta),
            mtime: FileTime::from_last_modification_time(meta),
        }
    }

    pub fn apply(&self, path: &Path) -> io::Result<()> {
        set_file_times(path, self.atime, self.mtime)
    }
}

/// Permission bits to give a copy of a file with `meta`.
#[cfg(unix)]
pub(super) fn mode_of(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
pub(super) fn mode_of(_meta: &fs::Metadata) -> u32 {
    0o644
}

/// Copy extended attributes from `src` to `dest` (best-effort).
/// No-op unless the `xattrs` feature is enabled.
pub(super) fn preserve_xattrs(src: &Path, dest: &Path) {
    #[cfg(feature = "xattrs")]
    {
        let names = match xattr::list(src) {
            Ok(names) => names,
            Err(e) => {
                warn!(src = %src.display(), error = %e, "failed to list xattrs; continuing");
                return;
            }
        };
        for name in names {
            let value = match xattr::get(src, &name) {
                Ok(v) => v.unwrap_or_default(),
                Err(e) => {
                    warn!(src = %src.display(), xattr = %name.to_string_lossy(), error = %e, "failed to read xattr");
                    continue;
                }
            };
            if let Err(e) = xattr::set(dest, &name, &value) {
                warn!(dest = %dest.display(), xattr = %name.to_string_lossy(), error = %e, "failed to set xattr");
            }
        }
    }
    #[cfg(not(feature = "xattrs"))]
    {
        let _ = (src, dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    #[test]
    fn times_roundtrip_through_apply() {
        let td = tempdir().unwrap();
        let a = td.path().join("a");
        let b = td.path().join("b");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        let past = FileTime::from_system_time(SystemTime::now() - Duration::from_secs(7200));
        set_file_times(&a, past, past).unwrap();

        Times::of(&fs::metadata(&a).unwrap()).apply(&b).unwrap();
        let got = Times::of(&fs::metadata(&b).unwrap());
        assert_eq!(got.mtime.unix_seconds(), past.unix_seconds());
    }

    #[cfg(unix)]
    #[test]
    fn mode_of_masks_file_type_bits() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let p = td.path().join("m");
        fs::write(&p, "x").unwrap();
        fs::set_permissions(&p, fs::Permissions::from_mode(0o640)).unwrap();
        assert_eq!(mode_of(&fs::metadata(&p).unwrap()), 0o640);
    }
}
