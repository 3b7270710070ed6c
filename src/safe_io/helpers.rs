//! I/O error enrichment.
//!
//! Adds the operation, the path and a platform-aware hint to an `io::Error`
//! message while keeping its `ErrorKind`, so denial classification still works
//! on the enriched error.
//!
//! Usage:
//!   File::create(&tmp).map_err(io_error_with_help_io("create temporary file", &tmp))?;

use std::io;
use std::path::Path;

fn hint_for_code(code: i32) -> Option<&'static str> {
    #[cfg(unix)]
    {
        match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
            libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
            libc::EBUSY => Some("resource busy; another process holds the file"),
            libc::ENOENT => Some("path not found"),
            libc::ENOSPC => Some("insufficient space on device"),
            libc::EROFS => Some("read-only filesystem"),
            libc::ENAMETOOLONG => Some("file name or path too long"),
            libc::EMFILE | libc::ENFILE => Some("too many open files"),
            _ => None,
        }
    }
    #[cfg(windows)]
    {
        match code {
            5 => Some("access denied; check permissions"),              // ERROR_ACCESS_DENIED
            17 => Some("not same device; cross-filesystem rename"),     // ERROR_NOT_SAME_DEVICE
            32 | 33 => Some("file is being used by another process"),   // SHARING/LOCK_VIOLATION
            2 | 3 => Some("path not found"),                            // FILE/PATH_NOT_FOUND
            112 => Some("insufficient disk space"),                     // ERROR_DISK_FULL
            19 => Some("write protected media"),                        // ERROR_WRITE_PROTECT
            206 => Some("file name or path too long"),                  // ERROR_FILENAME_EXCED_RANGE
            _ => None,
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = code;
        None
    }
}

fn hint_for_kind(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    let hint = match e.raw_os_error() {
        Some(code) => hint_for_code(code),
        None => hint_for_kind(e.kind()),
    };
    if let Some(h) = hint {
        msg.push_str(" (");
        msg.push_str(h);
        msg.push(')');
    }
    msg
}

/// Closure for `.map_err(...)` that rewrites the message and preserves the kind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
