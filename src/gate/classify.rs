//! Denial classification.
//!
//! An error is "denied" when continuing would risk silent corruption: a
//! permission failure, or a file held by another process. Everything else
//! (not found, generic I/O failures) goes back to the caller untouched.
//!
//! Checks, in order, for the error and every error it wraps:
//! - `io::ErrorKind::PermissionDenied` (on Windows also raw `ERROR_ACCESS_DENIED`)
//! - lowercase message contains "access is denied" or "used by another process"

use std::error::Error;
use std::io;

#[cfg(windows)]
use windows_sys::Win32::Foundation::ERROR_ACCESS_DENIED;

const DENIAL_PHRASES: [&str; 2] = ["access is denied", "used by another process"];

/// True if `err` must be treated as fatal.
pub fn is_denied(err: &io::Error) -> bool {
    is_denied_error(err)
}

/// Same as [`is_denied`] for any error type, walking its `source()` chain.
pub fn is_denied_error(err: &(dyn Error + 'static)) -> bool {
    let mut cur = Some(err);
    while let Some(e) = cur {
        if let Some(ioe) = e.downcast_ref::<io::Error>() {
            if io_kind_denied(ioe) {
                return true;
            }
            // io::Error::source() skips the custom payload, so look inside it explicitly.
            if let Some(inner) = ioe.get_ref()
                && is_denied_error(inner)
            {
                return true;
            }
        }
        if message_denied(&e.to_string()) {
            return true;
        }
        cur = e.source();
    }
    false
}

fn io_kind_denied(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::PermissionDenied {
        return true;
    }
    #[cfg(windows)]
    {
        // Sharing violations are caught by their message; lock violations are returnable.
        if let Some(code) = e.raw_os_error() {
            return code as u32 == ERROR_ACCESS_DENIED;
        }
    }
    false
}

fn message_denied(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    DENIAL_PHRASES.iter().any(|p| lower.contains(p))
}
