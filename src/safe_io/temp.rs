//! Unique hidden sibling names for temp-then-rename writes.
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix shared by every temp file this crate creates.
pub const TEMP_PREFIX: &str = ".filegate.";

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Directory that will hold `target`; `.` for bare file names.
pub(super) fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Pattern: .filegate.<pid>.<nanos>.<seq>.tmp next to `target`.
pub(super) fn unique_temp_path(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    parent_dir(target).join(format!("{TEMP_PREFIX}{pid}.{nanos}.{seq}.tmp"))
}
