//! Copies for files and directory trees.
//!
//! Each file is streamed into a temp sibling of its destination and renamed
//! into place, so a reader never sees a half-copied file. Directories are
//! walked and recreated; with `TimePolicy::Preserve` their times (and Unix
//! modes) are applied deepest-first once all children are in place.
//!
//! Symlinks are followed: the copy holds the target's contents, including
//! whole trees behind directory links. A link cycle fails the copy.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::metadata::{self, Times};
use super::write::TempWrite;
use super::{BUF_SIZE, DurabilityMode, TimePolicy};
use crate::platform;

pub fn copy(src: &Path, dest: &Path, times: TimePolicy, durability: DurabilityMode) -> io::Result<()> {
    let meta = fs::metadata(src)?;
    if meta.is_dir() {
        copy_dir(src, dest, times, durability)
    } else {
        copy_file(src, dest, &meta, times, durability)
    }
}

fn copy_file(
    src: &Path,
    dest: &Path,
    meta: &fs::Metadata,
    times: TimePolicy,
    durability: DurabilityMode,
) -> io::Result<()> {
    let job = TempWrite {
        target: dest,
        mode: metadata::mode_of(meta),
        durability,
        times: match times {
            TimePolicy::Preserve => Some(Times::of(meta)),
            TimePolicy::Refresh => None,
        },
    };
    job.run(|w| {
        let mut reader = BufReader::with_capacity(BUF_SIZE, File::open(src)?);
        io::copy(&mut reader, w).map(|_| ())
    })?;
    if times == TimePolicy::Preserve {
        metadata::preserve_xattrs(src, dest);
    }
    Ok(())
}

fn copy_dir(src: &Path, dest: &Path, times: TimePolicy, durability: DurabilityMode) -> io::Result<()> {
    let mut dirs: Vec<(PathBuf, fs::Metadata)> = Vec::new();

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let target = dest.join(rel);
        let meta = entry.metadata()?;
        if meta.is_dir() {
            fs::create_dir_all(&target)?;
            dirs.push((target, meta));
        } else {
            copy_file(entry.path(), &target, &meta, times, durability)?;
        }
    }

    if times == TimePolicy::Preserve {
        // Only after every entry exists: creating children bumps a directory's mtime.
        for (dir, meta) in dirs.iter().rev() {
            platform::set_file_mode(dir, metadata::mode_of(meta))?;
            Times::of(meta).apply(dir)?;
        }
    }
    Ok(())
}
