//! Denials unwind through the `Unwind` handler; everything else comes back as a normal error.

use filegate::{Config, FatalFilesystemError, Gate, Op, Unwind};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tempfile::tempdir;

fn gate() -> Gate {
    Gate::with_fatal_handler(Config::default(), Unwind)
}

fn expect_fatal<F: FnOnce()>(f: F) -> FatalFilesystemError {
    let payload = panic::catch_unwind(AssertUnwindSafe(f)).expect_err("denied error must not return");
    *payload
        .downcast::<FatalFilesystemError>()
        .expect("panic payload is FatalFilesystemError")
}

#[test]
fn sharing_violation_text_is_fatal() {
    let g = gate();
    let err = expect_fatal(|| {
        let _ = g.with_exclusive_access(Op::Other("sync index"), &[Path::new("index.db")], || -> io::Result<()> {
            Err(io::Error::other(
                "The process cannot access the file because it is being used by another process.",
            ))
        });
    });
    assert_eq!(err.op, Op::Other("sync index"));
    assert_eq!(err.paths, vec![Path::new("index.db").to_path_buf()]);
    assert!(err.to_string().contains("used by another process"));
}

#[test]
fn not_found_and_other_errors_are_returned() {
    let td = tempdir().unwrap();
    let g = gate();
    let err = g.read_file(td.path().join("absent")).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);

    let err = g
        .with_exclusive_access(Op::Other("quota check"), &[], || -> io::Result<()> {
            Err(io::Error::other("disk quota exceeded"))
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "disk quota exceeded");
}

#[test]
fn gate_keeps_working_after_a_denial() {
    let td = tempdir().unwrap();
    let g = gate();
    let _ = expect_fatal(|| {
        let _ = g.with_exclusive_access(Op::Remove, &[td.path()], || -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        });
    });
    let p = td.path().join("after.txt");
    g.write_file(&p, b"still here").unwrap();
    assert_eq!(g.read_file(&p).unwrap(), b"still here");
}

#[cfg(unix)]
mod unix_permissions {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    // Permission bits do not stop root.
    fn is_root() -> bool {
        unsafe { libc::geteuid() == 0 }
    }

    #[test]
    fn unreadable_file_is_fatal_on_read() {
        if is_root() {
            return;
        }
        let td = tempdir().unwrap();
        let p = td.path().join("locked.txt");
        fs::write(&p, "secret").unwrap();
        fs::set_permissions(&p, fs::Permissions::from_mode(0o000)).unwrap();

        let g = gate();
        let err = expect_fatal(|| {
            let _ = g.read_file(&p);
        });
        assert_eq!(err.op, Op::ReadFile);
        assert_eq!(err.paths, vec![p.clone()]);
        assert_eq!(err.source.kind(), io::ErrorKind::PermissionDenied);

        fs::set_permissions(&p, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn write_into_read_only_dir_is_fatal() {
        if is_root() {
            return;
        }
        let td = tempdir().unwrap();
        let dir = td.path().join("ro");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

        let g = gate();
        let target = dir.join("new.txt");
        let err = expect_fatal(|| {
            let _ = g.write_file(&target, b"data");
        });
        assert_eq!(err.op, Op::WriteFile);
        assert_eq!(err.source.kind(), io::ErrorKind::PermissionDenied);

        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(!target.exists());
    }
}
