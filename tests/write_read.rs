use filegate::{Config, DurabilityMode, Gate, Unwind};
use filetime::FileTime;
use std::fs;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn gate() -> Gate {
    Gate::with_fatal_handler(Config::default(), Unwind)
}

fn mtime(path: &std::path::Path) -> i64 {
    FileTime::from_last_modification_time(&fs::metadata(path).unwrap()).unix_seconds()
}

#[test]
fn write_then_read_roundtrips() {
    let td = tempdir().unwrap();
    let p = td.path().join("out.txt");
    let data = b"line one\nline two\n\x00\xff binary tail";
    gate().write_file(&p, data).unwrap();
    assert_eq!(gate().read_file(&p).unwrap(), data);
}

#[test]
fn write_into_missing_directories() {
    let td = tempdir().unwrap();
    let p = td.path().join("data/storage/av/blocks.json");
    filegate::write_file(&p, b"{}").unwrap();
    assert_eq!(filegate::read_file(&p).unwrap(), b"{}");
}

#[test]
fn write_without_change_time_keeps_mtime_while_write_file_updates_it() {
    let td = tempdir().unwrap();
    let p = td.path().join("note.sy");
    fs::write(&p, "v1").unwrap();
    let past = FileTime::from_system_time(SystemTime::now() - Duration::from_secs(86_400));
    filetime::set_file_times(&p, past, past).unwrap();

    gate().write_file_without_change_time(&p, b"v2").unwrap();
    assert_eq!(fs::read_to_string(&p).unwrap(), "v2");
    assert_eq!(mtime(&p), past.unix_seconds());

    gate().write_file(&p, b"v3").unwrap();
    assert_eq!(fs::read_to_string(&p).unwrap(), "v3");
    assert!(mtime(&p) > past.unix_seconds() + 3600, "write_file should refresh mtime");
}

#[test]
fn write_by_reader_streams_large_input() {
    let td = tempdir().unwrap();
    let p = td.path().join("big.bin");
    let data: Vec<u8> = (0..(3 * 1024 * 1024 + 17)).map(|i| (i % 251) as u8).collect();
    filegate::write_file_by_reader(&p, std::io::Cursor::new(data.clone())).unwrap();
    assert_eq!(fs::read(&p).unwrap(), data);
}

#[test]
fn data_durability_writes_too() {
    let cfg = Config { durability: DurabilityMode::Data, ..Default::default() };
    let g = Gate::with_fatal_handler(cfg, Unwind);
    let td = tempdir().unwrap();
    let p = td.path().join("fast.txt");
    g.write_file(&p, b"quick").unwrap();
    assert_eq!(g.read_file(&p).unwrap(), b"quick");
}

#[cfg(unix)]
#[test]
fn default_mode_is_0644_and_configurable() {
    use std::os::unix::fs::PermissionsExt;
    let td = tempdir().unwrap();
    let p = td.path().join("m.txt");
    gate().write_file(&p, b"x").unwrap();
    assert_eq!(fs::metadata(&p).unwrap().permissions().mode() & 0o777, 0o644);

    let private = Gate::with_fatal_handler(Config { file_mode: 0o600, ..Default::default() }, Unwind);
    let q = td.path().join("private.txt");
    private.write_file(&q, b"secret").unwrap();
    assert_eq!(fs::metadata(&q).unwrap().permissions().mode() & 0o777, 0o600);
}

#[test]
fn no_temp_files_left_behind() {
    let td = tempdir().unwrap();
    for i in 0..5 {
        gate().write_file(td.path().join(format!("f{i}")), b"abc").unwrap();
    }
    for entry in fs::read_dir(td.path()).unwrap() {
        let name = entry.unwrap().file_name();
        let name = name.to_string_lossy();
        assert!(!name.starts_with(filegate::safe_io::TEMP_PREFIX), "tmp file left behind: {name}");
    }
}
