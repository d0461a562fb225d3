use std::fs;
use std::time::{Duration, SystemTime};

use solvpack_fs::{
    AtomicCopyOptions, MatchOptions, Workspace, atomic_copy, find_files_named, modified,
    set_modified,
};
use tempfile::tempdir;

#[test]
fn test_copy_is_idempotent() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("cbc.exe");
    let dest = dir.path().join("dist/app/_internal/cbc.exe");
    fs::write(&src, vec![7u8; 4096]).unwrap();

    let first = atomic_copy(&src, &dest, AtomicCopyOptions::new()).unwrap();
    let second = atomic_copy(&src, &dest, AtomicCopyOptions::new()).unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::metadata(&dest).unwrap().len(), 4096);
    let leftovers: Vec<_> = fs::read_dir(dest.parent().unwrap()).unwrap().collect();
    assert_eq!(leftovers.len(), 1);
}

#[test]
fn test_find_then_copy_from_staging() {
    let dir = tempdir().unwrap();
    let workspace = Workspace::new(dir.path().join("staging")).unwrap();
    let bin_dir = workspace.create_dir_all("cbc-win64/bin").unwrap();
    fs::write(bin_dir.join("cbc.exe"), b"solver").unwrap();

    let found = find_files_named(workspace.path(), "cbc.exe", MatchOptions::default()).unwrap();
    assert_eq!(found, vec![bin_dir.join("cbc.exe")]);

    let out = dir.path().join("out/cbc.exe");
    atomic_copy(&found[0], &out, AtomicCopyOptions::new()).unwrap();
    drop(workspace);

    assert_eq!(fs::read(&out).unwrap(), b"solver");
    assert!(!dir.path().join("staging").exists());
}

#[test]
fn test_future_mtime_reset() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tzdata.zip");
    fs::write(&path, b"tz").unwrap();

    let future = SystemTime::now() + Duration::from_secs(365 * 24 * 60 * 60);
    set_modified(&path, future).unwrap();
    assert!(modified(&path).unwrap() > SystemTime::now());

    let now = SystemTime::now();
    set_modified(&path, now).unwrap();
    let stamped = modified(&path).unwrap();
    let drift = stamped
        .duration_since(now)
        .unwrap_or_else(|e| e.duration());
    assert!(drift < Duration::from_millis(1));
}
