//! Integration tests for atomic output files.

use std::fs;
use std::io::Write;

use filevault::storage::{atomic_write, AtomicFile};
use tempfile::TempDir;

fn names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn uncommitted_file_leaves_target_untouched() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("data.bin");
    fs::write(&target, b"original").unwrap();

    {
        let mut file = AtomicFile::create(&target).unwrap();
        file.write_all(b"half written").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"original");
    }

    assert_eq!(fs::read(&target).unwrap(), b"original");
    assert_eq!(names(dir.path()), vec!["data.bin"]);
}

#[test]
fn commit_replaces_target() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("data.bin");
    fs::write(&target, b"original").unwrap();

    let mut file = AtomicFile::create(&target).unwrap();
    assert_eq!(file.target(), target.as_path());
    file.write_all(b"replacement").unwrap();
    file.commit().unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"replacement");
    assert_eq!(names(dir.path()), vec!["data.bin"]);
}

#[test]
fn long_target_name_fits_the_temp_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join(format!("{}.txt", "x".repeat(246)));

    atomic_write(&target, b"new").unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"new");
    assert_eq!(names(dir.path()).len(), 1);
}

#[test]
fn atomic_write_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("missing/data.bin");
    assert!(atomic_write(&target, b"x").is_err());
    assert!(!target.exists());
}

#[cfg(unix)]
#[test]
fn committed_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let target = dir.path().join("secret.enc");
    atomic_write(&target, b"ciphertext").unwrap();

    let mode = fs::metadata(&target).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
