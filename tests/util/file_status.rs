//! Metadata propagation onto decoded outputs.

use std::fs;

use tempfile::TempDir;
use zstd::util::{copy_file_stat, is_directory, is_reg_file};

#[cfg(unix)]
#[test]
fn permissions_follow_source() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let src = dir.path().join("s.zst");
    let dst = dir.path().join("s");
    fs::write(&src, b"").unwrap();
    fs::write(&dst, b"").unwrap();
    fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();

    copy_file_stat(&fs::metadata(&src).unwrap(), &dst).unwrap();
    assert_eq!(fs::metadata(&dst).unwrap().permissions().mode() & 0o777, 0o640);
}

#[test]
fn missing_destination_is_rejected() {
    let dir = TempDir::new().unwrap();
    let meta = fs::metadata(dir.path()).unwrap();
    assert!(copy_file_stat(&meta, &dir.path().join("absent")).is_err());
}

#[test]
fn kind_checks() {
    let dir = TempDir::new().unwrap();
    assert!(is_directory(dir.path()));
    assert!(!is_reg_file(dir.path()));
}
