//! File-level API: naming, overwrite policy, source removal and metadata.

use std::fs;
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;
use zstd::io::{decompress_filename, decompress_multiple_filenames, Prefs, NUL_MARK};

use crate::frames::{FrameBuilder, DICT_PAYLOAD};

fn write_frame(dir: &TempDir, name: &str, content: &[u8]) -> String {
    let path = dir.path().join(name);
    let frame = FrameBuilder::single_segment(content.len() as u8).raw(true, content).build();
    fs::write(&path, frame).unwrap();
    path.to_str().unwrap().to_owned()
}

#[test]
fn output_keeps_source_mtime() {
    let dir = TempDir::new().unwrap();
    let src = write_frame(&dir, "doc.txt.zst", b"dated");
    let when = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
    filetime::set_file_mtime(&src, FileTime::from_system_time(when)).unwrap();

    let dst = dir.path().join("doc.txt");
    decompress_filename(&src, dst.to_str().unwrap(), &Prefs::default()).unwrap();
    let meta = fs::metadata(&dst).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), FileTime::from_system_time(when));
}

#[test]
fn existing_output_needs_force() {
    let dir = TempDir::new().unwrap();
    let src = write_frame(&dir, "a.zst", b"new");
    let dst = dir.path().join("a");
    fs::write(&dst, b"old").unwrap();

    assert!(decompress_filename(&src, dst.to_str().unwrap(), &Prefs::default()).is_err());
    assert_eq!(fs::read(&dst).unwrap(), b"old");

    let mut prefs = Prefs::default();
    prefs.set_overwrite(true);
    decompress_filename(&src, dst.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(fs::read(&dst).unwrap(), b"new");
}

#[test]
fn test_mode_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let src = write_frame(&dir, "t.zst", b"verify me");
    let mut prefs = Prefs::default();
    prefs.set_test_mode(true);
    let stats = decompress_filename(&src, NUL_MARK, &prefs).unwrap();
    assert_eq!(stats.decompressed_bytes, 9);
    assert!(!dir.path().join("t").exists());
}

#[test]
fn dictionary_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let dict = dir.path().join("dict");
    fs::write(&dict, b"unused prefix hello").unwrap();
    let src = dir.path().join("d.zst");
    fs::write(&src, FrameBuilder::with_dictionary_id(0x00, 5).compressed(true, &DICT_PAYLOAD).build())
        .unwrap();
    let dst = dir.path().join("d");

    let mut prefs = Prefs::default();
    prefs.set_dictionary_filename(dict.to_str());
    prefs.set_dictionary_id(5);
    decompress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(fs::read(&dst).unwrap(), b"hello");
}

#[test]
fn multiple_files_continue_after_failure() {
    let dir = TempDir::new().unwrap();
    let good = write_frame(&dir, "good.zst", b"fine");
    let bad = dir.path().join("bad.zst");
    fs::write(&bad, b"not a frame at all").unwrap();
    let later = write_frame(&dir, "later.zst", b"also fine");

    let srcs = [good.as_str(), bad.to_str().unwrap(), later.as_str()];
    assert!(decompress_multiple_filenames(&srcs, ".zst", &Prefs::default()).is_err());
    assert_eq!(fs::read(dir.path().join("good")).unwrap(), b"fine");
    assert_eq!(fs::read(dir.path().join("later")).unwrap(), b"also fine");
    assert!(!dir.path().join("bad").exists());
}

#[test]
fn multiple_files_to_null_device() {
    let dir = TempDir::new().unwrap();
    let a = write_frame(&dir, "a.zst", b"a");
    let b = write_frame(&dir, "b.zst", b"b");
    decompress_multiple_filenames(&[a.as_str(), b.as_str()], NUL_MARK, &Prefs::default()).unwrap();
    assert!(!dir.path().join("a").exists());
}

#[test]
fn missing_source_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.zst");
    let dst = dir.path().join("missing");
    assert!(decompress_filename(missing.to_str().unwrap(), dst.to_str().unwrap(), &Prefs::default())
        .is_err());
}
