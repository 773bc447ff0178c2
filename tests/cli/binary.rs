//! End-to-end runs of the `unzstd` executable.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

use crate::frames::FrameBuilder;

fn unzstd() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_unzstd"))
}

fn frame(content: &[u8]) -> Vec<u8> {
    FrameBuilder::single_segment(content.len() as u8).raw(true, content).build()
}

fn run(exe: &Path, args: &[&str], cwd: &Path) -> Output {
    Command::new(exe).args(args).current_dir(cwd).output().unwrap()
}

fn run_with_stdin(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(unzstd())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn decodes_file_next_to_source() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt.zst"), frame(b"some notes")).unwrap();
    let out = run(&unzstd(), &["notes.txt.zst"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(dir.path().join("notes.txt")).unwrap(), b"some notes");
}

#[test]
fn stdout_flag() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.zst"), frame(b"to stdout")).unwrap();
    let out = run(&unzstd(), &["-c", "a.zst"], dir.path());
    assert!(out.status.success());
    assert_eq!(out.stdout, b"to stdout");
    assert!(!dir.path().join("a").exists());
}

#[test]
fn stdin_to_stdout() {
    let mut input = frame(b"piped ");
    input.extend(frame(b"twice"));
    let out = run_with_stdin(&[], &input);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(out.stdout, b"piped twice");
}

#[test]
fn corrupt_input_exits_with_one() {
    let mut input = frame(b"abc");
    input[4] |= 0x08;
    let out = run_with_stdin(&["-q"], &input);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

#[test]
fn several_inputs_drop_extension() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("one.log.zst"), frame(b"first")).unwrap();
    fs::write(dir.path().join("two.log.zst"), frame(b"second")).unwrap();
    let out = run(&unzstd(), &["one.log.zst", "two.log.zst"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(dir.path().join("one.log")).unwrap(), b"first");
    assert_eq!(fs::read(dir.path().join("two.log")).unwrap(), b"second");
}

#[test]
fn test_mode_leaves_no_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("t.zst"), frame(b"checked")).unwrap();
    let out = run(&unzstd(), &["-t", "t.zst"], dir.path());
    assert!(out.status.success());
    assert!(!dir.path().join("t").exists());
}

#[test]
fn remove_source() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("r.zst"), frame(b"moved")).unwrap();
    let out = run(&unzstd(), &["--rm", "r.zst"], dir.path());
    assert!(out.status.success());
    assert!(!dir.path().join("r.zst").exists());
    assert_eq!(fs::read(dir.path().join("r")).unwrap(), b"moved");
}

#[test]
fn refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("o.zst"), frame(b"new")).unwrap();
    fs::write(dir.path().join("o"), b"old").unwrap();
    let out = run(&unzstd(), &["o.zst"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(fs::read(dir.path().join("o")).unwrap(), b"old");

    let out = run(&unzstd(), &["-f", "o.zst"], dir.path());
    assert!(out.status.success());
    assert_eq!(fs::read(dir.path().join("o")).unwrap(), b"new");
}

#[cfg(feature = "recursive")]
#[test]
fn recursive_directory() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("tree").join("inner");
    fs::create_dir_all(&sub).unwrap();
    fs::write(dir.path().join("tree").join("top.zst"), frame(b"top")).unwrap();
    fs::write(sub.join("deep.zst"), frame(b"deep")).unwrap();

    let out = run(&unzstd(), &["-r", "tree"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(dir.path().join("tree").join("top")).unwrap(), b"top");
    assert_eq!(fs::read(sub.join("deep")).unwrap(), b"deep");
}

#[cfg(unix)]
#[test]
fn zstdcat_alias_writes_stdout() {
    let dir = TempDir::new().unwrap();
    let alias = dir.path().join("zstdcat");
    std::os::unix::fs::symlink(unzstd(), &alias).unwrap();
    fs::write(dir.path().join("c.zst"), frame(b"cat me")).unwrap();
    let out = run(&alias, &["c.zst"], dir.path());
    assert!(out.status.success());
    assert_eq!(out.stdout, b"cat me");
}

#[test]
fn unknown_option_fails() {
    let dir = TempDir::new().unwrap();
    let out = run(&unzstd(), &["--no-such-flag"], dir.path());
    assert!(!out.status.success());
}
