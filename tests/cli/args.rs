//! Argument parsing through the public CLI entry points.

use zstd::cli::args::parse_args_from;
use zstd::cli::init::{detect_alias, CliInit};
use zstd::io::STDIN_MARK;

#[test]
fn file_list_and_output() {
    let a = parse_args_from(CliInit::default(), ["unzstd", "-o", "plain.txt", "in.zst"]).unwrap();
    assert_eq!(a.inputs, ["in.zst"]);
    assert_eq!(a.output_filename.as_deref(), Some("plain.txt"));
}

#[test]
fn long_forms() {
    let a = parse_args_from(
        CliInit::default(),
        ["unzstd", "--stdout", "--force", "--test", "--verbose", "x.zst"],
    )
    .unwrap();
    assert!(a.force_stdout);
    assert!(a.prefs.overwrite);
    assert!(a.prefs.test_mode);
    assert_eq!(a.display_level, 3);
}

#[test]
fn recursive_flag() {
    let a = parse_args_from(CliInit::default(), ["unzstd", "-r", "dir"]).unwrap();
    assert!(a.recursive);
}

#[test]
fn zstdcat_alias_defaults() {
    let init = detect_alias("/opt/bin/zstdcat");
    let a = parse_args_from(init, ["zstdcat"]).unwrap();
    assert!(a.force_stdout);
    assert_eq!(a.inputs, [STDIN_MARK]);
    assert_eq!(a.display_level, 1);
}

#[test]
fn help_is_reported_as_clap_error() {
    let err = parse_args_from(CliInit::default(), ["unzstd", "--help"]).unwrap_err();
    let clap_err = err.downcast_ref::<clap::Error>().unwrap();
    assert_eq!(clap_err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn non_numeric_dict_id_rejected() {
    assert!(parse_args_from(CliInit::default(), ["unzstd", "-D", "d", "--dict-id", "abc"]).is_err());
}
