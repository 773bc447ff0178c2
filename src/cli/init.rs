//! CLI initialization and binary-alias detection.
//!
//! The decompressor may be installed under several names via hard or
//! symbolic links. [`detect_alias`] inspects `argv[0]` before any flag is
//! parsed and returns a [`CliInit`] carrying the implied defaults; the
//! argument parser layers explicit flags on top.

use std::path::Path;

use crate::cli::constants::ZSTDCAT;

/// Initial CLI state derived from the binary name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliInit {
    /// Output goes to stdout regardless of the file arguments.
    pub force_stdout: bool,
    /// Display level implied by the alias (`zstdcat` is quiet).
    pub display_level_override: Option<u32>,
}

/// Returns the program name of `argv0` without directories or extension.
pub fn program_name(argv0: &str) -> &str {
    let base = argv0.rsplit(&['/', '\\'][..]).next().unwrap_or(argv0);
    Path::new(base).file_stem().and_then(|s| s.to_str()).unwrap_or(base)
}

/// Detects the initial settings from `argv[0]`.
///
/// | Binary name | Effect                          |
/// |-------------|---------------------------------|
/// | `zstdcat`   | Force stdout, display level 1   |
/// | anything else | Defaults                      |
pub fn detect_alias(argv0: &str) -> CliInit {
    if program_name(argv0) == ZSTDCAT {
        return CliInit { force_stdout: true, display_level_override: Some(1) };
    }
    CliInit::default()
}
