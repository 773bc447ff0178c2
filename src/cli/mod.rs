//! Command-line interface for the `unzstd` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings and the shared `DISPLAY_LEVEL` atomic with its display macros. |
//! | [`init`]      | `CliInit`: defaults implied by the binary name (`zstdcat`). |
//! | [`args`]      | `ParsedArgs`: clap-based parsing of `argv` into preferences, inputs and destination. |
//!
//! Typical call sequence: `detect_alias` → `parse_args` → dispatch to the I/O layer.

pub mod constants;
pub mod init;
pub mod args;
