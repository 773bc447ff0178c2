//! Command-line argument parsing for `unzstd` / `zstdcat`.
//!
//! The entry points are [`parse_args`] (reads `std::env::args_os()`) and
//! [`parse_args_from`] (takes an explicit argument list, suitable for
//! unit-testing). Both return a [`ParsedArgs`] value that carries the
//! resolved [`Prefs`], the input list and the destination choice.
//!
//! Syntax errors, `--help` and `--version` surface as a [`clap::Error`]
//! wrapped in the returned `anyhow::Error`; option combinations that parse
//! but make no sense return an error whose message begins with
//! `"bad usage: "`.

use std::ffi::OsString;

use anyhow::bail;
use clap::{ArgAction, Parser};

use crate::cli::init::CliInit;
use crate::config::DISPLAY_LEVEL_DEFAULT;
use crate::io::file_io::STDIN_MARK;
use crate::io::prefs::Prefs;

/// Highest display level with distinct output.
const DISPLAY_LEVEL_MAX: u32 = 4;

#[derive(Parser, Debug)]
#[command(name = "unzstd", about = "Decompress Zstandard (.zst) files", version)]
struct Cli {
    /// Decompress (the only operation; accepted for compatibility)
    #[arg(short = 'd', long = "decompress")]
    _decompress: bool,

    /// Write output to FILE (single input only)
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<String>,

    /// Write to standard output
    #[arg(short = 'c', long = "stdout")]
    stdout: bool,

    /// Overwrite existing output files
    #[arg(short = 'f', long)]
    force: bool,

    /// Remove source files after successful decompression
    #[arg(long = "rm")]
    rm: bool,

    /// Test integrity: decode and verify, write nothing
    #[arg(short = 't', long)]
    test: bool,

    /// Use FILE as raw dictionary content
    #[arg(short = 'D', value_name = "FILE")]
    dictionary: Option<String>,

    /// Dictionary id required by frames (0 accepts any)
    #[arg(long = "dict-id", value_name = "N", default_value_t = 0)]
    dict_id: u32,

    /// Operate recursively on directories
    #[arg(short = 'r')]
    recursive: bool,

    /// Skip content checksum verification
    #[arg(long = "no-check")]
    no_check: bool,

    /// Increase verbosity (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (repeatable)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    quiet: u8,

    /// Input files; none or `-` reads standard input
    #[arg(value_name = "FILES")]
    files: Vec<String>,
}

/// Options and filenames produced by argument parsing.
#[derive(Debug)]
pub struct ParsedArgs {
    /// Decompression preferences.
    pub prefs: Prefs,
    /// Input paths; [`STDIN_MARK`] stands for standard input.
    pub inputs: Vec<String>,
    /// Explicit output path from `-o`.
    pub output_filename: Option<String>,
    /// Send every output to stdout.
    pub force_stdout: bool,
    /// Descend into directory inputs.
    pub recursive: bool,
    /// Display level after applying `-v` / `-q`.
    pub display_level: u32,
}

/// Parses `std::env::args_os()` using `init` as the starting state.
pub fn parse_args(init: CliInit) -> anyhow::Result<ParsedArgs> {
    parse_args_from(init, std::env::args_os())
}

/// Parses an explicit argument list (including the program name) using
/// `init` as the starting state.
pub fn parse_args_from<I, T>(init: CliInit, argv: I) -> anyhow::Result<ParsedArgs>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(argv)?;

    if cli.dict_id != 0 && cli.dictionary.is_none() {
        bail!("bad usage: --dict-id requires -D");
    }

    let mut inputs: Vec<String> = cli
        .files
        .into_iter()
        .map(|f| if f == "-" { STDIN_MARK.to_owned() } else { f })
        .collect();
    if inputs.is_empty() {
        inputs.push(STDIN_MARK.to_owned());
    }

    if cli.output.is_some() && inputs.len() > 1 {
        bail!("bad usage: -o cannot be used with multiple input files");
    }

    let base = init.display_level_override.unwrap_or(DISPLAY_LEVEL_DEFAULT);
    let display_level = (base + u32::from(cli.verbose))
        .saturating_sub(u32::from(cli.quiet))
        .min(DISPLAY_LEVEL_MAX);

    let mut prefs = Prefs::default();
    prefs.set_overwrite(cli.force);
    prefs.set_test_mode(cli.test);
    prefs.set_remove_src_file(cli.rm);
    prefs.set_stream_checksum_mode(!cli.no_check);
    prefs.set_dictionary_filename(cli.dictionary.as_deref());
    prefs.set_dictionary_id(cli.dict_id);

    Ok(ParsedArgs {
        prefs,
        inputs,
        output_filename: cli.output,
        force_stdout: init.force_stdout || cli.stdout,
        recursive: cli.recursive,
        display_level,
    })
}
