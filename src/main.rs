//! Binary entry point for the `unzstd` command-line tool.
//!
//! Handles post-parse validation, recursive directory expansion, output
//! destination resolution and dispatch to the file-level decoder.
//!
//! # Control flow
//!
//! 1. [`detect_alias`] inspects `argv[0]` to infer initial settings
//!    (e.g. `zstdcat` implies `-c`).
//! 2. [`parse_args`] processes all flags and builds a [`ParsedArgs`] value.
//! 3. [`run`] resolves the destination and decodes every input.
//!
//! Exit code is 0 on success and 1 if any input failed.

use std::io::IsTerminal;

use anyhow::{bail, Context};

use zstd::cli::args::{parse_args, ParsedArgs};
use zstd::cli::constants::{display_level, set_display_level, UNZSTD};
use zstd::cli::init::detect_alias;
use zstd::config::ZSTD_EXTENSION;
use zstd::io::{decompress_filename, decompress_multiple_filenames, NUL_MARK, STDIN_MARK, STDOUT_MARK};

/// Expands directory inputs when `-r` is given; `stdin` passes through.
#[cfg(feature = "recursive")]
fn expand_inputs(inputs: Vec<String>, recursive: bool) -> anyhow::Result<Vec<String>> {
    if !recursive {
        return Ok(inputs);
    }
    let mut expanded = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input == STDIN_MARK {
            expanded.push(input);
            continue;
        }
        let list = zstd::util::create_file_list(&[input.as_str()])
            .with_context(|| format!("cannot list {input}"))?;
        expanded.extend(list.into_iter().map(|p| p.to_string_lossy().into_owned()));
    }
    for (u, p) in expanded.iter().enumerate() {
        zstd::displaylevel!(4, "{} {}\n", u, p);
    }
    Ok(expanded)
}

#[cfg(not(feature = "recursive"))]
fn expand_inputs(inputs: Vec<String>, recursive: bool) -> anyhow::Result<Vec<String>> {
    if recursive {
        zstd::displaylevel!(2, "warning: this executable was built without recursive mode \n");
    }
    Ok(inputs)
}

/// Executes the decoding selected by argument parsing.
fn run(args: ParsedArgs) -> anyhow::Result<()> {
    set_display_level(args.display_level);
    zstd::displaylevel!(
        3,
        "*** {} v{} {}-bit ***\n",
        UNZSTD,
        zstd::version_string(),
        std::mem::size_of::<*const ()>() * 8
    );

    let prefs = args.prefs;
    let inputs = expand_inputs(args.inputs, args.recursive)?;

    if inputs.iter().any(|s| s == STDIN_MARK) && std::io::stdin().is_terminal() {
        bail!("refusing to read from a console");
    }

    let destination = if prefs.test_mode {
        Some(NUL_MARK.to_owned())
    } else if args.force_stdout {
        Some(STDOUT_MARK.to_owned())
    } else if let Some(out) = args.output_filename {
        Some(out)
    } else if inputs.len() == 1 && inputs[0] == STDIN_MARK {
        Some(STDOUT_MARK.to_owned())
    } else {
        None
    };

    // Keep stdout clean of progress lines when it carries the data.
    if destination.as_deref() == Some(STDOUT_MARK) && display_level() == 2 {
        set_display_level(1);
    }

    let srcs: Vec<&str> = inputs.iter().map(String::as_str).collect();
    match destination {
        Some(dst) if srcs.len() == 1 => {
            decompress_filename(srcs[0], &dst, &prefs)?;
        }
        Some(dst) => decompress_multiple_filenames(&srcs, &dst, &prefs)?,
        None => {
            // Each output is named after its input minus the extension.
            let suffix = ZSTD_EXTENSION;
            decompress_multiple_filenames(&srcs, suffix, &prefs)?
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let argv0 = std::env::args().next().unwrap_or_else(|| UNZSTD.to_owned());
    let init = detect_alias(&argv0);
    if let Some(level) = init.display_level_override {
        set_display_level(level);
    }

    let args = match parse_args(init) {
        Ok(a) => a,
        Err(e) => match e.downcast_ref::<clap::Error>() {
            // --help / --version exit 0; usage errors exit 2 with clap's message.
            Some(ce) => ce.exit(),
            None => {
                zstd::display!("{}: {}\n", UNZSTD, e);
                std::process::exit(1);
            }
        },
    };

    if let Err(e) = run(args) {
        zstd::displaylevel!(1, "{}: {:#}\n", UNZSTD, e);
        std::process::exit(1);
    }
}
