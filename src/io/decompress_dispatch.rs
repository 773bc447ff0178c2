//! File-level decompression API.
//!
//! - [`decompress_filename`] decodes one source/destination pair.
//! - [`decompress_multiple_filenames`] decodes a list of sources, deriving
//!   each destination by stripping a suffix (e.g. `.zst`), or sending all of
//!   them to stdout / the null device when the suffix is one of those
//!   sentinels.
//!
//! # Design notes
//!
//! - **One decoder per run**: a single [`DecompressResources`] is built from
//!   [`Prefs`] and reused for every file, so the arena and the loaded
//!   dictionary are allocated once.
//!
//! - **Partial outputs**: when decoding into a regular file fails, the
//!   incomplete file is removed so it cannot be mistaken for a full result.
//!
//! - **File stat propagation**: the source's modification time and
//!   permissions are copied onto regular-file outputs via
//!   [`copy_file_stat`].

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::io::decompress::decompress_loop;
use crate::io::decompress_resources::DecompressResources;
use crate::io::file_io::{
    open_dst_file, open_src_file, output_filename, NUL_MARK, STDIN_MARK, STDOUT_MARK,
};
use crate::io::prefs::Prefs;
use crate::util::copy_file_stat;

// ---------------------------------------------------------------------------
// Public stats
// ---------------------------------------------------------------------------

/// Statistics returned by [`decompress_filename`].
#[derive(Debug, Clone, Default)]
pub struct DecompressStats {
    /// Total number of decompressed bytes written to the output.
    pub decompressed_bytes: u64,
}

// ---------------------------------------------------------------------------
// decompress_src_file
// ---------------------------------------------------------------------------

/// Decodes every frame of `src_path` into `dst`.
fn decompress_src_file<W: Write + ?Sized>(
    src_path: &str,
    dst: &mut W,
    prefs: &Prefs,
    resources: &mut DecompressResources,
) -> io::Result<u64> {
    let mut src = open_src_file(src_path)?;
    let filesize = decompress_loop(&mut src, dst, prefs, resources)
        .map_err(|e| io::Error::new(e.kind(), format!("{src_path}: {e}")))?;

    if crate::cli::constants::display_level() >= 2 {
        crate::displaylevel!(2, "\r{:79}\r", "");
        crate::displaylevel!(2, "{:<30.30} : decoded {} bytes \n", src_path, filesize);
    }

    Ok(filesize)
}

// ---------------------------------------------------------------------------
// decompress_dst_file
// ---------------------------------------------------------------------------

/// Opens `dst_path`, decodes `src_path` into it, then propagates metadata and
/// honours `--rm`.
fn decompress_dst_file(
    src_path: &str,
    dst_path: &str,
    prefs: &Prefs,
    resources: &mut DecompressResources,
) -> io::Result<u64> {
    let src_stat = if src_path != STDIN_MARK { fs::metadata(src_path).ok() } else { None };

    let mut dst = open_dst_file(dst_path, prefs)?;
    let result = decompress_src_file(src_path, &mut dst, prefs, resources)
        .and_then(|n| dst.flush().map(|()| n));
    let is_regular = dst.is_regular;
    drop(dst);

    let filesize = match result {
        Ok(n) => n,
        Err(e) => {
            if is_regular {
                let _ = fs::remove_file(dst_path);
            }
            return Err(e);
        }
    };

    if is_regular {
        if let Some(meta) = &src_stat {
            if let Err(e) = copy_file_stat(meta, Path::new(dst_path)) {
                crate::displaylevel!(3, "{}: could not copy file attributes: {}\n", dst_path, e);
            }
        }
    }

    if prefs.remove_src_file && src_path != STDIN_MARK {
        fs::remove_file(src_path)
            .map_err(|e| io::Error::new(e.kind(), format!("Remove error : {src_path}: {e}")))?;
    }

    Ok(filesize)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decompresses the file at `src` into `dst`.
///
/// Either side may be a sentinel: [`STDIN_MARK`], [`STDOUT_MARK`] or
/// [`NUL_MARK`]. Skippable frames and concatenated frames are handled.
///
/// # Errors
///
/// Returns an error on I/O failure, corrupted data, an unrecognised first
/// header, or a refused overwrite.
pub fn decompress_filename(src: &str, dst: &str, prefs: &Prefs) -> io::Result<DecompressStats> {
    let mut resources = DecompressResources::from_prefs(prefs)?;
    let bytes = decompress_dst_file(src, dst, prefs, &mut resources)?;
    Ok(DecompressStats { decompressed_bytes: bytes })
}

/// Decompresses multiple source files, deriving each output filename by
/// stripping `suffix` from the source name.
///
/// When `suffix` is [`STDOUT_MARK`] or [`NUL_MARK`], every file is decoded to
/// that destination. Otherwise files whose names do not end with `suffix` are
/// reported and skipped.
///
/// Every file is attempted; the returned error summarises how many failed.
pub fn decompress_multiple_filenames(srcs: &[&str], suffix: &str, prefs: &Prefs) -> io::Result<()> {
    let mut resources = DecompressResources::from_prefs(prefs)?;

    if !prefs.stream_checksum {
        crate::displaylevel!(4, "disabling checksum validation during decoding \n");
    }

    let mut total_processed: u64 = 0;
    let mut failed_files: u32 = 0;
    let mut skipped_files: u32 = 0;

    for &src_path in srcs {
        let result = if suffix == STDOUT_MARK || suffix == NUL_MARK {
            decompress_dst_file(src_path, suffix, prefs, &mut resources)
        } else {
            let Some(out_path) = output_filename(src_path, suffix) else {
                crate::displaylevel!(
                    1,
                    "File extension doesn't match expected ZSTD_EXTENSION ({:4}); will not process file: {}\n",
                    suffix,
                    src_path
                );
                skipped_files += 1;
                continue;
            };
            decompress_dst_file(src_path, out_path, prefs, &mut resources)
        };

        match result {
            Ok(n) => total_processed += n,
            Err(e) => {
                crate::displaylevel!(1, "unzstd: {}\n", e);
                failed_files += 1;
            }
        }
    }

    crate::displaylevel!(
        3,
        "{} file(s) decoded, {} bytes total\n",
        srcs.len() as u32 - failed_files - skipped_files,
        total_processed
    );

    if failed_files + skipped_files > 0 {
        Err(io::Error::other(format!(
            "{failed_files} file(s) could not be decompressed; {skipped_files} file(s) skipped"
        )))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
