//! File I/O primitives for the decompression pipeline.
//!
//! - [`open_src_file`] resolves a path string to a `Box<dyn Read>`, handling
//!   the `"stdin"` sentinel and rejecting directories.
//! - [`open_dst_file`] resolves a path string to a [`DstFile`], handling the
//!   `"stdout"` and null-device sentinels and enforcing the overwrite policy
//!   from [`Prefs`].
//! - [`output_filename`] derives the destination name by stripping the
//!   compressed-file extension.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use crate::config::STREAM_CHUNK_SIZE;
use crate::frame::types::{SKIPPABLE_MAGIC_MASK, SKIPPABLE_MAGIC_START};
use crate::io::prefs::Prefs;
use crate::util::is_directory;

// ---------------------------------------------------------------------------
// Sentinel strings
// ---------------------------------------------------------------------------

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "stdin";

/// Sentinel: write to standard output.
pub const STDOUT_MARK: &str = "stdout";

/// Sentinel: discard output.
#[cfg(windows)]
pub const NUL_MARK: &str = "nul";
#[cfg(not(windows))]
pub const NUL_MARK: &str = "/dev/null";

// ---------------------------------------------------------------------------
// Skippable magic number
// ---------------------------------------------------------------------------

/// Returns `true` if `magic` is in the skippable-frame range
/// `[0x184D2A50, 0x184D2A5F]`.
#[inline]
pub fn is_skippable_magic_number(magic: u32) -> bool {
    (magic & SKIPPABLE_MAGIC_MASK) == SKIPPABLE_MAGIC_START
}

// ---------------------------------------------------------------------------
// Output name
// ---------------------------------------------------------------------------

/// Strips `suffix` from `src`; `None` when `src` does not end with it or
/// would become empty.
pub fn output_filename<'a>(src: &'a str, suffix: &str) -> Option<&'a str> {
    match src.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() && !stem.ends_with(std::path::MAIN_SEPARATOR) => Some(stem),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Source file
// ---------------------------------------------------------------------------

/// Opens a source file for reading.
///
/// `"stdin"` yields standard input; directories are rejected with
/// [`io::ErrorKind::InvalidInput`]. Files are buffered.
pub fn open_src_file(path: &str) -> io::Result<Box<dyn Read>> {
    if path == STDIN_MARK {
        crate::displaylevel!(4, "Using stdin for input\n");
        return Ok(Box::new(BufReader::with_capacity(STREAM_CHUNK_SIZE, io::stdin())));
    }

    if is_directory(Path::new(path)) {
        crate::displaylevel!(1, "unzstd: {} is a directory -- ignored\n", path);
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path),
        ));
    }

    let f = File::open(path).map_err(|e| {
        crate::displaylevel!(1, "{}: {}\n", path, e);
        e
    })?;
    Ok(Box::new(BufReader::with_capacity(STREAM_CHUNK_SIZE, f)))
}

// ---------------------------------------------------------------------------
// Destination file
// ---------------------------------------------------------------------------

/// A write-capable destination produced by [`open_dst_file`]: a regular
/// file, stdout, or a discard sink.
pub struct DstFile {
    inner: Box<dyn Write>,
    pub is_stdout: bool,
    /// `true` for a regular file created by [`open_dst_file`].
    pub is_regular: bool,
}

impl Write for DstFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Opens a destination for writing.
///
/// `"stdout"` and [`NUL_MARK`] are resolved before touching the filesystem.
/// An existing file is only replaced when `prefs.overwrite` is set.
pub fn open_dst_file(path: &str, prefs: &Prefs) -> io::Result<DstFile> {
    if path == STDOUT_MARK {
        crate::displaylevel!(4, "Using stdout for output\n");
        return Ok(DstFile { inner: Box::new(io::stdout()), is_stdout: true, is_regular: false });
    }

    if path == NUL_MARK {
        return Ok(DstFile { inner: Box::new(io::sink()), is_stdout: false, is_regular: false });
    }

    if !prefs.overwrite && Path::new(path).exists() {
        crate::displaylevel!(1, "{} already exists; not overwritten  \n", path);
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{}: already exists; not overwritten", path),
        ));
    }

    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| {
            crate::displaylevel!(1, "{}: {}\n", path, e);
            e
        })?;

    Ok(DstFile {
        inner: Box::new(io::BufWriter::with_capacity(STREAM_CHUNK_SIZE, f)),
        is_stdout: false,
        is_regular: true,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
