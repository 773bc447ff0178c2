//! File status helpers used by the file-level decompression API.
//!
//! Metadata comes from `std::fs`; timestamps are applied with the `filetime`
//! crate so the output keeps the source's modification time.

use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

use filetime::FileTime;

/// Copies the modification time and permission bits of `src` onto the
/// regular file at `dst`. The access time is set to now.
pub fn copy_file_stat(src: &Metadata, dst: &Path) -> io::Result<()> {
    if !is_reg_file(dst) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: not a regular file", dst.display()),
        ));
    }

    let mtime = FileTime::from_last_modification_time(src);
    let atime = FileTime::from_system_time(SystemTime::now());
    filetime::set_file_times(dst, atime, mtime)?;
    fs::set_permissions(dst, src.permissions())
}

/// Returns `true` if `path` refers to a regular file (following symlinks).
pub fn is_reg_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.file_type().is_file()).unwrap_or(false)
}

/// Returns `true` if `path` refers to a directory (following symlinks).
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.file_type().is_dir()).unwrap_or(false)
}
