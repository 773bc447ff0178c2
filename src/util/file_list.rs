//! Input list expansion for recursive mode.
//!
//! Directories are walked with [`walkdir`] in file-name order without
//! following symlinks; only regular files are kept. Non-directory inputs pass
//! through untouched so that missing files are reported by the caller when it
//! tries to open them.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Expands `inputs` into a flat list of files, descending into directories.
pub fn create_file_list<P: AsRef<Path>>(inputs: &[P]) -> io::Result<Vec<PathBuf>> {
    let mut result = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            result.push(input.to_path_buf());
            continue;
        }
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry = entry.map_err(|e| match e.io_error() {
                Some(io) => io::Error::new(io.kind(), io.to_string()),
                None => io::Error::other(e.to_string()),
            })?;
            if entry.file_type().is_file() {
                result.push(entry.into_path());
            }
        }
    }
    Ok(result)
}
