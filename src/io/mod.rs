//! Stream and file drivers for the frame decoder.
//!
//! The frame decoder only exchanges bytes through its buffer protocol; the
//! modules here connect it to `Read`/`Write` transports and to files.

pub mod decompress;
pub mod decompress_dispatch;
pub mod decompress_resources;
pub mod file_io;
pub mod prefs;

// ── Core type re-exports ──────────────────────────────────────────────────────
pub use decompress_resources::DecompressResources;
pub use prefs::Prefs;

// ── Special I/O sentinels ─────────────────────────────────────────────────────
pub use file_io::{NUL_MARK, STDIN_MARK, STDOUT_MARK};

// ── In-memory and stream decoding ─────────────────────────────────────────────
pub use decompress::{decompress_frame_to_vec, decompress_stream};

// ── File decoding ─────────────────────────────────────────────────────────────
/// Decompress a single file.
pub use decompress_dispatch::decompress_filename;

/// Decompress multiple files, stripping a suffix to name each output.
pub use decompress_dispatch::decompress_multiple_filenames;

pub use decompress_dispatch::DecompressStats;
