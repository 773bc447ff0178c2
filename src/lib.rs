// zstdr: streaming Zstandard frame decompressor

pub mod bitstream;
pub mod block;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod entropy;
pub mod error;
pub mod frame;
pub mod io;
pub mod util;
pub mod xxhash;

// ── Version constants ─────────────────────────────────────────────────────────
pub const ZSTDR_VERSION_MAJOR: u32 = 0;
pub const ZSTDR_VERSION_MINOR: u32 = 3;
pub const ZSTDR_VERSION_RELEASE: u32 = 0;
pub const ZSTDR_VERSION_NUMBER: u32 =
    ZSTDR_VERSION_MAJOR * 100 * 100 + ZSTDR_VERSION_MINOR * 100 + ZSTDR_VERSION_RELEASE;
pub const ZSTDR_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the runtime version number.
pub fn version_number() -> u32 {
    ZSTDR_VERSION_NUMBER
}

/// Returns the runtime version string.
pub fn version_string() -> &'static str {
    ZSTDR_VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use dictionary::Dictionary;
pub use error::{Result, ZstdError};
pub use frame::{DecodeOptions, DecodeStage, FrameDecoder, FrameHeader};
pub use io::{decompress_frame_to_vec, decompress_stream};
