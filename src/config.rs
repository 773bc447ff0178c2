// config.rs: Compile-time configuration constants.
//
// Runtime settings chosen on the command line live in `io::prefs::Prefs`;
// the values here are the defaults those settings start from.

// Initial size of a frame decoder's arena. Grown per frame to
// window size + maximum block size + 4 and never shrunk.
pub const DECODER_RESERVED_DEFAULT: usize = 32;

// Default display level: 0 = silent, 1 = errors, 2 = progress/summary,
// 3 = per-frame details, 4 = per-block trace.
// Can be changed with -v / -q.
pub const DISPLAY_LEVEL_DEFAULT: u32 = 2;

// File extension of compressed files; stripped to derive output names.
pub const ZSTD_EXTENSION: &str = ".zst";

// Chunk size used by the stream driver when a frame decoder asks for more
// input than this at once.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;
