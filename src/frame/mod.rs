//! Frame format: header parsing and the incremental frame decoder.

pub mod decoder;
pub mod header;
pub mod types;

// Re-export key public API items at the module level.
pub use decoder::{DecodeOptions, FrameDecoder};
pub use header::{parse_block_header, parse_frame_descriptor, parse_frame_header, read_frame_header};
pub use types::{
    BlockHeader, BlockKind, ContentSizeFlag, DecodeStage, DictionaryIdFlag, FrameHeader,
    FrameHeaderDescriptor, MAGIC, MAX_BLOCK_SIZE, MAX_WINDOW_SIZE,
};
