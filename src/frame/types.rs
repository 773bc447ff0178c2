//! Frame format types and constants.
//!
//! Covers:
//! - Frame format constants (magic, header/block-header sizes, size caps)
//! - `BlockKind` / `BlockHeader`
//! - `DictionaryIdFlag` / `ContentSizeFlag` / `FrameHeaderDescriptor`
//! - `FrameHeader`
//! - `DecodeStage` enum driving the frame decoder

// ─────────────────────────────────────────────────────────────────────────────
// Frame format constants
// ─────────────────────────────────────────────────────────────────────────────

/// Frame magic number as it appears on the wire.
pub const MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Magic number as a little-endian `u32`.
pub const MAGIC_NUMBER: u32 = 0xFD2F_B528;

/// First of the 16 skippable-frame magic numbers (`0x184D2A50..=0x184D2A5F`).
pub const SKIPPABLE_MAGIC_START: u32 = 0x184D_2A50;

/// Mask folding every skippable-frame magic onto [`SKIPPABLE_MAGIC_START`].
pub const SKIPPABLE_MAGIC_MASK: u32 = 0xFFFF_FFF0;

/// Frame descriptor size in bytes.
pub const DESCRIPTOR_SIZE: usize = 1;

/// Largest frame header (window byte + 4-byte dictionary id + 8-byte content size).
pub const MAX_FRAME_HEADER_SIZE: usize = 13;

/// Block header size in bytes.
pub const BLOCK_HEADER_SIZE: usize = 3;

/// Content checksum trailer size in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// Hard cap on the window size of any frame.
pub const MAX_WINDOW_SIZE: usize = 8 * 1024 * 1024;

/// Upper bound on the regenerated size of one block.
pub const MAX_BLOCK_SIZE: usize = 128 * 1024;

/// Largest value the 21-bit block size field can hold.
pub const MAX_BLOCK_SIZE_FIELD: u32 = (1 << 21) - 1;

// ─────────────────────────────────────────────────────────────────────────────
// Block header
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BlockKind {
    /// Payload is stored verbatim.
    #[default]
    Raw = 0,
    /// Payload is one byte, repeated `size` times.
    Rle = 1,
    /// Payload is a literals section followed by a sequences section.
    Compressed = 2,
}

/// Decoded 3-byte block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockHeader {
    pub last_block: bool,
    pub kind: BlockKind,
    /// Payload size for Raw/Compressed; regenerated size for RLE.
    pub size: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame header descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Width class of the dictionary id field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DictionaryIdFlag {
    #[default]
    Absent = 0,
    OneByte = 1,
    TwoBytes = 2,
    FourBytes = 3,
}

impl DictionaryIdFlag {
    pub fn field_size(self) -> usize {
        match self {
            DictionaryIdFlag::Absent => 0,
            DictionaryIdFlag::OneByte => 1,
            DictionaryIdFlag::TwoBytes => 2,
            DictionaryIdFlag::FourBytes => 4,
        }
    }
}

/// Width class of the content size field.
///
/// `Flag0` means "absent" unless the frame is single-segment, in which case
/// the content size takes one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ContentSizeFlag {
    #[default]
    Flag0 = 0,
    Flag1 = 1,
    Flag2 = 2,
    Flag3 = 3,
}

impl ContentSizeFlag {
    pub fn field_size(self, single_segment: bool) -> usize {
        match self {
            ContentSizeFlag::Flag0 => usize::from(single_segment),
            ContentSizeFlag::Flag1 => 2,
            ContentSizeFlag::Flag2 => 4,
            ContentSizeFlag::Flag3 => 8,
        }
    }
}

/// Flags carried by the frame descriptor byte, plus the size of the header
/// that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHeaderDescriptor {
    pub dictionary_id_flag: DictionaryIdFlag,
    pub content_checksum_flag: bool,
    pub reserved_bit: bool,
    pub unused_bit: bool,
    pub single_segment: bool,
    pub content_size_flag: ContentSizeFlag,
    /// Bytes of frame header following the descriptor.
    pub header_size: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame header
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHeader {
    pub window_size: u32,
    /// Declared decompressed size, when the frame carries one.
    pub content_size: Option<u64>,
    /// 0 when the frame names no dictionary.
    pub dictionary_id: u32,
    pub content_checksum: bool,
}

impl FrameHeader {
    /// Largest block this frame may contain: `min(window_size, 128 KiB)`.
    #[inline]
    pub fn max_block_size(&self) -> usize {
        (self.window_size as usize).min(MAX_BLOCK_SIZE)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Decoder state machine stages
// ─────────────────────────────────────────────────────────────────────────────

/// Frame decoder stages, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum DecodeStage {
    /// No frame in progress (never started, finished, or failed).
    #[default]
    Done = 0,
    /// Waiting for the 4 magic bytes.
    ReadFrameMagic = 1,
    /// Waiting for the descriptor byte.
    ReadFrameDescriptor = 2,
    /// Waiting for the frame header bytes announced by the descriptor.
    ReadFrameHeader = 3,
    /// A block header is known; waiting for room to buffer its payload.
    ReadBlockHeader = 4,
    /// Waiting for the block payload plus the prefetched trailer.
    ReadBlockData = 5,
}
