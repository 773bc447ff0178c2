//! Byte-order helpers and the frame/block header parsers.
//!
//! Covers:
//! - LE read helpers (`read_le16`, `read_le24`, `read_le32`, `read_le64`)
//! - `parse_block_header` / `block_header_from_raw`
//! - `parse_frame_descriptor`
//! - `parse_frame_header`
//! - `read_frame_header`: magic + descriptor + header from one slice
//!
//! All parsers are pure: they take bytes and return values.

use crate::error::{Result, ZstdError};
use crate::frame::types::{
    BlockHeader, BlockKind, ContentSizeFlag, DictionaryIdFlag, FrameHeader,
    FrameHeaderDescriptor, BLOCK_HEADER_SIZE, DESCRIPTOR_SIZE, MAGIC, MAX_WINDOW_SIZE,
};

// ─────────────────────────────────────────────────────────────────────────────
// Byte-order I/O helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read a little-endian `u16` from `src` at byte `offset`.
#[inline]
pub fn read_le16(src: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([src[offset], src[offset + 1]])
}

/// Read a little-endian 24-bit value from `src` at byte `offset`.
#[inline]
pub fn read_le24(src: &[u8], offset: usize) -> u32 {
    u32::from(src[offset]) | u32::from(src[offset + 1]) << 8 | u32::from(src[offset + 2]) << 16
}

/// Read a little-endian `u32` from `src` at byte `offset`.
#[inline]
pub fn read_le32(src: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        src[offset],
        src[offset + 1],
        src[offset + 2],
        src[offset + 3],
    ])
}

/// Read a little-endian `u64` from `src` at byte `offset`.
#[inline]
pub fn read_le64(src: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes([
        src[offset],
        src[offset + 1],
        src[offset + 2],
        src[offset + 3],
        src[offset + 4],
        src[offset + 5],
        src[offset + 6],
        src[offset + 7],
    ])
}

// ─────────────────────────────────────────────────────────────────────────────
// Block header
// ─────────────────────────────────────────────────────────────────────────────

/// Decode a block header from its 24-bit little-endian value.
///
/// Bit 0 is the last-block flag, bits 1–2 the kind (3 is reserved), and the
/// remaining 21 bits the size.
pub fn block_header_from_raw(raw: u32) -> Result<BlockHeader> {
    if raw > 0x00FF_FFFF {
        return Err(ZstdError::OutOfRange("block header value"));
    }
    let kind = match (raw >> 1) & 3 {
        0 => BlockKind::Raw,
        1 => BlockKind::Rle,
        2 => BlockKind::Compressed,
        _ => return Err(ZstdError::ReservedFieldUsed("block kind")),
    };
    Ok(BlockHeader { last_block: raw & 1 != 0, kind, size: raw >> 3 })
}

/// Decode a block header from the first 3 bytes of `data`.
pub fn parse_block_header(data: &[u8]) -> Result<BlockHeader> {
    if data.len() < BLOCK_HEADER_SIZE {
        return Err(ZstdError::OutOfRange("block header must be 3 bytes"));
    }
    block_header_from_raw(read_le24(data, 0))
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame header descriptor
// ─────────────────────────────────────────────────────────────────────────────

/// Decode the frame descriptor byte.
///
/// | bits | field |
/// |------|-------|
/// | 0–1  | dictionary id width class |
/// | 2    | content checksum present |
/// | 3    | reserved, must be 0 |
/// | 4    | unused |
/// | 5    | single segment |
/// | 6–7  | content size width class |
pub fn parse_frame_descriptor(raw: u8) -> Result<FrameHeaderDescriptor> {
    let dictionary_id_flag = match raw & 3 {
        0 => DictionaryIdFlag::Absent,
        1 => DictionaryIdFlag::OneByte,
        2 => DictionaryIdFlag::TwoBytes,
        _ => DictionaryIdFlag::FourBytes,
    };
    let content_size_flag = match (raw >> 6) & 3 {
        0 => ContentSizeFlag::Flag0,
        1 => ContentSizeFlag::Flag1,
        2 => ContentSizeFlag::Flag2,
        _ => ContentSizeFlag::Flag3,
    };
    let reserved_bit = (raw >> 3) & 1 != 0;
    if reserved_bit {
        return Err(ZstdError::ReservedFieldUsed("frame descriptor"));
    }
    let single_segment = (raw >> 5) & 1 != 0;

    let header_size = usize::from(!single_segment)
        + dictionary_id_flag.field_size()
        + content_size_flag.field_size(single_segment);

    Ok(FrameHeaderDescriptor {
        dictionary_id_flag,
        content_checksum_flag: (raw >> 2) & 1 != 0,
        reserved_bit,
        unused_bit: (raw >> 4) & 1 != 0,
        single_segment,
        content_size_flag,
        header_size,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame header
// ─────────────────────────────────────────────────────────────────────────────

/// Window size from the window descriptor byte: `2^(10 + exponent)` plus
/// `mantissa` eighths of that.
pub fn window_size_from_descriptor(raw: u8) -> Result<u32> {
    let mantissa = u64::from(raw & 7);
    let exponent = u64::from(raw >> 3);
    let base = 1u64 << (10 + exponent);
    let size = base + (base / 8) * mantissa;
    if size > MAX_WINDOW_SIZE as u64 {
        return Err(ZstdError::OutOfRange("window size"));
    }
    Ok(size as u32)
}

/// Decode the frame header bytes that follow the descriptor.
pub fn parse_frame_header(descriptor: &FrameHeaderDescriptor, data: &[u8]) -> Result<FrameHeader> {
    if data.len() < descriptor.header_size {
        return Err(ZstdError::OutOfRange("not enough data to decode frame header"));
    }
    if descriptor.reserved_bit {
        return Err(ZstdError::ReservedFieldUsed("frame header"));
    }

    let mut pos = 0usize;
    let mut window_size = 0u32;
    if !descriptor.single_segment {
        window_size = window_size_from_descriptor(data[0])?;
        pos += 1;
    }

    let dictionary_id = match descriptor.dictionary_id_flag {
        DictionaryIdFlag::Absent => 0,
        DictionaryIdFlag::OneByte => u32::from(data[pos]),
        DictionaryIdFlag::TwoBytes => u32::from(read_le16(data, pos)),
        DictionaryIdFlag::FourBytes => read_le32(data, pos),
    };
    pos += descriptor.dictionary_id_flag.field_size();

    let content_size = match descriptor.content_size_flag {
        ContentSizeFlag::Flag0 if descriptor.single_segment => Some(u64::from(data[pos])),
        ContentSizeFlag::Flag0 => None,
        ContentSizeFlag::Flag1 => Some(u64::from(read_le16(data, pos)) + 256),
        ContentSizeFlag::Flag2 => Some(u64::from(read_le32(data, pos))),
        ContentSizeFlag::Flag3 => Some(read_le64(data, pos)),
    };
    if matches!(content_size, Some(size) if size > i64::MAX as u64) {
        return Err(ZstdError::OutOfRange("content size"));
    }

    if descriptor.single_segment {
        // Single-segment frames always carry a content size.
        let size = content_size.unwrap_or(0);
        if size > MAX_WINDOW_SIZE as u64 {
            return Err(ZstdError::OutOfRange("content size"));
        }
        window_size = size as u32;
    }

    Ok(FrameHeader {
        window_size,
        content_size,
        dictionary_id,
        content_checksum: descriptor.content_checksum_flag,
    })
}

/// Parse magic, descriptor and header from the start of `src`.
///
/// Returns the header and the number of bytes it occupies. Fails with
/// `Corruption` when `src` ends before the header does.
pub fn read_frame_header(src: &[u8]) -> Result<(FrameHeader, usize)> {
    let magic_end = MAGIC.len();
    if src.len() < magic_end + DESCRIPTOR_SIZE {
        return Err(ZstdError::Corruption("input ends inside frame header"));
    }
    if src[..magic_end] != MAGIC {
        return Err(ZstdError::BadMagic("frame"));
    }
    let descriptor = parse_frame_descriptor(src[magic_end])?;
    let start = magic_end + DESCRIPTOR_SIZE;
    let end = start + descriptor.header_size;
    if src.len() < end {
        return Err(ZstdError::Corruption("input ends inside frame header"));
    }
    let header = parse_frame_header(&descriptor, &src[start..end])?;
    Ok((header, end))
}
