//! Literals section decoding.
//!
//! The section starts with a bit-packed header (kind, size format, then the
//! regenerated and compressed sizes in format-dependent widths), followed by
//! the literal bytes stored raw, as a single repeated byte, or prefix-coded in
//! one or four bit-reversed streams.

use crate::bitstream::ByteReader;
use crate::dictionary::Dictionary;
use crate::entropy::HuffmanTable;
use crate::error::{Result, ZstdError};
use crate::frame::types::MAX_BLOCK_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LiteralsKind {
    Raw = 0,
    Rle = 1,
    /// Prefix-coded with a table described in this section.
    Huffman = 2,
    /// Prefix-coded with the previous block's (or the dictionary's) table.
    HuffmanRepeat = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralsHeader {
    pub kind: LiteralsKind,
    /// 2-bit size format; for prefix-coded literals, 0 selects a single stream.
    pub format: u8,
    pub regenerated_size: usize,
    /// Bytes following the header that belong to this section.
    pub compressed_size: usize,
}

impl LiteralsHeader {
    /// Reads the header, leaving `reader` byte-aligned on the section payload.
    ///
    /// | kind        | format | regenerated | compressed |
    /// |-------------|--------|-------------|------------|
    /// | Raw/RLE     | 0, 2   | 5 bits (format's high bit reused) | = regenerated / 1 |
    /// | Raw/RLE     | 1      | 12 bits     | = regenerated / 1 |
    /// | Raw/RLE     | 3      | 20 bits     | = regenerated / 1 |
    /// | Huffman     | 0, 1   | 10 bits     | 10 bits |
    /// | Huffman     | 2      | 14 bits     | 14 bits |
    /// | Huffman     | 3      | 18 bits     | 18 bits |
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let kind = match reader.read_bits(2)? {
            0 => LiteralsKind::Raw,
            1 => LiteralsKind::Rle,
            2 => LiteralsKind::Huffman,
            _ => LiteralsKind::HuffmanRepeat,
        };
        let format = reader.read_bits(2)? as u8;

        let (regenerated_size, compressed_size) = match kind {
            LiteralsKind::Raw | LiteralsKind::Rle => {
                let regenerated = match format {
                    0 | 2 => {
                        reader.rewind_bits(1)?;
                        reader.read_bits(5)?
                    }
                    1 => reader.read_bits(12)?,
                    _ => reader.read_bits(20)?,
                } as usize;
                let compressed = if kind == LiteralsKind::Rle { 1 } else { regenerated };
                (regenerated, compressed)
            }
            LiteralsKind::Huffman | LiteralsKind::HuffmanRepeat => {
                let bits = match format {
                    0 | 1 => 10,
                    2 => 14,
                    _ => 18,
                };
                let regenerated = reader.read_bits(bits)? as usize;
                let compressed = reader.read_bits(bits)? as usize;
                (regenerated, compressed)
            }
        };

        Ok(LiteralsHeader { kind, format, regenerated_size, compressed_size })
    }
}

/// Literals decoder; carries the prefix-code table from block to block.
#[derive(Debug, Clone, Default)]
pub struct LiteralsDecoder {
    table: Option<HuffmanTable>,
}

impl LiteralsDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a frame: the repeatable table is the dictionary's, if any.
    pub fn init(&mut self, dictionary: Option<&Dictionary>) {
        self.table = dictionary.and_then(|d| d.literals_table()).cloned();
    }

    /// Decodes one literals section into `out` (cleared first).
    pub fn decode(&mut self, reader: &mut ByteReader<'_>, out: &mut Vec<u8>) -> Result<()> {
        let header = LiteralsHeader::read(reader)?;
        if header.regenerated_size > MAX_BLOCK_SIZE {
            return Err(ZstdError::Corruption("literals exceed maximum block size"));
        }
        out.clear();
        out.resize(header.regenerated_size, 0);
        let mut section = reader.sub_reader(header.compressed_size)?;

        match header.kind {
            LiteralsKind::Raw => {
                out.copy_from_slice(section.read_bytes(header.regenerated_size)?);
            }
            LiteralsKind::Rle => {
                let byte = section.read_u8()?;
                out.fill(byte);
            }
            LiteralsKind::Huffman | LiteralsKind::HuffmanRepeat => {
                if header.kind == LiteralsKind::Huffman {
                    self.table.get_or_insert_with(HuffmanTable::default).read(&mut section)?;
                }
                let table = self
                    .table
                    .as_ref()
                    .ok_or(ZstdError::Corruption("repeated literals table without a previous table"))?;
                let written = if header.format == 0 {
                    let stream = section.read_bytes(section.remaining())?;
                    table.decode_stream(stream, out)?
                } else {
                    decode_four_streams(table, &mut section, out)?
                };
                if written != header.regenerated_size {
                    return Err(ZstdError::Corruption("literals regenerated size mismatch"));
                }
            }
        }
        Ok(())
    }
}

/// Three explicit 16-bit stream sizes, then four streams decoded back to back.
fn decode_four_streams(
    table: &HuffmanTable,
    section: &mut ByteReader<'_>,
    out: &mut [u8],
) -> Result<usize> {
    let sizes = [
        section.read_u16_le()? as usize,
        section.read_u16_le()? as usize,
        section.read_u16_le()? as usize,
    ];
    let mut pos = 0usize;
    for size in sizes {
        let stream = section.read_bytes(size)?;
        pos += table.decode_stream(stream, &mut out[pos..])?;
    }
    let last = section.read_bytes(section.remaining())?;
    pos += table.decode_stream(last, &mut out[pos..])?;
    Ok(pos)
}
