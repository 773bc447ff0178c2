//! Forward byte/bit reader.
//!
//! Bit reads are packed little-endian: the first bit read is bit 0 of the
//! current byte. Aligned-only operations (`read_u8`, `read_u16_le`, ...,
//! `read_bytes`, sub-views) fail with [`ZstdError::MalformedSize`] when the
//! cursor sits inside a byte.

use super::{read_bits_le, ReverseBitReader};
use crate::error::{Result, ZstdError};

/// Forward cursor over a borrowed byte range.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit_offset: u32,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0, bit_offset: 0 }
    }

    /// Current byte position (the partially consumed byte counts as not consumed).
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left from the current byte position.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    fn bit_position(&self) -> usize {
        self.pos * 8 + self.bit_offset as usize
    }

    #[inline]
    fn set_bit_position(&mut self, pos: usize) {
        self.pos = pos / 8;
        self.bit_offset = (pos % 8) as u32;
    }

    /// Reads `bits` (1..=32) bits as an unsigned integer.
    pub fn read_bits(&mut self, bits: u32) -> Result<u32> {
        if bits == 0 || bits > 32 {
            return Err(ZstdError::MalformedSize("forward bit read width"));
        }
        let pos = self.bit_position();
        if pos + bits as usize > self.data.len() * 8 {
            return Err(ZstdError::Corruption("bit field runs past end of input"));
        }
        let value = read_bits_le(self.data, pos, bits);
        self.set_bit_position(pos + bits as usize);
        Ok(value)
    }

    /// Moves the cursor back by `bits` bits.
    pub fn rewind_bits(&mut self, bits: u32) -> Result<()> {
        let pos = self.bit_position();
        if pos < bits as usize {
            return Err(ZstdError::OutOfRange("rewind before start of input"));
        }
        self.set_bit_position(pos - bits as usize);
        Ok(())
    }

    /// Skips to the next byte boundary. No-op when already aligned.
    pub fn align(&mut self) -> Result<()> {
        if self.bit_offset != 0 {
            if self.remaining() == 0 {
                return Err(ZstdError::Corruption("align past end of input"));
            }
            self.pos += 1;
            self.bit_offset = 0;
        }
        Ok(())
    }

    #[inline]
    fn check_aligned(&self) -> Result<()> {
        if self.bit_offset != 0 {
            return Err(ZstdError::MalformedSize("unaligned access"));
        }
        Ok(())
    }

    /// Takes `len` aligned bytes and advances past them.
    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        self.check_aligned()?;
        if len > self.remaining() {
            return Err(ZstdError::Corruption("input truncated"));
        }
        let data: &'a [u8] = self.data;
        let out = &data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(u64::from_le_bytes(raw))
    }

    /// Returns a view over the next `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    /// Forward reader over the next `len` bytes; this reader skips past them.
    pub fn sub_reader(&mut self, len: usize) -> Result<ByteReader<'a>> {
        Ok(ByteReader::new(self.take(len)?))
    }

    /// Backward bit reader over the next `len` bytes; this reader skips past them.
    pub fn sub_reverse_reader(&mut self, len: usize) -> Result<ReverseBitReader<'a>> {
        ReverseBitReader::new(self.take(len)?)
    }
}
