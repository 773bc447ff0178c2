//! Backward bit reader for entropy-coded streams.
//!
//! The encoder writes these streams forward and closes them with a single
//! marker bit, so the decoder starts at the highest set bit of the last byte
//! and reads toward bit 0. Each read of `n` bits returns the `n` bits that end
//! at the previous position.
//!
//! Reading past the start is allowed: the position goes negative and the
//! missing low bits read as zero. The range-coded and prefix-code decode
//! loops rely on the exact negative position to detect stream termination.

use super::{highest_bit_set, read_bits_le};
use crate::error::{Result, ZstdError};

#[derive(Debug, Clone)]
pub struct ReverseBitReader<'a> {
    data: &'a [u8],
    pos: isize,
}

impl<'a> ReverseBitReader<'a> {
    /// Positions the reader just below the start marker of `data`.
    ///
    /// An empty range starts at position 0. A non-empty range whose last byte
    /// is zero has no marker and is rejected.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let mut pos = (data.len() * 8) as isize;
        if let Some(&last) = data.last() {
            if last == 0 {
                return Err(ZstdError::Corruption("bitstream missing start marker"));
            }
            let padding = 8 - highest_bit_set(u32::from(last)) as isize;
            pos -= padding;
        }
        Ok(ReverseBitReader { data, pos })
    }

    /// Bits left before the start of the stream; negative once overrun.
    #[inline]
    pub fn position(&self) -> isize {
        self.pos
    }

    #[inline]
    fn read(&mut self, bits: u32) -> u32 {
        if bits == 0 {
            return 0;
        }
        self.pos -= bits as isize;
        if self.pos < 0 {
            let skip = (-self.pos) as u32;
            if skip >= bits {
                return 0;
            }
            return read_bits_le(self.data, 0, bits - skip) << skip;
        }
        read_bits_le(self.data, self.pos as usize, bits)
    }

    /// Reads up to 32 bits.
    pub fn read_bits_u32(&mut self, bits: u32) -> Result<u32> {
        if bits > 32 {
            return Err(ZstdError::MalformedSize("backward bit read width"));
        }
        Ok(self.read(bits))
    }

    /// Reads up to 16 bits.
    pub fn read_bits_u16(&mut self, bits: u32) -> Result<u16> {
        if bits > 16 {
            return Err(ZstdError::MalformedSize("backward bit read width"));
        }
        Ok(self.read(bits) as u16)
    }
}
