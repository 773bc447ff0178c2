//! Canonical prefix-code ("Huffman") decoding tables.
//!
//! The table is indexed by a `max_bits`-wide code window: every code of length
//! `len` owns `2^(max_bits - len)` consecutive entries. Codes are assigned in
//! order of decreasing length, and within a length in symbol order.

use super::fse::{decode_interleaved2, FseTable};
use crate::bitstream::{highest_bit_set, ByteReader, ReverseBitReader};
use crate::error::{Result, ZstdError};

/// Longest code length a table may use.
pub const HUFFMAN_MAX_BITS: u32 = 16;

/// Largest accuracy of the range-coded table that compresses the weights.
pub const HUFFMAN_WEIGHTS_MAX_ACCURACY: u32 = 7;

/// At most 255 weights are transmitted; the last symbol's weight is implied.
const MAX_TRANSMITTED_WEIGHTS: usize = 255;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuffmanTable {
    max_bits: u32,
    num_bits: Vec<u8>,
    symbol: Vec<u8>,
}

impl HuffmanTable {
    /// Builds a table from per-symbol code lengths (0 = symbol unused).
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        let mut table = HuffmanTable::default();
        table.init_from_lengths(lengths)?;
        Ok(table)
    }

    #[inline]
    pub fn max_bits(&self) -> u32 {
        self.max_bits
    }

    #[inline]
    pub fn symbol(&self, code: usize) -> u8 {
        self.symbol[code]
    }

    #[inline]
    pub fn num_bits(&self, code: usize) -> u8 {
        self.num_bits[code]
    }

    pub fn init_from_lengths(&mut self, lengths: &[u8]) -> Result<()> {
        if lengths.len() > 256 {
            return Err(ZstdError::OutOfRange("prefix code symbol count"));
        }
        let max_bits = lengths.iter().copied().max().unwrap_or(0) as u32;
        if max_bits == 0 {
            return Err(ZstdError::Corruption("prefix code has no symbols"));
        }
        if max_bits > HUFFMAN_MAX_BITS {
            return Err(ZstdError::OutOfRange("prefix code length"));
        }

        let mut rank_count = [0u32; HUFFMAN_MAX_BITS as usize + 1];
        for &len in lengths {
            rank_count[len as usize] += 1;
        }

        // rank_index[len] is the first code of length `len`; longer codes come first.
        let mut rank_index = [0u32; HUFFMAN_MAX_BITS as usize + 2];
        for len in (1..=max_bits as usize).rev() {
            rank_index[len - 1] = rank_index[len] + rank_count[len] * (1 << (max_bits as usize - len));
        }
        let size = 1u32 << max_bits;
        if rank_index[0] != size {
            return Err(ZstdError::Corruption("prefix code does not fill its table"));
        }

        self.max_bits = max_bits;
        self.num_bits.clear();
        self.symbol.clear();
        self.num_bits.resize(size as usize, 0);
        self.symbol.resize(size as usize, 0);
        for len in 1..=max_bits as usize {
            let start = rank_index[len] as usize;
            let end = rank_index[len - 1] as usize;
            self.num_bits[start..end].fill(len as u8);
        }

        for (sym, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let len = len as usize;
            let code = rank_index[len] as usize;
            let span = 1usize << (max_bits as usize - len);
            self.symbol[code..code + span].fill(sym as u8);
            rank_index[len] += span as u32;
        }
        Ok(())
    }

    /// Reads a table description (weights header) from `reader`.
    pub fn read(&mut self, reader: &mut ByteReader<'_>) -> Result<()> {
        let weights = read_weights(reader)?;
        let lengths = weights_to_lengths(&weights)?;
        self.init_from_lengths(&lengths)
    }

    /// Initial state: a full `max_bits` code window.
    #[inline]
    pub fn init_state(&self, reader: &mut ReverseBitReader<'_>) -> Result<usize> {
        Ok(reader.read_bits_u16(self.max_bits)? as usize)
    }

    #[inline]
    pub fn peek(&self, state: usize) -> u8 {
        self.symbol[state]
    }

    /// Shifts out the bits of the code just emitted and refills from the stream.
    #[inline]
    pub fn update(&self, reader: &mut ReverseBitReader<'_>, state: usize) -> Result<usize> {
        let bits = u32::from(self.num_bits[state]);
        let rest = reader.read_bits_u16(bits)? as usize;
        let mask = (1usize << self.max_bits) - 1;
        Ok(((state << bits) + rest) & mask)
    }

    /// Decodes one bit-reversed stream into the front of `out` and returns the
    /// number of symbols written. Producing more than `out.len()` symbols is
    /// corruption.
    ///
    /// A well-formed stream ends with the reader exactly `max_bits` bits past
    /// its start.
    pub fn decode_stream(&self, data: &[u8], out: &mut [u8]) -> Result<usize> {
        let mut reader = ReverseBitReader::new(data)?;
        let mut decoder = HuffmanDecoder::new(self);
        decoder.init(&mut reader)?;
        let end = -(self.max_bits as isize);
        let mut written = 0usize;
        while reader.position() > end {
            if written == out.len() {
                return Err(ZstdError::Corruption("literal stream longer than its regenerated size"));
            }
            out[written] = decoder.peek();
            written += 1;
            decoder.update(&mut reader)?;
        }
        if reader.position() != end {
            return Err(ZstdError::Corruption("literal stream ends at wrong bit position"));
        }
        Ok(written)
    }
}

/// One decoding state walking a [`HuffmanTable`].
#[derive(Debug, Clone, Copy)]
pub struct HuffmanDecoder<'t> {
    table: &'t HuffmanTable,
    state: usize,
}

impl<'t> HuffmanDecoder<'t> {
    pub fn new(table: &'t HuffmanTable) -> Self {
        HuffmanDecoder { table, state: 0 }
    }

    #[inline]
    pub fn init(&mut self, reader: &mut ReverseBitReader<'_>) -> Result<()> {
        self.state = self.table.init_state(reader)?;
        Ok(())
    }

    #[inline]
    pub fn peek(&self) -> u8 {
        self.table.peek(self.state)
    }

    #[inline]
    pub fn update(&mut self, reader: &mut ReverseBitReader<'_>) -> Result<()> {
        self.state = self.table.update(reader, self.state)?;
        Ok(())
    }
}

/// Reads the transmitted weights (without the implied last one).
///
/// A header byte of 128 or more announces `header - 127` weights packed two
/// per byte, high nibble first. A smaller header is the byte length of a
/// range-coded weight stream: a distribution followed by a bit-reversed
/// stream decoded with two interleaved states.
pub fn read_weights(reader: &mut ByteReader<'_>) -> Result<Vec<u8>> {
    let header = reader.read_u8()? as usize;
    let mut weights = Vec::with_capacity(MAX_TRANSMITTED_WEIGHTS + 1);
    if header >= 128 {
        let count = header - 127;
        let packed = reader.read_bytes(count.div_ceil(2))?;
        for i in 0..count {
            let byte = packed[i / 2];
            weights.push(if i % 2 == 0 { byte >> 4 } else { byte & 0x0F });
        }
    } else {
        let mut sub = reader.sub_reader(header)?;
        let mut table = FseTable::default();
        table.read(&mut sub, HUFFMAN_WEIGHTS_MAX_ACCURACY)?;
        let mut stream = sub.sub_reverse_reader(sub.remaining())?;
        decode_interleaved2(&table, &mut stream, &mut weights, MAX_TRANSMITTED_WEIGHTS)?;
    }
    Ok(weights)
}

/// Completes `weights` with the implied last weight and converts them to code
/// lengths (`max_bits + 1 - weight`, 0 for unused symbols).
pub fn weights_to_lengths(weights: &[u8]) -> Result<Vec<u8>> {
    if weights.len() > MAX_TRANSMITTED_WEIGHTS {
        return Err(ZstdError::OutOfRange("prefix code weight count"));
    }
    let mut weight_sum: u64 = 0;
    for &w in weights {
        if u32::from(w) > HUFFMAN_MAX_BITS {
            return Err(ZstdError::Corruption("prefix code weight too large"));
        }
        if w > 0 {
            weight_sum += 1u64 << (w - 1);
        }
    }
    if weight_sum == 0 {
        return Err(ZstdError::Corruption("prefix code weights are all zero"));
    }

    let max_bits = highest_bit_set_u64(weight_sum) + 1;
    if max_bits > HUFFMAN_MAX_BITS {
        return Err(ZstdError::OutOfRange("prefix code length"));
    }
    let leftover = (1u64 << max_bits) - weight_sum;
    if !leftover.is_power_of_two() {
        return Err(ZstdError::Corruption("prefix code weights leave a non power of two"));
    }
    let last_weight = highest_bit_set(leftover as u32) + 1;

    let lengths = weights
        .iter()
        .copied()
        .chain(core::iter::once(last_weight as u8))
        .map(|w| if w == 0 { 0 } else { (max_bits + 1 - u32::from(w)) as u8 })
        .collect();
    Ok(lengths)
}

#[inline]
fn highest_bit_set_u64(value: u64) -> u32 {
    63 - value.leading_zeros()
}
