//! Range-coded ("FSE") decoding tables.
//!
//! A table maps every decoder state in `0..2^accuracy` to a symbol, the number
//! of extra bits to read on the next update, and the base the extra bits are
//! added to. Tables are built from a normalized probability distribution, read
//! from the stream, fixed to a single symbol (RLE), or taken from the built-in
//! distributions in [`crate::entropy::predefined`].

use crate::bitstream::{highest_bit_set, ByteReader, ReverseBitReader};
use crate::error::{Result, ZstdError};

/// Largest accuracy (log2 of the table size) any table may use.
pub const FSE_MAX_ACCURACY: u32 = 15;

/// Largest number of symbols a distribution may describe.
pub const FSE_MAX_SYMBOLS: usize = 256;

/// Decoding table indexed by state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FseTable {
    accuracy: u32,
    base_offset: Vec<u16>,
    num_bits: Vec<u8>,
    symbol: Vec<u8>,
}

impl FseTable {
    /// Builds a table from `probabilities` (one entry per symbol, `-1` meaning
    /// "less than one", placed at the high end of the state space).
    pub fn from_probabilities(probabilities: &[i32], accuracy: u32) -> Result<Self> {
        let mut table = FseTable::default();
        table.init_with_probabilities(probabilities, accuracy)?;
        Ok(table)
    }

    /// Single-state table that always yields `symbol` and never reads bits.
    pub fn rle(symbol: u8) -> Self {
        let mut table = FseTable::default();
        table.init_rle(symbol);
        table
    }

    #[inline]
    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    /// Number of states (`2^accuracy`).
    #[inline]
    pub fn size(&self) -> usize {
        self.symbol.len()
    }

    #[inline]
    pub fn symbol(&self, state: usize) -> u8 {
        self.symbol[state]
    }

    #[inline]
    pub fn num_bits(&self, state: usize) -> u8 {
        self.num_bits[state]
    }

    #[inline]
    pub fn base_offset(&self, state: usize) -> u16 {
        self.base_offset[state]
    }

    fn reserve(&mut self, size: usize) {
        self.base_offset.clear();
        self.num_bits.clear();
        self.symbol.clear();
        self.base_offset.resize(size, 0);
        self.num_bits.resize(size, 0);
        self.symbol.resize(size, 0);
    }

    /// Reconfigures this table as a single-symbol table.
    pub fn init_rle(&mut self, symbol: u8) {
        self.accuracy = 0;
        self.reserve(1);
        self.symbol[0] = symbol;
    }

    /// Lays `probabilities` out over `2^accuracy` states, reusing this table's storage.
    pub fn init_with_probabilities(&mut self, probabilities: &[i32], accuracy: u32) -> Result<()> {
        if accuracy == 0 || accuracy > FSE_MAX_ACCURACY {
            return Err(ZstdError::OutOfRange("table accuracy"));
        }
        if probabilities.len() > FSE_MAX_SYMBOLS {
            return Err(ZstdError::OutOfRange("symbol count"));
        }
        let size = 1usize << accuracy;
        self.accuracy = accuracy;
        self.reserve(size);

        // "Less than one" symbols take one state each, from the top down.
        let mut negative_index = size;
        for (symbol, &prob) in probabilities.iter().enumerate() {
            if prob >= 0 {
                continue;
            }
            if negative_index == 0 {
                return Err(ZstdError::Corruption("distribution overflows table"));
            }
            negative_index -= 1;
            self.symbol[negative_index] = symbol as u8;
        }

        let mask = size - 1;
        let step = (size >> 1) + (size >> 3) + 3;
        let mut position = 0usize;
        let mut placed = 0usize;
        for (symbol, &prob) in probabilities.iter().enumerate() {
            if prob <= 0 {
                continue;
            }
            for _ in 0..prob {
                if placed == negative_index {
                    return Err(ZstdError::Corruption("distribution overflows table"));
                }
                self.symbol[position] = symbol as u8;
                placed += 1;
                loop {
                    position = (position + step) & mask;
                    if position < negative_index {
                        break;
                    }
                }
            }
        }
        if position != 0 || placed != negative_index {
            return Err(ZstdError::Corruption("distribution does not fill table"));
        }

        let mut next_rank: Vec<u32> = probabilities
            .iter()
            .map(|&p| if p < 0 { 1 } else { p as u32 })
            .collect();
        for state in 0..size {
            let symbol = self.symbol[state] as usize;
            let rank = next_rank[symbol];
            next_rank[symbol] += 1;
            let bits = accuracy - highest_bit_set(rank);
            self.num_bits[state] = bits as u8;
            self.base_offset[state] = ((rank << bits) - size as u32) as u16;
        }
        Ok(())
    }

    /// Reads a distribution header from `reader` and builds the table from it.
    ///
    /// The header stores `accuracy - 5` in 4 bits, then one variable-width
    /// probability per symbol until the probability budget is spent. A zero
    /// probability is followed by 2-bit repeat counts of further zeros
    /// (a count of 3 means another count follows). The reader is left
    /// byte-aligned.
    pub fn read(&mut self, reader: &mut ByteReader<'_>, max_accuracy: u32) -> Result<()> {
        if max_accuracy > FSE_MAX_ACCURACY {
            return Err(ZstdError::OutOfRange("maximum table accuracy"));
        }
        let accuracy = 5 + reader.read_bits(4)?;
        if accuracy > max_accuracy {
            return Err(ZstdError::OutOfRange("table accuracy"));
        }

        let mut remaining: i32 = 1 << accuracy;
        let mut probabilities: Vec<i32> = Vec::with_capacity(FSE_MAX_SYMBOLS);
        while remaining > 0 && probabilities.len() < FSE_MAX_SYMBOLS {
            let bits = highest_bit_set((remaining + 1) as u32) + 1;
            let mut value = reader.read_bits(bits)? as i32;
            let lower_mask = (1i32 << (bits - 1)) - 1;
            let threshold = (1i32 << bits) - 1 - (remaining + 1);

            if (value & lower_mask) < threshold {
                reader.rewind_bits(1)?;
                value &= lower_mask;
            } else if value > lower_mask {
                value -= threshold;
            }

            let probability = value - 1;
            remaining -= probability.abs();
            probabilities.push(probability);

            if probability == 0 {
                let mut repeat = reader.read_bits(2)?;
                let mut total = repeat as usize;
                while repeat == 3 {
                    repeat = reader.read_bits(2)?;
                    total += repeat as usize;
                }
                if probabilities.len() + total > FSE_MAX_SYMBOLS {
                    return Err(ZstdError::Corruption("too many symbols in distribution"));
                }
                probabilities.resize(probabilities.len() + total, 0);
            }
        }
        reader.align()?;
        if remaining != 0 {
            return Err(ZstdError::Corruption("distribution probabilities do not sum to table size"));
        }
        self.init_with_probabilities(&probabilities, accuracy)
    }

    /// Initial state: `accuracy` bits read from the stream.
    #[inline]
    pub fn init_state(&self, reader: &mut ReverseBitReader<'_>) -> Result<usize> {
        Ok(reader.read_bits_u16(self.accuracy)? as usize)
    }

    #[inline]
    pub fn peek(&self, state: usize) -> u8 {
        self.symbol[state]
    }

    /// Next state: base offset of `state` plus its extra bits.
    #[inline]
    pub fn update(&self, reader: &mut ReverseBitReader<'_>, state: usize) -> Result<usize> {
        let bits = reader.read_bits_u16(u32::from(self.num_bits[state]))?;
        Ok(self.base_offset[state] as usize + bits as usize)
    }
}

/// One decoding state walking an [`FseTable`].
#[derive(Debug, Clone, Copy)]
pub struct FseDecoder<'t> {
    table: &'t FseTable,
    state: usize,
}

impl<'t> FseDecoder<'t> {
    pub fn new(table: &'t FseTable) -> Self {
        FseDecoder { table, state: 0 }
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

    #[inline]
    pub fn state(&self) -> usize {
        self.state
    }
}

/// Decodes a stream driven by two decoders sharing `table` and `reader`.
///
/// The decoders alternate peek/update. As soon as an update leaves the reader
/// position negative, the other decoder emits one last symbol and decoding
/// stops. At most `limit` symbols are appended to `out`; more is corruption.
pub fn decode_interleaved2(
    table: &FseTable,
    reader: &mut ReverseBitReader<'_>,
    out: &mut Vec<u8>,
    limit: usize,
) -> Result<usize> {
    let start = out.len();
    let push = |out: &mut Vec<u8>, symbol: u8| -> Result<()> {
        if out.len() - start >= limit {
            return Err(ZstdError::Corruption("interleaved stream produced too many symbols"));
        }
        out.push(symbol);
        Ok(())
    };

    let mut first = FseDecoder::new(table);
    let mut second = FseDecoder::new(table);
    first.init(reader)?;
    second.init(reader)?;
    loop {
        push(out, first.peek())?;
        first.update(reader)?;
        if reader.position() < 0 {
            push(out, second.peek())?;
            break;
        }

        push(out, second.peek())?;
        second.update(reader)?;
        if reader.position() < 0 {
            push(out, first.peek())?;
            break;
        }
    }
    Ok(out.len() - start)
}
