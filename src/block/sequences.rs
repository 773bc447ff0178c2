//! Sequences section decoding.
//!
//! A sequences section holds a count, a byte of per-field table modes, the
//! tables those modes call for (literal lengths, offsets, match lengths in
//! that order), and one bit-reversed stream driving three range-coded
//! decoders. Each decoded sequence reads offset, match-length and
//! literal-length extra bits, then the decoders advance (literal length,
//! match length, offset) unless it was the last sequence.

use crate::bitstream::{ByteReader, ReverseBitReader};
use crate::dictionary::{Dictionary, DEFAULT_REPEAT_OFFSETS};
use crate::entropy::predefined::{
    self, LITERAL_LENGTH_MAX_ACCURACY, MATCH_LENGTH_MAX_ACCURACY, OFFSET_MAX_ACCURACY,
};
use crate::entropy::{FseDecoder, FseTable};
use crate::error::{Result, ZstdError};

// ─────────────────────────────────────────────────────────────────────────────
// Code → value tables
// ─────────────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
const LITERAL_LENGTH_BASELINES: [u32; 36] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11,
    12, 13, 14, 15, 16, 18, 20, 22, 24, 28, 32, 40,
    48, 64, 128, 256, 512, 1024, 2048, 4096, 8192, 16384, 32768, 65536,
];

#[rustfmt::skip]
const LITERAL_LENGTH_EXTRA_BITS: [u8; 36] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1,
    1, 1, 2, 2, 3, 3, 4, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16,
];

#[rustfmt::skip]
const MATCH_LENGTH_BASELINES: [u32; 53] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16,
    17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30,
    31, 32, 33, 34, 35, 37, 39, 41, 43, 47, 51, 59, 67, 83,
    99, 131, 259, 515, 1027, 2051, 4099, 8195, 16387, 32771, 65539,
];

#[rustfmt::skip]
const MATCH_LENGTH_EXTRA_BITS: [u8; 53] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1,
    2, 2, 3, 3, 4, 4, 5, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16,
];

const MAX_LITERAL_LENGTH_CODE: u8 = 35;
const MAX_MATCH_LENGTH_CODE: u8 = 52;
const MAX_OFFSET_CODE: u8 = 31;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// One "copy literals, then copy a match" instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SequenceCommand {
    pub literal_length: u32,
    pub match_length: u32,
    /// Resolved match distance (repeat offsets already applied).
    pub offset: u64,
}

/// Per-field table selection from the modes byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TableMode {
    Predefined = 0,
    /// One byte follows: the only symbol.
    Rle = 1,
    /// A distribution follows.
    FseCompressed = 2,
    /// Reuse the table from the previous block (or the dictionary).
    Repeat = 3,
}

impl TableMode {
    fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => TableMode::Predefined,
            1 => TableMode::Rle,
            2 => TableMode::FseCompressed,
            _ => TableMode::Repeat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActiveTable {
    Missing,
    Predefined,
    Scratch,
}

/// Table state for one sequence field, kept across blocks of a frame.
#[derive(Debug, Clone)]
struct FieldTable {
    scratch: FseTable,
    active: ActiveTable,
    predefined: fn() -> &'static FseTable,
    max_accuracy: u32,
}

impl FieldTable {
    fn new(predefined: fn() -> &'static FseTable, max_accuracy: u32) -> Self {
        FieldTable {
            scratch: FseTable::default(),
            active: ActiveTable::Missing,
            predefined,
            max_accuracy,
        }
    }

    fn init(&mut self, table: Option<&FseTable>) {
        match table {
            Some(t) => {
                self.scratch.clone_from(t);
                self.active = ActiveTable::Scratch;
            }
            None => self.active = ActiveTable::Missing,
        }
    }

    fn configure(&mut self, reader: &mut ByteReader<'_>, mode: TableMode) -> Result<&FseTable> {
        match mode {
            TableMode::Predefined => self.active = ActiveTable::Predefined,
            TableMode::Rle => {
                self.scratch.init_rle(reader.read_u8()?);
                self.active = ActiveTable::Scratch;
            }
            TableMode::FseCompressed => {
                self.scratch.read(reader, self.max_accuracy)?;
                self.active = ActiveTable::Scratch;
            }
            TableMode::Repeat => {}
        }
        match self.active {
            ActiveTable::Predefined => Ok((self.predefined)()),
            ActiveTable::Scratch => Ok(&self.scratch),
            ActiveTable::Missing => {
                Err(ZstdError::Corruption("repeated sequence table without a previous table"))
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SequenceDecoder
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SequenceDecoder {
    literal_lengths: FieldTable,
    offsets: FieldTable,
    match_lengths: FieldTable,
    repeat_offsets: [u64; 3],
}

impl Default for SequenceDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceDecoder {
    pub fn new() -> Self {
        SequenceDecoder {
            literal_lengths: FieldTable::new(predefined::literal_lengths, LITERAL_LENGTH_MAX_ACCURACY),
            offsets: FieldTable::new(predefined::offsets, OFFSET_MAX_ACCURACY),
            match_lengths: FieldTable::new(predefined::match_lengths, MATCH_LENGTH_MAX_ACCURACY),
            repeat_offsets: DEFAULT_REPEAT_OFFSETS,
        }
    }

    /// Starts a frame: repeatable tables and repeat offsets come from the
    /// dictionary when it has them.
    pub fn init(&mut self, dictionary: Option<&Dictionary>) {
        self.literal_lengths.init(dictionary.and_then(|d| d.literal_length_table()));
        self.offsets.init(dictionary.and_then(|d| d.offset_table()));
        self.match_lengths.init(dictionary.and_then(|d| d.match_length_table()));
        self.repeat_offsets = dictionary.map_or(DEFAULT_REPEAT_OFFSETS, |d| d.repeat_offsets());
    }

    /// Current repeat-offset history, most recent first.
    pub fn repeat_offsets(&self) -> [u64; 3] {
        self.repeat_offsets
    }

    /// Decodes the sequences section that fills the rest of `reader` into
    /// `out` (cleared first).
    pub fn decode(&mut self, reader: &mut ByteReader<'_>, out: &mut Vec<SequenceCommand>) -> Result<()> {
        out.clear();
        let count = read_sequence_count(reader)?;
        if count == 0 {
            return Ok(());
        }

        if reader.read_bits(2)? != 0 {
            return Err(ZstdError::ReservedFieldUsed("sequence table modes"));
        }
        let match_length_mode = TableMode::from_bits(reader.read_bits(2)?);
        let offset_mode = TableMode::from_bits(reader.read_bits(2)?);
        let literal_length_mode = TableMode::from_bits(reader.read_bits(2)?);

        let ll_table = self.literal_lengths.configure(reader, literal_length_mode)?;
        let of_table = self.offsets.configure(reader, offset_mode)?;
        let ml_table = self.match_lengths.configure(reader, match_length_mode)?;

        let mut stream = reader.sub_reverse_reader(reader.remaining())?;
        let mut ll = FseDecoder::new(ll_table);
        let mut of = FseDecoder::new(of_table);
        let mut ml = FseDecoder::new(ml_table);
        ll.init(&mut stream)?;
        of.init(&mut stream)?;
        ml.init(&mut stream)?;

        out.reserve(count);
        for i in 0..count {
            let mut command = read_command(&mut stream, ll.peek(), ml.peek(), of.peek())?;
            if i + 1 < count {
                ll.update(&mut stream)?;
                ml.update(&mut stream)?;
                of.update(&mut stream)?;
            }
            command.offset =
                resolve_offset(&mut self.repeat_offsets, command.offset, command.literal_length)?;
            out.push(command);
        }
        if stream.position() != 0 {
            return Err(ZstdError::Corruption("sequence stream not fully consumed"));
        }
        Ok(())
    }
}

/// 0 → no sequences; < 128 → the byte itself; < 255 → two bytes with the
/// high bit of the first dropped; 255 → a 16-bit value plus 0x7F00.
fn read_sequence_count(reader: &mut ByteReader<'_>) -> Result<usize> {
    let header = reader.read_u8()? as usize;
    Ok(match header {
        0..=127 => header,
        128..=254 => ((header - 128) << 8) + reader.read_u8()? as usize,
        _ => reader.read_u16_le()? as usize + 0x7F00,
    })
}

/// Applies the extra bits for one sequence. The offset is returned raw
/// (before repeat-offset resolution).
fn read_command(
    stream: &mut ReverseBitReader<'_>,
    literal_length_code: u8,
    match_length_code: u8,
    offset_code: u8,
) -> Result<SequenceCommand> {
    if literal_length_code > MAX_LITERAL_LENGTH_CODE {
        return Err(ZstdError::OutOfRange("literal length code"));
    }
    if match_length_code > MAX_MATCH_LENGTH_CODE {
        return Err(ZstdError::OutOfRange("match length code"));
    }
    if offset_code > MAX_OFFSET_CODE {
        return Err(ZstdError::OutOfRange("offset code"));
    }
    let ll = literal_length_code as usize;
    let ml = match_length_code as usize;

    let offset = (1u64 << offset_code) + u64::from(stream.read_bits_u32(u32::from(offset_code))?);
    let match_length = MATCH_LENGTH_BASELINES[ml]
        + u32::from(stream.read_bits_u16(u32::from(MATCH_LENGTH_EXTRA_BITS[ml]))?);
    let literal_length = LITERAL_LENGTH_BASELINES[ll]
        + u32::from(stream.read_bits_u16(u32::from(LITERAL_LENGTH_EXTRA_BITS[ll]))?);

    Ok(SequenceCommand { literal_length, match_length, offset })
}

/// Turns a raw offset into a match distance, updating the history.
///
/// Raw offsets 1..=3 select from the history (shifted by one when the
/// sequence has no literals; index 3 means "most recent minus one"). Larger
/// raw offsets are distances plus 3.
pub fn resolve_offset(history: &mut [u64; 3], raw: u64, literal_length: u32) -> Result<u64> {
    if raw > 3 {
        let offset = raw - 3;
        history[2] = history[1];
        history[1] = history[0];
        history[0] = offset;
        return Ok(offset);
    }

    let index = (raw - 1) as usize + usize::from(literal_length == 0);
    if index == 0 {
        return Ok(history[0]);
    }
    let offset = if index < 3 { history[index] } else { history[0].saturating_sub(1) };
    if offset == 0 {
        return Err(ZstdError::Corruption("repeat offset resolves to zero"));
    }
    if index > 1 {
        history[2] = history[1];
    }
    history[1] = history[0];
    history[0] = offset;
    Ok(offset)
}
