//! Window arena: decoded history, pending output and pending input in one
//! buffer.
//!
//! ```text
//!  0            write_start       write_end   read_start    read_end   capacity
//!  |  history    |  output to drain  |            | input to fill |        |
//!  +-------------+-------------------+------------+---------------+--------+
//! ```
//!
//! `[write_start, write_end)` holds decoded bytes the caller has not drained
//! yet; everything below `write_end` (up to one window) is history that
//! matches may copy from. Input is always buffered at `write_end`, so a raw
//! block becomes output by moving `write_end` and an RLE block by filling
//! from its single byte. Compressed blocks are decoded out of place first and
//! then written over their own input.
//!
//! When the tail has no room for the next block, [`Window::try_flush`] slides
//! the last `window_size` bytes down to offset 0 and counts the evicted bytes
//! in `drained`. Slices handed out by the accessors borrow the arena and are
//! invalidated by the next mutating call.

use std::sync::Arc;

use super::literals::LiteralsDecoder;
use super::sequences::{SequenceCommand, SequenceDecoder};
use crate::bitstream::ByteReader;
use crate::dictionary::Dictionary;
use crate::error::{Result, ZstdError};

#[derive(Debug, Clone)]
pub struct Window {
    buffer: Vec<u8>,
    write_start: usize,
    write_end: usize,
    read_start: usize,
    read_end: usize,
    /// Bytes of this frame evicted from the front of the arena.
    drained: u64,
    literals: LiteralsDecoder,
    sequences: SequenceDecoder,
    dictionary: Option<Arc<Dictionary>>,
    literal_scratch: Vec<u8>,
    command_scratch: Vec<SequenceCommand>,
}

impl Window {
    pub fn new(reserved: usize) -> Self {
        Window {
            buffer: vec![0u8; reserved + 4],
            write_start: 0,
            write_end: 0,
            read_start: 0,
            read_end: 0,
            drained: 0,
            literals: LiteralsDecoder::new(),
            sequences: SequenceDecoder::new(),
            dictionary: None,
            literal_scratch: Vec::new(),
            command_scratch: Vec::new(),
        }
    }

    /// Resets all cursors for a new frame, growing the arena to `reserved`
    /// bytes if it is smaller.
    pub fn init(&mut self, reserved: usize, dictionary: Option<Arc<Dictionary>>) {
        if reserved > self.buffer.len() {
            self.buffer.resize(reserved, 0);
        }
        self.write_start = 0;
        self.write_end = 0;
        self.read_start = 0;
        self.read_end = 0;
        self.drained = 0;
        self.literals.init(dictionary.as_deref());
        self.sequences.init(dictionary.as_deref());
        self.dictionary = dictionary;
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn drained(&self) -> u64 {
        self.drained
    }

    // ── write side: decoded bytes for the caller ─────────────────────────────

    #[inline]
    pub fn write_len(&self) -> usize {
        self.write_end - self.write_start
    }

    #[inline]
    pub fn write_buffer(&self) -> &[u8] {
        &self.buffer[self.write_start..self.write_end]
    }

    #[inline]
    pub fn write_consume(&mut self, len: usize) {
        debug_assert!(len <= self.write_len());
        self.write_start += len;
    }

    // ── read side: room for the caller's input ───────────────────────────────

    #[inline]
    pub fn read_len(&self) -> usize {
        self.read_end - self.read_start
    }

    #[inline]
    pub fn read_buffer(&mut self) -> &mut [u8] {
        &mut self.buffer[self.read_start..self.read_end]
    }

    #[inline]
    pub fn read_consume(&mut self, len: usize) {
        debug_assert!(len <= self.read_len());
        self.read_start += len;
    }

    /// Opens a read region of `len` bytes at `write_end`.
    pub fn read_commit(&mut self, len: usize) -> Result<()> {
        let end = self.write_end + len;
        if end > self.buffer.len() {
            return Err(ZstdError::OutOfRange("read region exceeds window capacity"));
        }
        self.read_start = self.write_end;
        self.read_end = end;
        Ok(())
    }

    /// Returns the last `len` filled input bytes and reopens them for filling.
    pub fn read_take_back(&mut self, len: usize) -> &[u8] {
        debug_assert!(len <= self.read_end - self.write_end);
        self.read_start -= len;
        self.read_end -= len;
        &self.buffer[self.read_end..self.read_end + len]
    }

    /// Makes sure `needed` bytes fit after `write_end`, sliding the last
    /// `window_size` bytes to the front if they do not.
    ///
    /// Returns `false` when the slide would evict bytes the caller has not
    /// drained yet; the caller must drain output and retry.
    pub fn try_flush(&mut self, window_size: usize, needed: usize) -> bool {
        if self.buffer.len() - self.write_end >= needed {
            return true;
        }
        let pending = self.write_len();
        if pending > window_size || self.write_end < window_size {
            return false;
        }
        let evicted = self.write_end - window_size;
        self.buffer.copy_within(evicted..self.write_end, 0);
        self.write_end = window_size;
        self.write_start = self.write_end - pending;
        self.read_start = self.write_end;
        self.read_end = self.write_end;
        self.drained += evicted as u64;
        self.buffer.len() - self.write_end >= needed
    }

    fn finish_commit(&mut self, old_end: usize) -> &[u8] {
        self.read_start = self.write_end;
        self.read_end = self.write_end;
        &self.buffer[old_end..self.write_end]
    }

    // ── block materialization ───────────────────────────────────────────────

    /// The `len` bytes buffered at `write_end` become output.
    pub fn commit_raw(&mut self, len: usize) -> &[u8] {
        let old_end = self.write_end;
        self.write_end += len;
        self.finish_commit(old_end)
    }

    /// The byte buffered at `write_end`, repeated `len` times, becomes output.
    pub fn commit_rle(&mut self, len: usize) -> &[u8] {
        let old_end = self.write_end;
        let byte = self.buffer[old_end];
        self.buffer[old_end..old_end + len].fill(byte);
        self.write_end += len;
        self.finish_commit(old_end)
    }

    /// Decodes the compressed block of `len` bytes buffered at `write_end`.
    ///
    /// At most `max_block` bytes may be produced; matches may reach
    /// `window_size` bytes back, or into the dictionary while the frame is
    /// still shorter than one window.
    pub fn commit_compressed(&mut self, window_size: usize, len: usize, max_block: usize) -> Result<&[u8]> {
        let old_end = self.write_end;
        {
            let src = &self.buffer[old_end..old_end + len];
            let mut reader = ByteReader::new(src);
            self.literals.decode(&mut reader, &mut self.literal_scratch)?;
            self.sequences.decode(&mut reader, &mut self.command_scratch)?;
        }

        let limit = (old_end + max_block).min(self.buffer.len());
        let dictionary = self.dictionary.as_deref().map(Dictionary::content).unwrap_or(&[]);
        let history = History { drained: self.drained, window_size, dictionary };
        let end = execute_sequences(
            &mut self.buffer,
            old_end,
            limit,
            &history,
            &self.literal_scratch,
            &self.command_scratch,
        )?;
        self.write_end = end;
        Ok(self.finish_commit(old_end))
    }
}

/// What a match may reach besides the arena.
struct History<'d> {
    drained: u64,
    window_size: usize,
    dictionary: &'d [u8],
}

/// Replays `commands` into `buffer` starting at `pos`; trailing literals
/// follow the last command. Returns the new write position.
fn execute_sequences(
    buffer: &mut [u8],
    mut pos: usize,
    limit: usize,
    history: &History<'_>,
    literals: &[u8],
    commands: &[SequenceCommand],
) -> Result<usize> {
    let mut lit_pos = 0usize;
    for command in commands {
        let ll = command.literal_length as usize;
        if ll > literals.len() - lit_pos {
            return Err(ZstdError::Corruption("sequences consume more literals than decoded"));
        }
        if ll > limit - pos {
            return Err(ZstdError::Corruption("block output exceeds maximum block size"));
        }
        buffer[pos..pos + ll].copy_from_slice(&literals[lit_pos..lit_pos + ll]);
        pos += ll;
        lit_pos += ll;
        pos = copy_match(buffer, pos, limit, history, command.offset, command.match_length as usize)?;
    }

    let rest = literals.len() - lit_pos;
    if rest > limit - pos {
        return Err(ZstdError::Corruption("block output exceeds maximum block size"));
    }
    buffer[pos..pos + rest].copy_from_slice(&literals[lit_pos..]);
    Ok(pos + rest)
}

/// Copies `len` bytes from `offset` bytes behind `pos`.
///
/// While the frame has produced no more than one window, a match reaching
/// before the frame start takes its first bytes from the end of the
/// dictionary. Overlapping matches are copied in `offset`-sized strides so
/// each stride reads bytes already written.
fn copy_match(
    buffer: &mut [u8],
    mut pos: usize,
    limit: usize,
    history: &History<'_>,
    offset: u64,
    mut len: usize,
) -> Result<usize> {
    if offset == 0 {
        return Err(ZstdError::Corruption("zero match offset"));
    }
    if len > limit - pos {
        return Err(ZstdError::Corruption("block output exceeds maximum block size"));
    }

    let frame_pos = history.drained + pos as u64;
    if frame_pos <= history.window_size as u64 {
        if offset > frame_pos {
            let back = offset - frame_pos;
            if back > history.dictionary.len() as u64 {
                return Err(ZstdError::OutOfRange("match offset reaches past dictionary"));
            }
            let back = back as usize;
            let start = history.dictionary.len() - back;
            let n = back.min(len);
            buffer[pos..pos + n].copy_from_slice(&history.dictionary[start..start + n]);
            pos += n;
            len -= n;
        }
    } else if offset > history.window_size as u64 {
        return Err(ZstdError::OutOfRange("match offset beyond window"));
    }
    if len == 0 {
        return Ok(pos);
    }

    let offset = offset as usize;
    if offset > pos {
        return Err(ZstdError::Corruption("match offset before start of history"));
    }
    while len > offset {
        buffer.copy_within(pos - offset..pos, pos);
        pos += offset;
        len -= offset;
    }
    buffer.copy_within(pos - offset..pos - offset + len, pos);
    Ok(pos + len)
}
