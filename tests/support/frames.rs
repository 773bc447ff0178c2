//! Hand-built frames for the integration suites.
//!
//! Frames are assembled from the wire format directly: a descriptor byte,
//! the header bytes it announces, then blocks each prefixed by a 3-byte
//! header. Compressed payloads are small hand-encoded vectors whose entropy
//! sections use raw literals and RLE sequence tables.

#![allow(dead_code)]

use zstd::{FrameDecoder, Result};

pub const MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

pub const RAW: u32 = 0;
pub const RLE: u32 = 1;
pub const COMPRESSED: u32 = 2;
pub const RESERVED: u32 = 3;

/// 3-byte little-endian block header.
pub fn block_header(last: bool, kind: u32, size: u32) -> [u8; 3] {
    let raw = u32::from(last) | (kind << 1) | (size << 3);
    [raw as u8, (raw >> 8) as u8, (raw >> 16) as u8]
}

pub struct FrameBuilder {
    descriptor: u8,
    header: Vec<u8>,
    body: Vec<u8>,
}

impl FrameBuilder {
    /// Single-segment frame with a 1-byte content size; the window equals it.
    pub fn single_segment(content_size: u8) -> Self {
        FrameBuilder { descriptor: 0x20, header: vec![content_size], body: Vec::new() }
    }

    /// Frame with a window descriptor byte and no content size.
    pub fn windowed(window_byte: u8) -> Self {
        FrameBuilder { descriptor: 0x00, header: vec![window_byte], body: Vec::new() }
    }

    /// Windowed frame naming a 1-byte dictionary id.
    pub fn with_dictionary_id(window_byte: u8, id: u8) -> Self {
        FrameBuilder { descriptor: 0x01, header: vec![window_byte, id], body: Vec::new() }
    }

    pub fn checksummed(mut self) -> Self {
        self.descriptor |= 0x04;
        self
    }

    pub fn raw(mut self, last: bool, data: &[u8]) -> Self {
        self.body.extend_from_slice(&block_header(last, RAW, data.len() as u32));
        self.body.extend_from_slice(data);
        self
    }

    pub fn rle(mut self, last: bool, byte: u8, count: u32) -> Self {
        self.body.extend_from_slice(&block_header(last, RLE, count));
        self.body.push(byte);
        self
    }

    pub fn compressed(mut self, last: bool, payload: &[u8]) -> Self {
        self.body.extend_from_slice(&block_header(last, COMPRESSED, payload.len() as u32));
        self.body.extend_from_slice(payload);
        self
    }

    pub fn bytes(mut self, data: &[u8]) -> Self {
        self.body.extend_from_slice(data);
        self
    }

    pub fn checksum(self, value: u32) -> Self {
        self.bytes(&value.to_le_bytes())
    }

    pub fn build(self) -> Vec<u8> {
        let mut v = MAGIC.to_vec();
        v.push(self.descriptor);
        v.extend_from_slice(&self.header);
        v.extend_from_slice(&self.body);
        v
    }
}

/// Skippable frame carrying `payload`.
pub fn skippable(nibble: u8, payload: &[u8]) -> Vec<u8> {
    let mut v = (0x184D_2A50u32 | u32::from(nibble & 0x0F)).to_le_bytes().to_vec();
    v.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    v.extend_from_slice(payload);
    v
}

/// Compressed block payload: raw literals "ab", then one sequence copying
/// 10 bytes at offset 1.
pub const AB_PAYLOAD: [u8; 9] = [0x10, b'a', b'b', 0x01, 0x54, 0x02, 0x02, 0x07, 0x04];

pub fn ab_content() -> Vec<u8> {
    let mut v = b"ab".to_vec();
    v.extend_from_slice(&[b'b'; 10]);
    v
}

/// Compressed block payload: no literals, one sequence of length 5 at
/// offset 5. Against dictionary content "hello" it regenerates "hello".
pub const DICT_PAYLOAD: [u8; 7] = [0x00, 0x01, 0x54, 0x00, 0x03, 0x02, 0x08];

/// Runs `decoder` over `input`, offering at most `chunk` bytes per fill and
/// draining everything it produces.
pub fn decode_all(decoder: &mut FrameDecoder, mut input: &[u8], chunk: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    loop {
        let pending = decoder.write_len();
        if pending > 0 {
            out.extend_from_slice(decoder.write_buffer());
            decoder.write_consume(pending)?;
            continue;
        }
        if decoder.is_done() {
            return Ok(out);
        }
        let n = decoder.read_len().min(chunk).min(input.len());
        assert!(n > 0, "input exhausted at {:?}", decoder.stage());
        decoder.read_buffer()[..n].copy_from_slice(&input[..n]);
        input = &input[n..];
        decoder.read_consume(n)?;
    }
}
