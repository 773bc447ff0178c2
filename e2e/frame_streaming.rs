//! Streaming decode of larger multi-block and multi-frame inputs, driven both
//! through the raw buffer protocol and through `decompress_stream`.

#[path = "../tests/support/frames.rs"]
mod frames;

use std::io::{self, Cursor, Read};

use zstd::io::{decompress_stream, Prefs};
use zstd::xxhash::content_checksum;
use zstd::{DecodeOptions, FrameDecoder};

use frames::{ab_content, decode_all, skippable, FrameBuilder, AB_PAYLOAD};

/// 1 MiB window.
const WINDOW_1M: u8 = 0x50;

fn noise(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

/// A checksummed frame of `blocks` raw blocks of `block_len` bytes each.
fn raw_frame(window_byte: u8, blocks: usize, block_len: usize, seed: u32) -> (Vec<u8>, Vec<u8>) {
    let content = noise(blocks * block_len, seed);
    let mut builder = FrameBuilder::windowed(window_byte).checksummed();
    for (i, chunk) in content.chunks(block_len).enumerate() {
        builder = builder.raw(i + 1 == blocks, chunk);
    }
    let frame = builder.checksum(content_checksum(&content)).build();
    (frame, content)
}

struct Trickle<'a> {
    data: &'a [u8],
    step: usize,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

#[test]
fn small_window_many_blocks() {
    let (frame, content) = raw_frame(0x00, 64, 1000, 1);
    for chunk in [1, 3, 4096, frame.len()] {
        let mut d = FrameDecoder::new();
        assert_eq!(decode_all(&mut d, &frame, chunk).unwrap(), content, "chunk {chunk}");
        assert_eq!(d.produced(), content.len() as u64);
        assert_eq!(d.computed_checksum(), Some(content_checksum(&content)));
    }
}

#[test]
fn large_blocks_in_large_window() {
    let (frame, content) = raw_frame(WINDOW_1M, 6, 128 * 1024, 2);
    let mut d = FrameDecoder::new();
    assert_eq!(decode_all(&mut d, &frame, 60_000).unwrap(), content);
    assert_eq!(d.frame_header().map(|h| h.window_size), Some(1 << 20));
}

#[test]
fn compressed_blocks_across_block_boundaries() {
    let data = FrameBuilder::windowed(0x00)
        .compressed(false, &AB_PAYLOAD)
        .compressed(false, &AB_PAYLOAD)
        .rle(false, b'-', 20)
        .compressed(true, &AB_PAYLOAD)
        .build();
    let mut expected = ab_content();
    expected.extend(ab_content());
    expected.extend_from_slice(&[b'-'; 20]);
    expected.extend(ab_content());

    let mut d = FrameDecoder::new();
    assert_eq!(decode_all(&mut d, &data, 2).unwrap(), expected);
}

#[test]
fn one_decoder_reused_for_many_frames() {
    let mut d = FrameDecoder::new();
    for (i, window) in [WINDOW_1M, 0x00, 0x08, WINDOW_1M].into_iter().enumerate() {
        let (frame, content) = raw_frame(window, 3, 700, i as u32);
        d.init(None, DecodeOptions::default()).unwrap();
        assert_eq!(decode_all(&mut d, &frame, 333).unwrap(), content);
    }
}

#[test]
fn stream_of_many_frames_with_skippable_padding() {
    let mut data = Vec::new();
    let mut expected = Vec::new();
    for i in 0..40u32 {
        let (frame, content) = raw_frame(0x00, 2 + (i as usize % 3), 512, i);
        data.extend(frame);
        expected.extend(content);
        if i % 7 == 0 {
            data.extend(skippable((i % 16) as u8, &noise(100, i)));
        }
    }

    let mut out = Vec::new();
    let n = decompress_stream(Trickle { data: &data, step: 777 }, &mut out, &Prefs::default()).unwrap();
    assert_eq!(n, expected.len() as u64);
    assert_eq!(out, expected);
}

#[test]
fn test_mode_decodes_without_writing() {
    let (frame, content) = raw_frame(WINDOW_1M, 4, 64 * 1024, 9);
    let mut prefs = Prefs::default();
    prefs.set_test_mode(true);
    let mut out = Vec::new();
    let n = decompress_stream(Cursor::new(&frame), &mut out, &prefs).unwrap();
    assert_eq!(n, content.len() as u64);
    assert!(out.is_empty());
}
