//! Frames written by the `zstd` command-line tool (v1.5.7).
//!
//! | Fixture            | Command                                   |
//! |--------------------|-------------------------------------------|
//! | `text.l1.zst`      | `zstd -1 --check text.txt`                |
//! | `text.l19.zst`     | `zstd -19 --check text.txt`               |
//! | `text.wlog10.zst`  | `zstd -3 --check --zstd=wlog=10 text.txt` |
//! | `text.stream.zst`  | `zstd -3 -c < text.txt` (no content size) |
//! | `mixed.l3.zst`     | `zstd -3 --check mixed.bin`               |
//!
//! The text frames carry Huffman literals with FSE-compressed weights and
//! FSE-compressed sequence tables; `text.wlog10.zst` has a 1 KiB window over
//! 43 blocks.

use std::io::Cursor;

use zstd::io::{decompress_stream, Prefs};
use zstd::xxhash::content_checksum;
use zstd::{decompress_frame_to_vec, FrameDecoder};

use crate::frames::decode_all;

const TEXT: &[u8] = include_bytes!("../fixtures/text.txt");
const MIXED: &[u8] = include_bytes!("../fixtures/mixed.bin");

const TEXT_L1: &[u8] = include_bytes!("../fixtures/text.l1.zst");
const TEXT_L19: &[u8] = include_bytes!("../fixtures/text.l19.zst");
const TEXT_WLOG10: &[u8] = include_bytes!("../fixtures/text.wlog10.zst");
const TEXT_STREAM: &[u8] = include_bytes!("../fixtures/text.stream.zst");
const MIXED_L3: &[u8] = include_bytes!("../fixtures/mixed.l3.zst");

fn check_chunked(frame: &[u8], plain: &[u8]) {
    for chunk in [frame.len(), 7] {
        let mut d = FrameDecoder::new();
        let out = decode_all(&mut d, frame, chunk).unwrap();
        assert_eq!(out.len(), plain.len(), "chunk {chunk}");
        assert!(out == plain, "output differs with chunk {chunk}");
        assert_eq!(d.produced(), plain.len() as u64);
    }
}

#[test]
fn level_1_with_checksum() {
    check_chunked(TEXT_L1, TEXT);
    let mut d = FrameDecoder::new();
    decode_all(&mut d, TEXT_L1, 4096).unwrap();
    assert_eq!(d.checksum(), Some(content_checksum(TEXT)));
    assert_eq!(d.computed_checksum(), d.checksum());
}

#[test]
fn level_19_with_checksum() {
    check_chunked(TEXT_L19, TEXT);
}

#[test]
fn small_window_slides_across_blocks() {
    check_chunked(TEXT_WLOG10, TEXT);
    let mut d = FrameDecoder::new();
    decode_all(&mut d, TEXT_WLOG10, 7).unwrap();
    assert_eq!(d.frame_header().map(|h| h.window_size), Some(1024));
}

#[test]
fn streamed_frame_without_content_size() {
    check_chunked(TEXT_STREAM, TEXT);
    let mut d = FrameDecoder::new();
    decode_all(&mut d, TEXT_STREAM, 7).unwrap();
    assert_eq!(d.frame_header().and_then(|h| h.content_size), None);
}

#[test]
fn text_and_random_bytes() {
    check_chunked(MIXED_L3, MIXED);
}

#[test]
fn frame_to_vec_matches_plain() {
    assert!(decompress_frame_to_vec(TEXT_L19, None).unwrap() == TEXT);
    assert!(decompress_frame_to_vec(MIXED_L3, None).unwrap() == MIXED);
}

#[test]
fn concatenated_fixtures_through_stream() {
    let frames = [TEXT_L1, MIXED_L3, TEXT_WLOG10, TEXT_STREAM, TEXT_L19];
    let data = frames.concat();
    let mut expected = Vec::new();
    for plain in [TEXT, MIXED, TEXT, TEXT, TEXT] {
        expected.extend_from_slice(plain);
    }

    let mut out = Vec::new();
    let n = decompress_stream(Cursor::new(&data), &mut out, &Prefs::default()).unwrap();
    assert_eq!(n, expected.len() as u64);
    assert!(out == expected);
}
