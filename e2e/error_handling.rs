//! Malformed input and protocol misuse: every failure is reported once,
//! sticks until re-initialization, and never produces stray output.

#[path = "../tests/support/frames.rs"]
mod frames;

use std::io::{self, Cursor};

use zstd::io::{decompress_frame_to_vec, decompress_stream, Prefs};
use zstd::xxhash::content_checksum;
use zstd::{DecodeOptions, FrameDecoder, ZstdError};

use frames::{block_header, decode_all, FrameBuilder, RESERVED};

fn stream(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    decompress_stream(Cursor::new(data), &mut out, &Prefs::default())?;
    Ok(out)
}

fn zstd_error(err: &io::Error) -> Option<&ZstdError> {
    err.get_ref().and_then(|e| e.downcast_ref::<ZstdError>())
}

#[test]
fn checksum_mismatch() {
    let content = b"payload under test";
    let data = FrameBuilder::single_segment(content.len() as u8)
        .checksummed()
        .raw(true, content)
        .checksum(content_checksum(content) ^ 1)
        .build();

    let mut d = FrameDecoder::new();
    assert_eq!(decode_all(&mut d, &data, 64), Err(ZstdError::Corruption("content checksum mismatch")));
    assert!(!d.is_done());
    assert_eq!(d.read_len(), 0);
}

#[test]
fn checksum_mismatch_ignored_when_skipped() {
    let content = b"payload under test";
    let data = FrameBuilder::single_segment(content.len() as u8)
        .checksummed()
        .raw(true, content)
        .checksum(0xDEAD_BEEF)
        .build();

    let mut d = FrameDecoder::new();
    d.init(None, DecodeOptions { skip_checksum: true, ..Default::default() }).unwrap();
    assert_eq!(decode_all(&mut d, &data, 64).unwrap(), content);

    let mut prefs = Prefs::default();
    prefs.set_stream_checksum_mode(false);
    let mut out = Vec::new();
    decompress_stream(Cursor::new(&data), &mut out, &prefs).unwrap();
    assert_eq!(out, content);
}

#[test]
fn content_longer_than_declared() {
    let data = FrameBuilder::single_segment(2).raw(true, b"abc").build();
    assert!(matches!(decompress_frame_to_vec(&data, None), Err(ZstdError::Corruption(_))));
}

#[test]
fn content_shorter_than_declared() {
    let data = FrameBuilder::single_segment(5).raw(true, b"abc").build();
    assert_eq!(
        decompress_frame_to_vec(&data, None),
        Err(ZstdError::Corruption("frame content size mismatch"))
    );
}

#[test]
fn block_larger_than_window() {
    let data = FrameBuilder::windowed(0x00).raw(true, &[0u8; 1025]).build();
    let mut d = FrameDecoder::new();
    assert!(matches!(decode_all(&mut d, &data, 4096), Err(ZstdError::Corruption(_))));
    assert_eq!(d.write_len(), 0);
}

#[test]
fn reserved_block_type_in_second_block() {
    let data = FrameBuilder::windowed(0x00)
        .raw(false, b"first")
        .bytes(&block_header(true, RESERVED, 0))
        .build();
    let err = stream(&data).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    assert!(matches!(zstd_error(&err), Some(ZstdError::ReservedFieldUsed(_))));
}

#[test]
fn over_consuming_is_starvation() {
    let mut d = FrameDecoder::new();
    assert_eq!(d.read_len(), 4);
    let err = d.read_consume(5).unwrap_err();
    assert_eq!(err, ZstdError::Starvation { requested: 5, available: 4 });
    assert_eq!(d.error(), Some(&err));
    assert_eq!(d.read_consume(0), Err(err));

    let mut d = FrameDecoder::new();
    assert_eq!(d.write_consume(1), Err(ZstdError::Starvation { requested: 1, available: 0 }));
}

#[test]
fn errors_are_sticky_until_init() {
    let mut d = FrameDecoder::new();
    d.read_buffer().copy_from_slice(b"nope");
    let err = d.read_consume(4).unwrap_err();
    assert!(matches!(err, ZstdError::BadMagic(_)));
    for _ in 0..3 {
        assert_eq!(d.read_consume(0), Err(err.clone()));
        assert_eq!(d.write_consume(0), Err(err.clone()));
    }
    d.init(None, DecodeOptions::default()).unwrap();
    assert!(d.error().is_none());
    assert_eq!(d.read_len(), 4);
}

#[test]
fn unknown_first_magic_is_rejected() {
    let err = stream(b"PK\x03\x04 not a zstd stream").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}

#[test]
fn trailing_garbage_after_frame_is_ignored() {
    let mut data = FrameBuilder::single_segment(4).raw(true, b"kept").build();
    data.extend_from_slice(b"garbage that is not a frame");
    assert_eq!(stream(&data).unwrap(), b"kept");
}

#[test]
fn truncated_skippable_frame() {
    let mut data = FrameBuilder::single_segment(1).raw(true, b"x").build();
    data.extend(frames::skippable(3, &[7u8; 32]));
    data.truncate(data.len() - 5);
    assert_eq!(stream(&data).unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
}

#[test]
fn error_names_are_stable() {
    assert_eq!(ZstdError::Corruption("x").name(), "corruption");
    assert_eq!(ZstdError::DictionaryMismatch { expected: 1, found: 2 }.name(), "dictionary_mismatch");
    assert_eq!(ZstdError::Starvation { requested: 1, available: 0 }.name(), "starvation");
}
