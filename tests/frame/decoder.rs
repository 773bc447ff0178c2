//! Frame decoder scenarios driven through the buffer protocol.

use std::sync::Arc;

use zstd::frame::read_frame_header;
use zstd::xxhash::content_checksum;
use zstd::{DecodeOptions, DecodeStage, Dictionary, FrameDecoder, ZstdError};

use crate::frames::{ab_content, decode_all, FrameBuilder, AB_PAYLOAD, DICT_PAYLOAD};

#[test]
fn raw_ab_frame_reports_done() {
    let data = FrameBuilder::single_segment(2).raw(true, b"AB").build();
    let mut d = FrameDecoder::new();
    assert_eq!(decode_all(&mut d, &data, 64).unwrap(), [0x41, 0x42]);
    assert!(d.is_done());
    assert_eq!(d.stage(), DecodeStage::Done);
}

#[test]
fn rle_block_fills_bytes() {
    let data = FrameBuilder::single_segment(5).rle(true, 0x7A, 5).build();
    let mut d = FrameDecoder::new();
    assert_eq!(decode_all(&mut d, &data, 64).unwrap(), [0x7A; 5]);
}

#[test]
fn self_overlapping_match_repeats_previous_byte() {
    let data = FrameBuilder::single_segment(12).compressed(true, &AB_PAYLOAD).build();
    let mut d = FrameDecoder::new();
    let out = decode_all(&mut d, &data, 64).unwrap();
    assert_eq!(out, ab_content());
    assert!(out[2..].iter().all(|&b| b == b'b'));
}

#[test]
fn byte_at_a_time_matches_bulk() {
    let data = FrameBuilder::windowed(0x00)
        .raw(false, b"head-")
        .compressed(false, &AB_PAYLOAD)
        .rle(true, b'!', 3)
        .build();
    let mut bulk = FrameDecoder::new();
    let expected = decode_all(&mut bulk, &data, data.len()).unwrap();
    let mut trickle = FrameDecoder::new();
    assert_eq!(decode_all(&mut trickle, &data, 1).unwrap(), expected);

    let mut want = b"head-".to_vec();
    want.extend(ab_content());
    want.extend_from_slice(b"!!!");
    assert_eq!(expected, want);
}

#[test]
fn reserved_block_kind_produces_no_output() {
    let data = FrameBuilder::single_segment(2).bytes(&crate::frames::block_header(true, 3, 0)).build();
    let mut d = FrameDecoder::new();
    let err = decode_all(&mut d, &data, 64).unwrap_err();
    assert!(matches!(err, ZstdError::ReservedFieldUsed(_)));
    assert_eq!(d.write_len(), 0);
    assert_eq!(d.error(), Some(&err));
}

#[test]
fn checksum_matches_rolling_hash() {
    let content = b"checksummed content";
    let data = FrameBuilder::single_segment(content.len() as u8)
        .checksummed()
        .raw(false, &content[..10])
        .raw(true, &content[10..])
        .checksum(content_checksum(content))
        .build();
    let mut d = FrameDecoder::new();
    assert_eq!(decode_all(&mut d, &data, 7).unwrap(), content);
    assert_eq!(d.checksum(), Some(content_checksum(content)));
    assert_eq!(d.computed_checksum(), d.checksum());
}

#[test]
fn window_flush_waits_for_drain() {
    let blocks: Vec<Vec<u8>> = (0..4u8).map(|i| vec![i; 1024]).collect();
    let mut builder = FrameBuilder::windowed(0x00);
    for (i, b) in blocks.iter().enumerate() {
        builder = builder.raw(i == 3, b);
    }
    let data = builder.build();

    let mut d = FrameDecoder::new();
    let mut input = &data[..];
    while d.read_len() > 0 && !input.is_empty() {
        let n = d.read_len().min(input.len());
        d.read_buffer()[..n].copy_from_slice(&input[..n]);
        input = &input[n..];
        d.read_consume(n).unwrap();
    }
    // Output is pending and no more input is accepted.
    assert!(d.needs_flush());
    assert_eq!(d.read_len(), 0);
    assert!(!input.is_empty());

    let mut out = Vec::new();
    let pending = d.write_len();
    out.extend_from_slice(d.write_buffer());
    d.write_consume(pending).unwrap();
    assert!(d.read_len() > 0);

    out.extend(decode_all(&mut d, input, 64).unwrap());
    assert_eq!(out, blocks.concat());
}

#[test]
fn dictionary_supplies_match_source() {
    let data = FrameBuilder::with_dictionary_id(0x00, 9).compressed(true, &DICT_PAYLOAD).build();
    let dict = Arc::new(Dictionary::new(9, b"hello".to_vec()));

    let mut d = FrameDecoder::new();
    d.init(Some(dict.clone()), DecodeOptions::default()).unwrap();
    assert_eq!(decode_all(&mut d, &data, 64).unwrap(), b"hello");

    // The same dictionary serves a second decoder.
    let mut other = FrameDecoder::new();
    other.init(Some(dict), DecodeOptions::default()).unwrap();
    assert_eq!(decode_all(&mut other, &data, 3).unwrap(), b"hello");
}

#[test]
fn dictionary_id_mismatch() {
    let data = FrameBuilder::with_dictionary_id(0x00, 9).compressed(true, &DICT_PAYLOAD).build();
    let mut d = FrameDecoder::new();
    d.init(Some(Arc::new(Dictionary::new(10, b"hello".to_vec()))), DecodeOptions::default())
        .unwrap();
    assert_eq!(
        decode_all(&mut d, &data, 64),
        Err(ZstdError::DictionaryMismatch { expected: 9, found: 10 })
    );
}

#[test]
fn reinit_recovers_after_error() {
    let bad = FrameBuilder::single_segment(2).bytes(&crate::frames::block_header(true, 3, 0)).build();
    let good = FrameBuilder::single_segment(2).raw(true, b"ok").build();

    let mut d = FrameDecoder::new();
    assert!(decode_all(&mut d, &bad, 64).is_err());
    assert_eq!(d.read_len(), 0);
    assert!(!d.is_done());
    assert!(d.read_consume(0).is_err());

    d.init(None, DecodeOptions::default()).unwrap();
    assert_eq!(decode_all(&mut d, &good, 64).unwrap(), b"ok");
}

#[test]
fn start_from_parsed_header() {
    let content = b"header parsed elsewhere";
    let data = FrameBuilder::single_segment(content.len() as u8)
        .checksummed()
        .raw(true, content)
        .checksum(content_checksum(content))
        .build();
    let (header, used) = read_frame_header(&data).unwrap();

    let mut d = FrameDecoder::with_reserved(64 * 1024);
    d.init_with_frame_header(None, header, DecodeOptions::default()).unwrap();
    assert_eq!(d.stage(), DecodeStage::ReadBlockData);
    assert_eq!(d.read_len(), 3);
    assert_eq!(decode_all(&mut d, &data[used..], 5).unwrap(), content);
    assert_eq!(d.frame_header(), Some(&header));
}

#[test]
fn fresh_decoder_waits_for_magic() {
    for d in [FrameDecoder::new(), FrameDecoder::with_reserved(0), FrameDecoder::default()] {
        assert_eq!(d.stage(), DecodeStage::ReadFrameMagic);
        assert_eq!(d.read_len(), 4);
        assert!(d.error().is_none());
        assert!(!d.is_done());
    }
}
