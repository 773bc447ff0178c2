//! Frame and block header parsing through the public parsers.

use zstd::frame::{
    parse_block_header, parse_frame_descriptor, parse_frame_header, read_frame_header, BlockKind,
    ContentSizeFlag, DictionaryIdFlag,
};
use zstd::ZstdError;

use crate::frames::{block_header, FrameBuilder, COMPRESSED, RESERVED, RLE};

#[test]
fn block_header_kinds_and_sizes() {
    let h = parse_block_header(&block_header(true, RLE, 5)).unwrap();
    assert!(h.last_block);
    assert_eq!(h.kind, BlockKind::Rle);
    assert_eq!(h.size, 5);

    let h = parse_block_header(&block_header(false, COMPRESSED, 0x1F_FFFF)).unwrap();
    assert!(!h.last_block);
    assert_eq!(h.kind, BlockKind::Compressed);
    assert_eq!(h.size, 0x1F_FFFF);
}

#[test]
fn reserved_block_kind_rejected() {
    assert!(matches!(
        parse_block_header(&block_header(true, RESERVED, 0)),
        Err(ZstdError::ReservedFieldUsed(_))
    ));
}

#[test]
fn short_block_header_rejected() {
    assert!(parse_block_header(&[0x01, 0x00]).is_err());
}

#[test]
fn descriptor_fields() {
    // FCS flag 2, single segment, checksum, dictionary id 2 bytes.
    let d = parse_frame_descriptor(0b1010_0110).unwrap();
    assert_eq!(d.content_size_flag, ContentSizeFlag::Flag2);
    assert!(d.single_segment);
    assert!(d.content_checksum_flag);
    assert_eq!(d.dictionary_id_flag, DictionaryIdFlag::TwoBytes);
    assert_eq!(d.header_size, 2 + 4);
}

#[test]
fn descriptor_reserved_bit() {
    assert!(matches!(parse_frame_descriptor(0x08), Err(ZstdError::ReservedFieldUsed(_))));
}

#[test]
fn window_descriptor_sizes() {
    let d = parse_frame_descriptor(0x00).unwrap();
    // exponent 0, mantissa 0: 1 KiB
    assert_eq!(parse_frame_header(&d, &[0x00]).unwrap().window_size, 1 << 10);
    // exponent 3, mantissa 4: 8 KiB + 4/8 of it
    assert_eq!(parse_frame_header(&d, &[(3 << 3) | 4]).unwrap().window_size, 12 << 10);
    // exponent 13: 8 MiB, the largest accepted window
    assert_eq!(parse_frame_header(&d, &[13 << 3]).unwrap().window_size, 8 << 20);
    assert!(matches!(
        parse_frame_header(&d, &[(13 << 3) | 1]),
        Err(ZstdError::OutOfRange(_))
    ));
}

#[test]
fn content_size_widths() {
    // Flag 1 adds 256.
    let d = parse_frame_descriptor(0x40).unwrap();
    let h = parse_frame_header(&d, &[0x00, 0x10, 0x00]).unwrap();
    assert_eq!(h.content_size, Some(0x10 + 256));

    let d = parse_frame_descriptor(0x80).unwrap();
    let h = parse_frame_header(&d, &[0x00, 0x78, 0x56, 0x34, 0x12]).unwrap();
    assert_eq!(h.content_size, Some(0x1234_5678));
}

#[test]
fn single_segment_window_is_content_size() {
    let data = FrameBuilder::single_segment(200).build();
    let (h, len) = read_frame_header(&data).unwrap();
    assert_eq!(len, 6);
    assert_eq!(h.window_size, 200);
    assert_eq!(h.content_size, Some(200));
    assert_eq!(h.dictionary_id, 0);
    assert!(!h.content_checksum);
}

#[test]
fn dictionary_id_read() {
    let data = FrameBuilder::with_dictionary_id(0x00, 42).checksummed().build();
    let (h, len) = read_frame_header(&data).unwrap();
    assert_eq!(len, 7);
    assert_eq!(h.dictionary_id, 42);
    assert!(h.content_checksum);
    assert_eq!(h.content_size, None);
}

#[test]
fn truncated_header_is_corruption() {
    let data = FrameBuilder::with_dictionary_id(0x00, 42).build();
    assert!(matches!(
        read_frame_header(&data[..6]),
        Err(ZstdError::Corruption(_))
    ));
}

#[test]
fn wrong_magic() {
    let mut data = FrameBuilder::single_segment(0).build();
    data[0] = 0x29;
    assert!(matches!(read_frame_header(&data), Err(ZstdError::BadMagic(_))));
}
