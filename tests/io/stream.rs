//! Stream driver over `Read`/`Write` transports.

use std::io::{self, Cursor, Read};

use zstd::io::{decompress_frame_to_vec, decompress_stream, Prefs};
use zstd::ZstdError;

use crate::frames::{ab_content, skippable, FrameBuilder, AB_PAYLOAD};

/// Hands out at most `step` bytes per read call.
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

/// Fails every other read with `Interrupted`.
struct Flaky<R> {
    inner: R,
    fail_next: bool,
}

impl<R: Read> Read for Flaky<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.fail_next = !self.fail_next;
        if self.fail_next {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
        }
        self.inner.read(buf)
    }
}

fn stream_of_frames() -> (Vec<u8>, Vec<u8>) {
    let mut data = FrameBuilder::single_segment(3).raw(true, b"one").build();
    data.extend(skippable(0x0, b"ignored payload"));
    data.extend(FrameBuilder::single_segment(12).compressed(true, &AB_PAYLOAD).build());
    data.extend(skippable(0xF, b""));
    data.extend(FrameBuilder::windowed(0x00).rle(true, b'z', 4).build());

    let mut expected = b"one".to_vec();
    expected.extend(ab_content());
    expected.extend_from_slice(b"zzzz");
    (data, expected)
}

#[test]
fn concatenated_frames_and_skippable_frames() {
    let (data, expected) = stream_of_frames();
    let mut out = Vec::new();
    let n = decompress_stream(Cursor::new(&data), &mut out, &Prefs::default()).unwrap();
    assert_eq!(out, expected);
    assert_eq!(n, expected.len() as u64);
}

#[test]
fn short_reads_are_handled() {
    let (data, expected) = stream_of_frames();
    for step in [1, 2, 5] {
        let mut out = Vec::new();
        decompress_stream(Trickle { data: &data, step }, &mut out, &Prefs::default()).unwrap();
        assert_eq!(out, expected, "step {step}");
    }
}

#[test]
fn interrupted_reads_are_retried() {
    let (data, expected) = stream_of_frames();
    let mut out = Vec::new();
    let src = Flaky { inner: Trickle { data: &data, step: 3 }, fail_next: false };
    decompress_stream(src, &mut out, &Prefs::default()).unwrap();
    assert_eq!(out, expected);
}

#[test]
fn eof_inside_frame() {
    let data = FrameBuilder::single_segment(4).raw(true, b"abcd").build();
    for cut in [5, 7, data.len() - 1] {
        let mut out = Vec::new();
        let err = decompress_stream(Cursor::new(&data[..cut]), &mut out, &Prefs::default())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof, "cut at {cut}");
    }
}

#[test]
fn eof_inside_magic_is_an_error() {
    let mut data = FrameBuilder::single_segment(1).raw(true, b"x").build();
    data.extend_from_slice(&[0x28, 0xB5]);
    let mut out = Vec::new();
    assert!(decompress_stream(Cursor::new(&data), &mut out, &Prefs::default()).is_err());
}

#[test]
fn corrupt_frame_surfaces_invalid_data() {
    let mut data = FrameBuilder::single_segment(2).raw(true, b"AB").build();
    data[4] |= 0x08; // reserved descriptor bit
    let mut out = Vec::new();
    let err = decompress_stream(Cursor::new(&data), &mut out, &Prefs::default()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    let inner = err.get_ref().and_then(|e| e.downcast_ref::<ZstdError>());
    assert!(matches!(inner, Some(ZstdError::ReservedFieldUsed(_))));
}

#[test]
fn frame_to_vec_ignores_trailing_bytes() {
    let mut data = FrameBuilder::single_segment(2).raw(true, b"AB").build();
    data.extend_from_slice(b"trailing");
    assert_eq!(decompress_frame_to_vec(&data, None).unwrap(), b"AB");
}

#[test]
fn frame_to_vec_rejects_skippable_frame() {
    assert!(matches!(
        decompress_frame_to_vec(&skippable(0, b"x"), None),
        Err(ZstdError::BadMagic(_))
    ));
}
