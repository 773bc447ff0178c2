// decompress.rs: drivers moving bytes between a transport and the frame decoder.
//
// Design notes:
//
// 1. The decoder announces exactly how many input bytes it wants next, so
//    reads go straight into its read buffer and never run past the end of a
//    frame. Consecutive frames therefore need no carry-over buffer.
//
// 2. The stream driver reads each 4-byte magic itself, so skippable frames
//    can be stepped over, and starts the decoder with `skip_magic` for zstd
//    frames. The decoder is re-initialized per frame; its arena is kept.
//
// 3. Errors from the decoder are `ZstdError`; the stream layer surfaces them
//    as `io::Error` (`InvalidData`), truncation as `UnexpectedEof`.

use std::io::{self, BufReader, Read, Write};
use std::sync::Arc;

use crate::config::STREAM_CHUNK_SIZE;
use crate::dictionary::Dictionary;
use crate::error::{Result, ZstdError};
use crate::frame::types::MAGIC_NUMBER;
use crate::frame::{DecodeOptions, FrameDecoder};
use crate::io::decompress_resources::DecompressResources;
use crate::io::file_io::is_skippable_magic_number;
use crate::io::prefs::{Prefs, MAGICNUMBER_SIZE};

// ---------------------------------------------------------------------------
// In-memory frame
// ---------------------------------------------------------------------------

/// Decodes the single frame at the start of `src`. Bytes after the frame are
/// ignored.
pub fn decompress_frame_to_vec(src: &[u8], dictionary: Option<Arc<Dictionary>>) -> Result<Vec<u8>> {
    let mut decoder = FrameDecoder::new();
    decoder.init(dictionary, DecodeOptions::default())?;

    let mut input = src;
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
        let n = decoder.read_len().min(input.len());
        if n == 0 {
            return Err(ZstdError::Corruption("input ends inside frame"));
        }
        decoder.read_buffer()[..n].copy_from_slice(&input[..n]);
        input = &input[n..];
        decoder.read_consume(n)?;
    }
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// Decodes every frame in `src` into `dst`, returning the bytes produced.
///
/// Skippable frames are skipped. End of input is only accepted between
/// frames. With `prefs.test_mode` set, output is decoded and verified but not
/// written.
pub fn decompress_stream<R: Read, W: Write>(src: R, dst: &mut W, prefs: &Prefs) -> io::Result<u64> {
    let mut resources = DecompressResources::from_prefs(prefs)?;
    let mut src = BufReader::with_capacity(STREAM_CHUNK_SIZE, src);
    decompress_loop(&mut src, dst, prefs, &mut resources)
}

/// Frame dispatch loop shared by [`decompress_stream`] and the file API.
pub(crate) fn decompress_loop<R: Read + ?Sized, W: Write + ?Sized>(
    src: &mut R,
    dst: &mut W,
    prefs: &Prefs,
    resources: &mut DecompressResources,
) -> io::Result<u64> {
    let mut filesize: u64 = 0;
    let mut nb_frames: u64 = 0;

    loop {
        // ── magic number; clean EOF only before its first byte ──────────────
        let mut mb = [0u8; MAGICNUMBER_SIZE];
        if read_retrying(src, &mut mb[..1])? == 0 {
            break;
        }
        src.read_exact(&mut mb[1..]).map_err(|e| {
            io::Error::new(e.kind(), format!("Unrecognized header : magic number unreadable: {e}"))
        })?;
        let magic = u32::from_le_bytes(mb);

        if is_skippable_magic_number(magic) {
            crate::displaylevel!(4, "Skipping detected skippable area \n");
            let mut sb = [0u8; 4];
            src.read_exact(&mut sb).map_err(|e| {
                io::Error::new(e.kind(), "Stream error : skippable size unreadable")
            })?;
            skip_stream(src, u32::from_le_bytes(sb))?;
            continue;
        }

        if magic != MAGIC_NUMBER {
            if nb_frames == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Unrecognized header : file cannot be decoded",
                ));
            }
            crate::displaylevel!(2, "Stream followed by undecodable data \n");
            break;
        }

        let decoder = &mut resources.decoder;
        decoder.init(resources.dictionary.clone(), prefs.decode_options())?;
        filesize += decode_frame(src, dst, prefs, decoder, filesize)?;
        nb_frames += 1;
    }

    Ok(filesize)
}

/// Runs one frame whose magic has been consumed. Returns its size.
fn decode_frame<R: Read + ?Sized, W: Write + ?Sized>(
    src: &mut R,
    dst: &mut W,
    prefs: &Prefs,
    decoder: &mut FrameDecoder,
    offset: u64,
) -> io::Result<u64> {
    let mut shown_mib = offset >> 20;
    loop {
        let pending = decoder.write_len();
        if pending > 0 {
            if !prefs.test_mode {
                dst.write_all(decoder.write_buffer())
                    .map_err(|e| io::Error::new(e.kind(), format!("Write error : {e}")))?;
            }
            decoder.write_consume(pending)?;

            let mib = (offset + decoder.produced()) >> 20;
            if mib != shown_mib {
                shown_mib = mib;
                crate::displaylevel!(2, "\rDecompressed : {} MiB  ", mib);
            }
            continue;
        }
        if decoder.is_done() {
            return Ok(decoder.produced());
        }

        if decoder.read_len() == 0 {
            // Nothing to drain and no room to fill.
            return Err(io::Error::other("frame decoder made no progress"));
        }
        let n = read_retrying(src, decoder.read_buffer())?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Read error : stream ends inside frame",
            ));
        }
        decoder.read_consume(n)?;
    }
}

fn read_retrying<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match src.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

/// Reads and discards `offset` bytes from `src`.
fn skip_stream<R: Read + ?Sized>(src: &mut R, offset: u32) -> io::Result<()> {
    let skipped = io::copy(&mut src.take(u64::from(offset)), &mut io::sink())?;
    if skipped != u64::from(offset) {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Stream error : cannot skip skippable area",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
