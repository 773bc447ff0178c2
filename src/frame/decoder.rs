//! Incremental frame decoder.
//!
//! The decoder never blocks and never owns a transport. The caller drives it
//! through two regions of the window arena:
//!
//! - the *read* side: [`FrameDecoder::read_buffer`] is exactly as long as the
//!   next structure the decoder is waiting for; the caller fills a prefix and
//!   reports it with [`FrameDecoder::read_consume`];
//! - the *write* side: [`FrameDecoder::write_buffer`] holds decoded bytes;
//!   the caller copies a prefix out and reports it with
//!   [`FrameDecoder::write_consume`].
//!
//! Each consume call runs the state machine until it needs more input or more
//! output room. A frame is finished once [`FrameDecoder::is_done`] is true.
//!
//! ```text
//! Done -> ReadFrameMagic -> ReadFrameDescriptor -> ReadFrameHeader
//!      -> ReadBlockData (dummy block, prefetch = first block header)
//!      -> ReadBlockHeader <-> ReadBlockData -> Done
//! ```
//!
//! Block payloads are buffered together with the 0, 3 or 4 bytes that follow
//! them (next block header or content checksum), so no extra round trip is
//! spent on headers between blocks.

use std::sync::Arc;

use crate::block::Window;
use crate::config::DECODER_RESERVED_DEFAULT;
use crate::dictionary::Dictionary;
use crate::error::{Result, ZstdError};
use crate::frame::header::{parse_block_header, parse_frame_descriptor, parse_frame_header};
use crate::frame::types::{
    BlockHeader, BlockKind, DecodeStage, FrameHeader, FrameHeaderDescriptor, BLOCK_HEADER_SIZE,
    CHECKSUM_SIZE, DESCRIPTOR_SIZE, MAGIC,
};
use crate::xxhash::ContentHasher;

// ─────────────────────────────────────────────────────────────────────────────
// DecodeOptions
// ─────────────────────────────────────────────────────────────────────────────

/// Per-frame options passed to [`FrameDecoder::init`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Start at the frame descriptor; the caller has already checked the magic.
    pub skip_magic: bool,
    /// Do not hash output or verify the trailing content checksum.
    pub skip_checksum: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// FrameDecoder
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct FrameDecoder {
    stage: DecodeStage,
    window: Window,
    reserved: usize,
    options: DecodeOptions,
    dictionary: Option<Arc<Dictionary>>,
    descriptor: FrameHeaderDescriptor,
    header: Option<FrameHeader>,
    window_size: usize,
    max_block_size: usize,
    /// Block whose payload is being (or about to be) buffered.
    block: BlockHeader,
    /// Trailer bytes buffered after the current block payload.
    prefetch: usize,
    hasher: ContentHasher,
    checksum: Option<u32>,
    produced: u64,
    /// First error hit in this frame; returned by every later call.
    failed: Option<ZstdError>,
}

impl FrameDecoder {
    /// A decoder ready for one frame without a dictionary.
    pub fn new() -> Self {
        Self::with_reserved(DECODER_RESERVED_DEFAULT)
    }

    /// Like [`FrameDecoder::new`], preallocating an arena of `reserved` bytes.
    ///
    /// The arena grows on demand to `window_size + max_block_size + 4` for
    /// each frame and is kept across frames.
    pub fn with_reserved(reserved: usize) -> Self {
        let reserved = reserved.max(DECODER_RESERVED_DEFAULT);
        let mut decoder = FrameDecoder {
            stage: DecodeStage::Done,
            window: Window::new(reserved),
            reserved,
            options: DecodeOptions::default(),
            dictionary: None,
            descriptor: FrameHeaderDescriptor::default(),
            header: None,
            window_size: 0,
            max_block_size: 0,
            block: BlockHeader::default(),
            prefetch: 0,
            hasher: ContentHasher::new(),
            checksum: None,
            produced: 0,
            failed: None,
        };
        // 4 bytes always fit the default arena.
        let ready = decoder.init(None, DecodeOptions::default());
        debug_assert!(ready.is_ok(), "magic does not fit a {reserved}-byte arena");
        decoder
    }

    /// Prepares for a new frame, discarding any frame in progress or error.
    pub fn init(&mut self, dictionary: Option<Arc<Dictionary>>, options: DecodeOptions) -> Result<()> {
        self.reset(dictionary, options);
        self.window.init(self.reserved, self.dictionary.clone());
        if options.skip_magic {
            self.window.read_commit(DESCRIPTOR_SIZE)?;
            self.stage = DecodeStage::ReadFrameDescriptor;
        } else {
            self.window.read_commit(MAGIC.len())?;
            self.stage = DecodeStage::ReadFrameMagic;
        }
        Ok(())
    }

    /// Prepares for a frame whose magic, descriptor and header were parsed
    /// elsewhere; the next input expected is the first block header.
    pub fn init_with_frame_header(
        &mut self,
        dictionary: Option<Arc<Dictionary>>,
        header: FrameHeader,
        options: DecodeOptions,
    ) -> Result<()> {
        self.reset(dictionary, options);
        let result = self.begin_blocks(header);
        self.track(result)
    }

    fn reset(&mut self, dictionary: Option<Arc<Dictionary>>, options: DecodeOptions) {
        self.stage = DecodeStage::Done;
        self.options = options;
        self.dictionary = dictionary;
        self.descriptor = FrameHeaderDescriptor::default();
        self.header = None;
        self.window_size = 0;
        self.max_block_size = 0;
        self.block = BlockHeader::default();
        self.prefetch = 0;
        self.hasher.reset();
        self.checksum = None;
        self.produced = 0;
        self.failed = None;
    }

    // ── buffer protocol ─────────────────────────────────────────────────────

    /// Region the caller fills with the next input bytes.
    ///
    /// The slice borrows the arena; it is invalidated by the next consume call.
    #[inline]
    pub fn read_buffer(&mut self) -> &mut [u8] {
        self.window.read_buffer()
    }

    /// Number of input bytes the decoder is currently waiting for.
    #[inline]
    pub fn read_len(&self) -> usize {
        if self.failed.is_some() {
            return 0;
        }
        self.window.read_len()
    }

    /// Reports that the first `len` bytes of the read buffer were filled.
    pub fn read_consume(&mut self, len: usize) -> Result<()> {
        self.check_failed()?;
        let available = self.window.read_len();
        if len > available {
            return self.track(Err(ZstdError::Starvation { requested: len, available }));
        }
        self.window.read_consume(len);
        let result = self.advance();
        self.track(result)
    }

    /// Decoded bytes waiting to be drained.
    #[inline]
    pub fn write_buffer(&self) -> &[u8] {
        self.window.write_buffer()
    }

    #[inline]
    pub fn write_len(&self) -> usize {
        self.window.write_len()
    }

    /// Reports that the first `len` bytes of the write buffer were drained.
    pub fn write_consume(&mut self, len: usize) -> Result<()> {
        self.check_failed()?;
        let available = self.window.write_len();
        if len > available {
            return self.track(Err(ZstdError::Starvation { requested: len, available }));
        }
        self.window.write_consume(len);
        let result = self.advance();
        self.track(result)
    }

    // ── queries ─────────────────────────────────────────────────────────────

    /// True once the frame is fully decoded and all output drained.
    pub fn is_done(&self) -> bool {
        self.failed.is_none() && self.stage == DecodeStage::Done && self.window.write_len() == 0
    }

    /// True when no more input can be accepted until output is drained.
    pub fn needs_flush(&self) -> bool {
        self.read_len() == 0 && self.window.write_len() != 0
    }

    #[inline]
    pub fn stage(&self) -> DecodeStage {
        self.stage
    }

    /// Content checksum read from the frame trailer, once it has arrived.
    #[inline]
    pub fn checksum(&self) -> Option<u32> {
        self.checksum
    }

    /// Checksum of the bytes produced so far, when the frame carries one and
    /// verification is enabled.
    pub fn computed_checksum(&self) -> Option<u32> {
        match self.header {
            Some(h) if h.content_checksum && !self.options.skip_checksum => Some(self.hasher.digest32()),
            _ => None,
        }
    }

    #[inline]
    pub fn frame_header(&self) -> Option<&FrameHeader> {
        self.header.as_ref()
    }

    /// Bytes produced by this frame so far, drained or not.
    #[inline]
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// The error that stopped this frame, if any.
    #[inline]
    pub fn error(&self) -> Option<&ZstdError> {
        self.failed.as_ref()
    }

    // ── state machine ───────────────────────────────────────────────────────

    fn check_failed(&self) -> Result<()> {
        match &self.failed {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Records the first error; the frame is abandoned.
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            crate::displaylevel!(4, "frame decoder stopped at {:?}: {}\n", self.stage, e);
            self.failed = Some(e.clone());
            self.stage = DecodeStage::Done;
        }
        result
    }

    fn advance(&mut self) -> Result<()> {
        loop {
            let progressed = match self.stage {
                DecodeStage::Done => false,
                DecodeStage::ReadFrameMagic => self.read_frame_magic()?,
                DecodeStage::ReadFrameDescriptor => self.read_frame_descriptor()?,
                DecodeStage::ReadFrameHeader => self.read_frame_header()?,
                DecodeStage::ReadBlockHeader => self.read_block_header()?,
                DecodeStage::ReadBlockData => self.read_block_data()?,
            };
            if !progressed {
                return Ok(());
            }
        }
    }

    fn read_frame_magic(&mut self) -> Result<bool> {
        if self.window.read_len() != 0 {
            return Ok(false);
        }
        if self.window.read_take_back(MAGIC.len()) != MAGIC {
            return Err(ZstdError::BadMagic("frame"));
        }
        self.window.read_commit(DESCRIPTOR_SIZE)?;
        self.stage = DecodeStage::ReadFrameDescriptor;
        Ok(true)
    }

    fn read_frame_descriptor(&mut self) -> Result<bool> {
        if self.window.read_len() != 0 {
            return Ok(false);
        }
        let raw = self.window.read_take_back(DESCRIPTOR_SIZE)[0];
        self.descriptor = parse_frame_descriptor(raw)?;
        self.window.read_commit(self.descriptor.header_size)?;
        self.stage = DecodeStage::ReadFrameHeader;
        Ok(true)
    }

    fn read_frame_header(&mut self) -> Result<bool> {
        if self.window.read_len() != 0 {
            return Ok(false);
        }
        let data = self.window.read_take_back(self.descriptor.header_size);
        let header = parse_frame_header(&self.descriptor, data)?;
        self.begin_blocks(header)?;
        Ok(true)
    }

    /// Validates the header against the dictionary, sizes the arena, and
    /// waits for the first block header.
    fn begin_blocks(&mut self, header: FrameHeader) -> Result<()> {
        if header.dictionary_id != 0 {
            if let Some(dict) = &self.dictionary {
                if dict.id() != header.dictionary_id {
                    return Err(ZstdError::DictionaryMismatch {
                        expected: header.dictionary_id,
                        found: dict.id(),
                    });
                }
            }
        }

        self.window_size = header.window_size as usize;
        self.max_block_size = header.max_block_size();
        self.header = Some(header);
        crate::displaylevel!(
            3,
            "frame: window {} bytes, content size {:?}, dictionary {}, checksum {}\n",
            header.window_size,
            header.content_size,
            header.dictionary_id,
            header.content_checksum
        );

        let arena = self.window_size + self.max_block_size + CHECKSUM_SIZE;
        self.window.init(arena.max(self.reserved), self.dictionary.clone());
        self.window.read_commit(BLOCK_HEADER_SIZE)?;

        // An empty raw block whose trailer is the first real block header.
        self.block = BlockHeader { last_block: false, kind: BlockKind::Raw, size: 0 };
        self.prefetch = BLOCK_HEADER_SIZE;
        self.stage = DecodeStage::ReadBlockData;
        Ok(())
    }

    fn read_block_header(&mut self) -> Result<bool> {
        let block = self.block;
        let checksum = self.header.map_or(false, |h| h.content_checksum);
        let prefetch = if !block.last_block {
            BLOCK_HEADER_SIZE
        } else if checksum {
            CHECKSUM_SIZE
        } else {
            0
        };

        let size = block.size as usize;
        let needed = match block.kind {
            BlockKind::Raw => size + prefetch,
            BlockKind::Rle => size.max(1) + prefetch,
            BlockKind::Compressed => self.max_block_size + prefetch,
        };
        if !self.window.try_flush(self.window_size, needed) {
            return Ok(false);
        }

        let payload = if block.kind == BlockKind::Rle { 1 } else { size };
        self.window.read_commit(payload + prefetch)?;
        self.prefetch = prefetch;
        self.stage = DecodeStage::ReadBlockData;
        Ok(true)
    }

    fn read_block_data(&mut self) -> Result<bool> {
        if self.window.read_len() != 0 {
            return Ok(false);
        }
        let mut trailer = [0u8; CHECKSUM_SIZE];
        let prefetch = self.prefetch;
        trailer[..prefetch].copy_from_slice(self.window.read_take_back(prefetch));

        let block = self.block;
        let size = block.size as usize;
        let hash = self.computed_checksum().is_some();
        let output = match block.kind {
            BlockKind::Raw => self.window.commit_raw(size),
            BlockKind::Rle => self.window.commit_rle(size),
            BlockKind::Compressed => {
                self.window.commit_compressed(self.window_size, size, self.max_block_size)?
            }
        };
        if hash {
            self.hasher.update(output);
        }
        self.produced += output.len() as u64;
        if size > 0 {
            crate::displaylevel!(
                4,
                "block {:?}{}: {} bytes in, {} bytes out\n",
                block.kind,
                if block.last_block { " (last)" } else { "" },
                size,
                output.len()
            );
        }

        let declared = self.header.and_then(|h| h.content_size);
        if matches!(declared, Some(n) if self.produced > n) {
            return Err(ZstdError::Corruption("frame exceeds declared content size"));
        }

        match prefetch {
            BLOCK_HEADER_SIZE => {
                let next = parse_block_header(&trailer[..BLOCK_HEADER_SIZE])?;
                if next.size as usize > self.max_block_size {
                    return Err(ZstdError::Corruption("block larger than maximum block size"));
                }
                crate::displaylevel!(
                    4,
                    "block: {:?}, {} bytes{}\n",
                    next.kind,
                    next.size,
                    if next.last_block { ", last" } else { "" }
                );
                self.block = next;
                self.stage = DecodeStage::ReadBlockHeader;
            }
            CHECKSUM_SIZE => {
                let stored = u32::from_le_bytes(trailer);
                self.checksum = Some(stored);
                if hash && stored != self.hasher.digest32() {
                    return Err(ZstdError::Corruption("content checksum mismatch"));
                }
                self.finish_frame()?;
            }
            _ => self.finish_frame()?,
        }
        Ok(true)
    }

    fn finish_frame(&mut self) -> Result<()> {
        if let Some(n) = self.header.and_then(|h| h.content_size) {
            if self.produced != n {
                return Err(ZstdError::Corruption("frame content size mismatch"));
            }
        }
        crate::displaylevel!(3, "frame done: {} bytes\n", self.produced);
        self.stage = DecodeStage::Done;
        Ok(())
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
