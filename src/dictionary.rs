//! Pre-built decompression dictionaries.
//!
//! A [`Dictionary`] holds history bytes that back-references at the start of
//! a frame may reach into, plus optional entropy tables and repeat offsets
//! that seed the first compressed block. Parsing dictionary *files* is left to
//! the caller; this type is built from values.
//!
//! # Thread safety
//! A `Dictionary` is read-only after construction. Decoders hold it through an
//! `Arc`, so one dictionary can prime any number of decoders concurrently.

use crate::entropy::{FseTable, HuffmanTable};

/// Repeat offsets a frame starts with when no dictionary overrides them.
pub const DEFAULT_REPEAT_OFFSETS: [u64; 3] = [1, 4, 8];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    id: u32,
    content: Vec<u8>,
    literals_table: Option<HuffmanTable>,
    literal_length_table: Option<FseTable>,
    offset_table: Option<FseTable>,
    match_length_table: Option<FseTable>,
    previous_offsets: Option<[u64; 3]>,
}

impl Dictionary {
    /// A content-only dictionary.
    pub fn new(id: u32, content: impl Into<Vec<u8>>) -> Self {
        Dictionary { id, content: content.into(), ..Default::default() }
    }

    /// Table used by the first block whose literals repeat the previous table.
    pub fn with_literals_table(mut self, table: HuffmanTable) -> Self {
        self.literals_table = Some(table);
        self
    }

    /// Tables used by the first block whose sequence modes repeat the previous tables.
    pub fn with_sequence_tables(
        mut self,
        literal_lengths: FseTable,
        offsets: FseTable,
        match_lengths: FseTable,
    ) -> Self {
        self.literal_length_table = Some(literal_lengths);
        self.offset_table = Some(offsets);
        self.match_length_table = Some(match_lengths);
        self
    }

    pub fn with_previous_offsets(mut self, offsets: [u64; 3]) -> Self {
        self.previous_offsets = Some(offsets);
        self
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn literals_table(&self) -> Option<&HuffmanTable> {
        self.literals_table.as_ref()
    }

    pub fn literal_length_table(&self) -> Option<&FseTable> {
        self.literal_length_table.as_ref()
    }

    pub fn offset_table(&self) -> Option<&FseTable> {
        self.offset_table.as_ref()
    }

    pub fn match_length_table(&self) -> Option<&FseTable> {
        self.match_length_table.as_ref()
    }

    /// Repeat offsets to start a frame with.
    pub fn repeat_offsets(&self) -> [u64; 3] {
        self.previous_offsets.unwrap_or(DEFAULT_REPEAT_OFFSETS)
    }
}
