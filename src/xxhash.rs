//! Thin wrapper around the `xxhash-rust` crate providing the XXH64 API used
//! for frame content checksums.
//!
//! A frame stores the low 32 bits of the XXH64 (seed 0) digest of its
//! decompressed content.

pub use xxhash_rust::xxh64::Xxh64 as Xxh64State;

/// Seed used for content checksums.
pub const CONTENT_CHECKSUM_SEED: u64 = 0;

/// One-shot XXH64 hash.
#[inline]
pub fn xxh64_oneshot(data: &[u8], seed: u64) -> u64 {
    xxhash_rust::xxh64::xxh64(data, seed)
}

/// Content checksum of `data` as stored in a frame trailer.
#[inline]
pub fn content_checksum(data: &[u8]) -> u32 {
    xxh64_oneshot(data, CONTENT_CHECKSUM_SEED) as u32
}

/// Running content checksum fed block by block.
#[derive(Clone)]
pub struct ContentHasher {
    state: Xxh64State,
}

impl ContentHasher {
    pub fn new() -> Self {
        ContentHasher { state: Xxh64State::new(CONTENT_CHECKSUM_SEED) }
    }

    pub fn reset(&mut self) {
        self.state.reset(CONTENT_CHECKSUM_SEED);
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Low 32 bits of the digest so far.
    pub fn digest32(&self) -> u32 {
        self.state.digest() as u32
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ContentHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ContentHasher").field("digest32", &self.digest32()).finish()
    }
}
