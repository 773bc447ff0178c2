//! Bit-level cursors over borrowed byte slices.
//!
//! Two readers are provided:
//! - [`ByteReader`] walks forward with byte and bit granularity; it parses
//!   headers and hands out sub-views over the byte ranges that follow them.
//! - [`ReverseBitReader`] starts at the end of its range and consumes bits
//!   right to left, which is how every entropy-coded stream is laid out.
//!
//! Readers never own memory. They borrow from the frame decoder's arena and
//! cannot outlive the call that created them.

pub mod forward;
pub mod reverse;

pub use forward::ByteReader;
pub use reverse::ReverseBitReader;

/// Index of the highest set bit. `value` must be non-zero.
#[inline]
pub fn highest_bit_set(value: u32) -> u32 {
    debug_assert!(value != 0);
    31 - value.leading_zeros()
}

/// Reads `bits` (1..=32) bits starting at absolute bit position `pos`,
/// little-endian bit packing: bit `pos` lands in bit 0 of the result.
///
/// The caller guarantees `pos + bits <= data.len() * 8`.
#[inline]
pub(crate) fn read_bits_le(data: &[u8], pos: usize, bits: u32) -> u32 {
    debug_assert!((1..=32).contains(&bits));
    let shift = pos % 8;
    let first = pos / 8;
    let count = (shift + bits as usize + 7) / 8;
    let mut acc: u64 = 0;
    for (i, &b) in data[first..first + count].iter().enumerate() {
        acc |= u64::from(b) << (8 * i);
    }
    ((acc >> shift) & ((1u64 << bits) - 1)) as u32
}
