//! Built-in distributions for the three sequence fields.
//!
//! Tables are built on first use and shared for the life of the process.

use std::sync::OnceLock;

use super::fse::FseTable;

pub const LITERAL_LENGTH_ACCURACY: u32 = 6;
pub const MATCH_LENGTH_ACCURACY: u32 = 6;
pub const OFFSET_ACCURACY: u32 = 5;

/// Largest accuracies a stream-supplied table may use for each field.
pub const LITERAL_LENGTH_MAX_ACCURACY: u32 = 9;
pub const MATCH_LENGTH_MAX_ACCURACY: u32 = 9;
pub const OFFSET_MAX_ACCURACY: u32 = 8;

#[rustfmt::skip]
pub const LITERAL_LENGTH_DISTRIBUTION: [i32; 36] = [
    4, 3, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 1, 1,
    2, 2, 2, 2, 2, 2, 2, 2, 2, 3, 2, 1, 1, 1, 1, 1,
    -1, -1, -1, -1,
];

#[rustfmt::skip]
pub const MATCH_LENGTH_DISTRIBUTION: [i32; 53] = [
    1, 4, 3, 2, 2, 2, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, -1, -1,
    -1, -1, -1, -1, -1,
];

#[rustfmt::skip]
pub const OFFSET_DISTRIBUTION: [i32; 29] = [
    1, 1, 1, 1, 1, 1, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, -1, -1, -1, -1, -1,
];

fn build(distribution: &[i32], accuracy: u32) -> FseTable {
    FseTable::from_probabilities(distribution, accuracy)
        .expect("built-in distribution fills its table")
}

pub fn literal_lengths() -> &'static FseTable {
    static TABLE: OnceLock<FseTable> = OnceLock::new();
    TABLE.get_or_init(|| build(&LITERAL_LENGTH_DISTRIBUTION, LITERAL_LENGTH_ACCURACY))
}

pub fn match_lengths() -> &'static FseTable {
    static TABLE: OnceLock<FseTable> = OnceLock::new();
    TABLE.get_or_init(|| build(&MATCH_LENGTH_DISTRIBUTION, MATCH_LENGTH_ACCURACY))
}

pub fn offsets() -> &'static FseTable {
    static TABLE: OnceLock<FseTable> = OnceLock::new();
    TABLE.get_or_init(|| build(&OFFSET_DISTRIBUTION, OFFSET_ACCURACY))
}
