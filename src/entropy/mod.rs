//! Entropy-coding tables: range-coded (FSE) and canonical prefix-code (Huffman).

pub mod fse;
pub mod huffman;
pub mod predefined;

pub use fse::{decode_interleaved2, FseDecoder, FseTable};
pub use huffman::{HuffmanDecoder, HuffmanTable};
