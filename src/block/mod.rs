//! Block body decoding.
//!
//! Literals and sequence sections are decoded here, and the window arena
//! turns raw, RLE and compressed block payloads into frame output.

pub mod literals;
pub mod sequences;
pub mod window;

pub use literals::{LiteralsDecoder, LiteralsHeader, LiteralsKind};
pub use sequences::{resolve_offset, SequenceCommand, SequenceDecoder, TableMode};
pub use window::Window;
