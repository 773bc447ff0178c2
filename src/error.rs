//! Error type shared by every stage of the decoder.
//!
//! All errors are fatal to the frame in progress: the frame decoder stops,
//! remembers the error, and keeps returning it until it is re-initialized.
//! The only non-fatal condition ("not enough buffered input or output room
//! yet") is reported through the buffer protocol, never as an error.

use core::fmt;

/// Errors returned by the bit readers, table builders, block decoders and the
/// frame state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZstdError {
    /// A bit-width request outside the supported range, or an aligned-only
    /// access made while the reader sits in the middle of a byte.
    MalformedSize(&'static str),
    /// A reserved bit or field is non-zero where the format requires zero.
    ReservedFieldUsed(&'static str),
    /// Frame magic mismatch.
    BadMagic(&'static str),
    /// A decoded size, offset or accuracy exceeds its structural bound.
    OutOfRange(&'static str),
    /// A decoded invariant failed after the fact, or the input ended inside a
    /// structure that claimed more bytes.
    Corruption(&'static str),
    /// The caller committed or consumed more bytes than the exposed region holds.
    Starvation { requested: usize, available: usize },
    /// The frame names a dictionary other than the one supplied.
    DictionaryMismatch { expected: u32, found: u32 },
}

impl ZstdError {
    /// Stable identifier for the error kind, independent of its context.
    pub fn name(&self) -> &'static str {
        match self {
            ZstdError::MalformedSize(_) => "malformed_size",
            ZstdError::ReservedFieldUsed(_) => "reserved_field_used",
            ZstdError::BadMagic(_) => "bad_magic",
            ZstdError::OutOfRange(_) => "out_of_range",
            ZstdError::Corruption(_) => "corruption",
            ZstdError::Starvation { .. } => "starvation",
            ZstdError::DictionaryMismatch { .. } => "dictionary_mismatch",
        }
    }
}

impl fmt::Display for ZstdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZstdError::MalformedSize(what) => write!(f, "malformed size: {what}"),
            ZstdError::ReservedFieldUsed(what) => write!(f, "reserved bits used for {what}"),
            ZstdError::BadMagic(what) => write!(f, "bad magic for {what}"),
            ZstdError::OutOfRange(what) => write!(f, "out of range: {what}"),
            ZstdError::Corruption(what) => write!(f, "corrupted input: {what}"),
            ZstdError::Starvation { requested, available } => write!(
                f,
                "requested {requested} bytes but only {available} are available"
            ),
            ZstdError::DictionaryMismatch { expected, found } => write!(
                f,
                "frame requires dictionary {expected} but dictionary {found} was supplied"
            ),
        }
    }
}

impl std::error::Error for ZstdError {}

impl From<ZstdError> for std::io::Error {
    fn from(e: ZstdError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    }
}

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, ZstdError>;
