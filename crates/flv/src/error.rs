//! Error types for FLV parsing.
//!
//! Every failure is fatal: tag boundaries come from self-reported sizes, so
//! once one of them is wrong nothing after it can be trusted.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::script::ScriptDataError;

/// What went wrong.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The stream ended before a structure was complete.
    #[error("truncated stream: expected {expected} bytes, got {actual}")]
    TruncatedStream {
        /// Number of bytes the structure needs.
        expected: usize,
        /// Number of bytes that were available.
        actual: usize,
    },

    #[error("invalid FLV signature: expected \"FLV\", got {0:?}")]
    InvalidSignature([u8; 3]),

    /// A reserved bit of the header flags byte is set.
    #[error("reserved bits set in header flags: 0x{0:02X}")]
    ReservedBitViolation(u8),

    /// A `PreviousTagSize` field does not match the size of the tag before it.
    #[error("previous tag size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: u32, actual: u32 },

    #[error("unknown tag type: {0}")]
    UnknownTagType(u8),

    /// The AVC packet is too short to hold its packet type and composition time.
    #[error("invalid AVC video packet: {len} bytes after the control byte, need more than 4")]
    InvalidAvcPacket { len: usize },

    /// A composition time offset on a packet that is not a NAL unit.
    #[error("composition time {composition_time} set on AVC packet type {packet_type}")]
    CompositionTimeViolation {
        packet_type: u8,
        composition_time: u32,
    },

    #[error("script data decode failure: {0}")]
    ScriptDataDecodeFailure(#[from] ScriptDataError),

    /// The underlying stream failed for a reason other than running out of data.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl FormatError {
    /// Attach the position the error occurred at.
    pub fn at(self, context: ParseContext) -> FlvError {
        FlvError {
            context,
            kind: self,
        }
    }
}

/// Where in the stream an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseContext {
    Header,
    /// The `PreviousTagSize0` field after the header.
    FirstTagSize,
    /// A tag, numbered from 1 in scan order.
    Tag(u64),
}

impl fmt::Display for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseContext::Header => write!(f, "while parsing header"),
            ParseContext::FirstTagSize => write!(f, "while parsing first previous tag size"),
            ParseContext::Tag(n) => write!(f, "while parsing tag {n}"),
        }
    }
}

/// A [`FormatError`] annotated with its position.
#[derive(Error, Debug)]
#[error("{context}: {kind}")]
pub struct FlvError {
    pub context: ParseContext,
    pub kind: FormatError,
}

impl FlvError {
    pub fn kind(&self) -> &FormatError {
        &self.kind
    }

    pub fn context(&self) -> ParseContext {
        self.context
    }
}

/// Result type alias for FLV parsing.
pub type Result<T> = std::result::Result<T, FlvError>;

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_context() {
        let err = FormatError::SizeMismatch {
            expected: 16,
            actual: 15,
        }
        .at(ParseContext::Tag(3));

        assert_eq!(
            err.to_string(),
            "while parsing tag 3: previous tag size mismatch: expected 16, got 15"
        );
        assert_eq!(err.context(), ParseContext::Tag(3));
    }

    #[test]
    fn test_header_context() {
        let err = FormatError::InvalidSignature(*b"ABC").at(ParseContext::Header);
        assert!(err.to_string().starts_with("while parsing header: invalid FLV signature"));
        assert!(matches!(err.kind(), FormatError::InvalidSignature(sig) if sig == b"ABC"));
    }
}
