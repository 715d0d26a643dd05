use std::io;
use std::str::Utf8Error;

use thiserror::Error;

use crate::Amf0Marker;

/// Errors that can occur while decoding AMF0 data.
#[derive(Error, Debug)]
pub enum Amf0ReadError {
    /// The input ended in the middle of a value.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The marker byte is not defined by AMF0.
    #[error("unknown marker: 0x{0:02x}")]
    UnknownMarker(u8),

    /// The marker is defined but the type is reserved or not supported.
    #[error("unsupported type: {0:?}")]
    UnsupportedType(Amf0Marker),

    #[error("wrong type: expected {expected:?}, got {got:?}")]
    WrongType {
        expected: Amf0Marker,
        got: Amf0Marker,
    },

    /// Objects and arrays are nested more deeply than the given limit.
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),

    /// String payload is not valid UTF-8.
    #[error("string parse error: {0}")]
    StringParse(#[from] Utf8Error),
}

impl Amf0ReadError {
    /// Returns true if the error was caused by running out of input.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Io(err) if err.kind() == io::ErrorKind::UnexpectedEof)
    }
}
