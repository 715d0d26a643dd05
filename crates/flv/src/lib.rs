//! Strict, single-pass FLV container inspection.
//!
//! [`FlvParser`] validates the file header, walks every tag checking each
//! `PreviousTagSize` back-link, and produces:
//!
//! - the [`FlvHeader`],
//! - a [`BodyInfo`] with audio/video tag counts and timestamp ranges,
//! - the [`MetaInfo`] decoded from script tags, if any,
//! - one [`VideoDiagnostic`] per video tag, with the AVC envelope checked.
//!
//! Any structural violation aborts the parse with an [`FlvError`] naming where
//! it happened. Audio and video sample payloads are never decoded.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]

pub mod avc;
pub mod body;
pub mod error;
pub mod framing;
pub mod header;
mod macros;
pub mod parser;
pub mod reader;
pub mod script;
pub mod tag;
pub mod video;

pub use body::BodyInfo;
pub use error::{FlvError, FormatError, ParseContext, Result};
pub use header::FlvHeader;
pub use parser::{FlvInfo, FlvParser};
pub use reader::TagReader;
pub use script::{MetaInfo, ScriptDataError};
pub use tag::{FlvTag, FlvTagType};
pub use video::{VideoDiagnostic, VideoDiagnosticSink};
