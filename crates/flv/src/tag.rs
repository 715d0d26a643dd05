use std::fmt;

use bytes::Bytes;

use crate::error::FormatError;
use crate::framing::{TAG_HEADER_SIZE, TagHeader};

/// An FLV tag with its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FlvTag {
    /// Position of the tag in the scan, starting at 1.
    pub index: u64,
    /// A timestamp in milliseconds
    pub timestamp_ms: u32,
    /// Always 0 in conforming files; not interpreted.
    pub stream_id: u32,
    pub tag_type: FlvTagType,
    /// Copy free buffer
    pub data: Bytes,
}

impl FlvTag {
    pub(crate) fn from_parts(
        index: u64,
        header: &TagHeader,
        data: Bytes,
    ) -> Result<Self, FormatError> {
        let tag_type = FlvTagType::try_from(header.tag_type).map_err(FormatError::UnknownTagType)?;

        Ok(FlvTag {
            index,
            timestamp_ms: header.timestamp_ms,
            stream_id: header.stream_id,
            tag_type,
            data,
        })
    }

    /// Size of the tag on the wire, envelope included.
    pub fn size(&self) -> usize {
        self.data.len() + TAG_HEADER_SIZE
    }

    pub fn is_script_tag(&self) -> bool {
        matches!(self.tag_type, FlvTagType::ScriptData)
    }

    pub fn is_audio_tag(&self) -> bool {
        matches!(self.tag_type, FlvTagType::Audio)
    }

    pub fn is_video_tag(&self) -> bool {
        matches!(self.tag_type, FlvTagType::Video)
    }
}

/// FLV Tag Type
///
/// Defined by:
/// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV File Format - FLV tags)
/// - video_file_format_spec_v10_1.pdf (Annex E.4.1 - FLV Tag)
///
/// Only these three exist; any other value in the low 5 bits of the
/// envelope is a format error.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlvTagType {
    Audio = 8,
    Video = 9,
    ScriptData = 18,
}

impl TryFrom<u8> for FlvTagType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            8 => Ok(FlvTagType::Audio),
            9 => Ok(FlvTagType::Video),
            18 => Ok(FlvTagType::ScriptData),
            other => Err(other),
        }
    }
}

impl From<FlvTagType> for u8 {
    fn from(value: FlvTagType) -> Self {
        value as u8
    }
}

impl fmt::Display for FlvTagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlvTagType::Audio => write!(f, "Audio"),
            FlvTagType::Video => write!(f, "Video"),
            FlvTagType::ScriptData => write!(f, "Script"),
        }
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    fn header(tag_type: u8) -> TagHeader {
        TagHeader {
            tag_type,
            data_size: 3,
            timestamp_ms: 40,
            stream_id: 0,
        }
    }

    #[test]
    fn test_tag_type_round_trip() {
        for tag_type in [FlvTagType::Audio, FlvTagType::Video, FlvTagType::ScriptData] {
            assert_eq!(FlvTagType::try_from(u8::from(tag_type)), Ok(tag_type));
        }
        assert_eq!(FlvTagType::try_from(0x0a), Err(0x0a));
    }

    #[test]
    fn test_from_parts() {
        let tag = FlvTag::from_parts(2, &header(9), Bytes::from_static(&[0x17, 0, 0])).unwrap();
        assert_eq!(tag.index, 2);
        assert_eq!(tag.timestamp_ms, 40);
        assert!(tag.is_video_tag());
        assert!(!tag.is_audio_tag());
        assert_eq!(tag.size(), 14);
    }

    #[test]
    fn test_unknown_tag_type() {
        let err = FlvTag::from_parts(1, &header(0x0f), Bytes::new()).unwrap_err();
        assert!(matches!(err, FormatError::UnknownTagType(0x0f)));
    }
}
