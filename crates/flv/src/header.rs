use std::fmt::Display;
use std::io::{Read, Seek, SeekFrom};

use byteorder::{BigEndian, ReadBytesExt};
use tracing::trace;

use crate::error::FormatError;
use crate::framing;

pub const FLV_HEADER_SIZE: usize = 9;
/// "FLV" as a big-endian 24-bit integer.
pub const FLV_SIGNATURE: u32 = 0x464C56;

const FLAG_AUDIO: u8 = 0b0000_0100;
const FLAG_VIDEO: u8 = 0b0000_0001;
const FLAGS_RESERVED_HIGH: u8 = 0b1111_1000;
const FLAG_RESERVED_LOW: u8 = 0b0000_0010;

// Struct representing the FLV header, 9 bytes in total
#[derive(Debug, Clone, PartialEq)]
pub struct FlvHeader {
    pub signature: u32, // 3 bytes, always 'FLV'
    pub version: u8,
    pub has_audio: bool,
    pub has_video: bool,
    // Offset of the body from the start of the file, normally 9
    pub data_offset: u32,
}

impl Display for FlvHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let signature = String::from_utf8_lossy(&self.signature.to_be_bytes()[1..]).into_owned();

        write!(
            f,
            "FLV Header: \n\
            Signature: {}\n\
            Version: {}\n\
            Has Audio: {}\n\
            Has Video: {}\n\
            Data Offset: {}",
            signature, self.version, self.has_audio, self.has_video, self.data_offset
        )
    }
}

impl FlvHeader {
    /// Creates a version 1 header with the standard 9-byte data offset.
    pub fn new(has_audio: bool, has_video: bool) -> Self {
        FlvHeader {
            signature: FLV_SIGNATURE,
            version: 0x01,
            has_audio,
            has_video,
            data_offset: FLV_HEADER_SIZE as u32,
        }
    }

    /// Decode the fixed 9-byte header.
    ///
    /// The signature is checked first, then the flags byte: bits 7..=3 and
    /// bit 1 are reserved and must be clear.
    pub fn parse(bytes: [u8; FLV_HEADER_SIZE]) -> Result<Self, FormatError> {
        let mut reader = &bytes[..];

        let signature = reader.read_u24::<BigEndian>()?;
        if signature != FLV_SIGNATURE {
            return Err(FormatError::InvalidSignature([bytes[0], bytes[1], bytes[2]]));
        }

        let version = reader.read_u8()?;

        let flags = reader.read_u8()?;
        if flags & FLAGS_RESERVED_HIGH != 0 || flags & FLAG_RESERVED_LOW != 0 {
            return Err(FormatError::ReservedBitViolation(flags));
        }

        let data_offset = reader.read_u32::<BigEndian>()?;

        Ok(FlvHeader {
            signature,
            version,
            has_audio: flags & FLAG_AUDIO != 0,
            has_video: flags & FLAG_VIDEO != 0,
            data_offset,
        })
    }

    /// Read the header from `reader` and leave it positioned at the start of
    /// the body.
    ///
    /// When `data_offset` is larger than the header the extra bytes are
    /// skipped with a relative seek. Smaller offsets are tolerated and the
    /// body is assumed to follow the header directly.
    pub fn demux<R: Read + Seek>(reader: &mut R) -> Result<Self, FormatError> {
        let mut bytes = [0u8; FLV_HEADER_SIZE];
        framing::read_exact_or_truncated(reader, &mut bytes)?;

        let header = Self::parse(bytes)?;

        let extra = header.body_offset() - FLV_HEADER_SIZE as u64;
        if extra > 0 {
            trace!(extra, "skipping extended header bytes");
            reader.seek(SeekFrom::Current(extra as i64))?;
        }

        Ok(header)
    }

    /// Absolute offset of the first body byte (the `PreviousTagSize0` field).
    pub fn body_offset(&self) -> u64 {
        u64::from(self.data_offset).max(FLV_HEADER_SIZE as u64)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io::Cursor;

    use byteorder::WriteBytesExt;

    use super::*;

    fn header_bytes(version: u8, flags: u8, data_offset: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(b"FLV");
        buffer.push(version);
        buffer.push(flags);
        buffer.write_u32::<BigEndian>(data_offset).unwrap();
        buffer
    }

    #[test]
    fn test_valid_flv_header() {
        let buffer = header_bytes(0x01, 0x05, 9);
        let mut reader = Cursor::new(&buffer[..]);

        let header = FlvHeader::demux(&mut reader).unwrap();

        assert_eq!(header, FlvHeader::new(true, true));
        assert_eq!(reader.position(), 9);
    }

    #[test]
    fn test_flags_and_version_are_reproduced() {
        for version in [0u8, 1, 2, 0xff] {
            for (flags, has_audio, has_video) in [
                (0x00, false, false),
                (0x01, false, true),
                (0x04, true, false),
                (0x05, true, true),
            ] {
                let buffer = header_bytes(version, flags, 9);
                let header = FlvHeader::demux(&mut Cursor::new(buffer)).unwrap();
                assert_eq!(header.version, version);
                assert_eq!(header.has_audio, has_audio);
                assert_eq!(header.has_video, has_video);
            }
        }
    }

    #[test]
    fn test_invalid_flv_signature() {
        let mut buffer = header_bytes(0x01, 0x05, 9);
        buffer[..3].copy_from_slice(b"ABC");

        let err = FlvHeader::demux(&mut Cursor::new(buffer)).unwrap_err();
        assert!(matches!(err, FormatError::InvalidSignature(sig) if &sig == b"ABC"));
    }

    #[test]
    fn test_reserved_bits() {
        for flags in [0xff, 0x02, 0x07, 0x08, 0x80] {
            let buffer = header_bytes(0x01, flags, 9);
            let err = FlvHeader::demux(&mut Cursor::new(buffer)).unwrap_err();
            assert!(
                matches!(err, FormatError::ReservedBitViolation(f) if f == flags),
                "flags 0x{flags:02X} should be rejected"
            );
        }
    }

    #[test]
    fn test_short_header_is_truncated() {
        let buffer = b"FLV\x01\x05".to_vec();
        let err = FlvHeader::demux(&mut Cursor::new(buffer)).unwrap_err();
        assert!(matches!(
            err,
            FormatError::TruncatedStream {
                expected: 9,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_extended_data_offset_is_skipped() {
        let mut buffer = header_bytes(0x01, 0x04, 13);
        buffer.extend_from_slice(&[0xaa; 4]);
        buffer.extend_from_slice(&[0x00; 4]);

        let mut reader = Cursor::new(buffer);
        let header = FlvHeader::demux(&mut reader).unwrap();

        assert_eq!(header.data_offset, 13);
        assert_eq!(header.body_offset(), 13);
        assert_eq!(reader.position(), 13);
    }

    #[test]
    fn test_small_data_offset_does_not_rewind() {
        let buffer = header_bytes(0x01, 0x01, 0);
        let mut reader = Cursor::new(buffer);
        let header = FlvHeader::demux(&mut reader).unwrap();

        assert_eq!(header.body_offset(), 9);
        assert_eq!(reader.position(), 9);
    }

    #[test]
    fn test_display() {
        let rendered = FlvHeader::new(true, false).to_string();
        assert!(rendered.contains("Signature: FLV"));
        assert!(rendered.contains("Has Audio: true"));
        assert!(rendered.contains("Has Video: false"));
        assert!(rendered.contains("Data Offset: 9"));
    }
}
