use std::io::{self, Read};

use crate::error::FormatError;

pub const PREV_TAG_SIZE_FIELD_SIZE: usize = 4;
pub const TAG_HEADER_SIZE: usize = 11;

/// The 11-byte envelope in front of every tag payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    /// Low 5 bits of the first byte.
    pub tag_type: u8,
    pub data_size: u32,
    /// 24-bit timestamp with the extension byte as the high 8 bits.
    pub timestamp_ms: u32,
    pub stream_id: u32,
}

impl TagHeader {
    pub fn parse(bytes: [u8; TAG_HEADER_SIZE]) -> Self {
        let u24 = |b: &[u8]| ((b[0] as u32) << 16) | ((b[1] as u32) << 8) | (b[2] as u32);

        TagHeader {
            tag_type: bytes[0] & 0x1F,
            data_size: u24(&bytes[1..4]),
            timestamp_ms: ((bytes[7] as u32) << 24) | u24(&bytes[4..7]),
            stream_id: u24(&bytes[8..11]),
        }
    }

    /// The value the `PreviousTagSize` field after this tag must carry.
    pub fn expected_back_link(&self) -> u32 {
        TAG_HEADER_SIZE as u32 + self.data_size
    }
}

/// Read until `buf` is full or the stream ends, returning how many bytes were
/// read. Only genuine I/O failures are errors.
pub(crate) fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Fill `buf` completely or fail with [`FormatError::TruncatedStream`].
pub(crate) fn read_exact_or_truncated<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<(), FormatError> {
    let actual = read_up_to(reader, buf)?;
    if actual < buf.len() {
        return Err(FormatError::TruncatedStream {
            expected: buf.len(),
            actual,
        });
    }
    Ok(())
}

pub(crate) fn read_prev_tag_size<R: Read>(reader: &mut R) -> Result<u32, FormatError> {
    let mut bytes = [0u8; PREV_TAG_SIZE_FIELD_SIZE];
    read_exact_or_truncated(reader, &mut bytes)?;
    Ok(u32::from_be_bytes(bytes))
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_parse_tag_header() {
        let bytes = [
            0x09, // video
            0x00, 0x01, 0x02, // data size 258
            0x12, 0x34, 0x56, // timestamp
            0x01, // extended timestamp
            0x00, 0x00, 0x00, // stream id
        ];

        let header = TagHeader::parse(bytes);
        assert_eq!(header.tag_type, 9);
        assert_eq!(header.data_size, 258);
        assert_eq!(header.timestamp_ms, 0x0112_3456);
        assert_eq!(header.stream_id, 0);
        assert_eq!(header.expected_back_link(), 269);
    }

    #[test]
    fn test_tag_type_ignores_upper_bits() {
        let mut bytes = [0u8; TAG_HEADER_SIZE];
        bytes[0] = 0x20 | 0x12;
        assert_eq!(TagHeader::parse(bytes).tag_type, 0x12);
    }

    #[test]
    fn test_read_up_to_short_stream() {
        let mut reader = Cursor::new(vec![1, 2, 3]);
        let mut buf = [0u8; 11];
        assert_eq!(read_up_to(&mut reader, &mut buf).unwrap(), 3);
        assert_eq!(read_up_to(&mut reader, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_exact_or_truncated() {
        let mut reader = Cursor::new(vec![0, 0]);
        let mut buf = [0u8; 4];
        let err = read_exact_or_truncated(&mut reader, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            FormatError::TruncatedStream {
                expected: 4,
                actual: 2
            }
        ));
    }
}
