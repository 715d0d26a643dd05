use std::borrow::Cow;
use std::io::{self, Cursor};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{Amf0Marker, Amf0Property, Amf0ReadError, Amf0Value};

/// Deepest nesting of objects and arrays the decoder accepts.
pub const MAX_NESTING_DEPTH: usize = 128;

/// An AMF0 decoder over a borrowed byte slice.
///
/// Strings and property keys borrow from the input, so decoding does not copy
/// text. The decoder is also an [`Iterator`] over the remaining values, which
/// ends cleanly only when the input is fully consumed.
pub struct Amf0Decoder<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Amf0Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Offset of the next unread byte.
    pub fn offset(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.offset())
    }

    /// Check if the decoder has reached the end of the input.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Decode the next value.
    pub fn decode(&mut self) -> Result<Amf0Value<'a>, Amf0ReadError> {
        self.decode_at(0)
    }

    /// `depth` is the number of containers enclosing the value.
    fn decode_at(&mut self, depth: usize) -> Result<Amf0Value<'a>, Amf0ReadError> {
        let marker = self.read_marker()?;

        if matches!(
            marker,
            Amf0Marker::Object | Amf0Marker::EcmaArray | Amf0Marker::StrictArray
        ) && depth >= MAX_NESTING_DEPTH
        {
            return Err(Amf0ReadError::NestingTooDeep(MAX_NESTING_DEPTH));
        }

        match marker {
            Amf0Marker::Number => Ok(Amf0Value::Number(self.cursor.read_f64::<BigEndian>()?)),
            Amf0Marker::Boolean => Ok(Amf0Value::Boolean(self.cursor.read_u8()? != 0)),
            Amf0Marker::String => Ok(Amf0Value::String(self.read_string()?)),
            Amf0Marker::Object => Ok(Amf0Value::Object(self.read_object(depth + 1)?.into())),
            Amf0Marker::Null => Ok(Amf0Value::Null),
            Amf0Marker::Undefined => Ok(Amf0Value::Undefined),
            Amf0Marker::EcmaArray => Ok(Amf0Value::EcmaArray(self.read_ecma_array(depth + 1)?.into())),
            Amf0Marker::StrictArray => {
                Ok(Amf0Value::StrictArray(self.read_strict_array(depth + 1)?.into()))
            }
            Amf0Marker::Date => {
                let timestamp = self.cursor.read_f64::<BigEndian>()?;
                let timezone = self.cursor.read_i16::<BigEndian>()?;
                Ok(Amf0Value::Date {
                    timestamp,
                    timezone,
                })
            }
            Amf0Marker::LongString => Ok(Amf0Value::LongString(self.read_long_string()?)),
            other => Err(Amf0ReadError::UnsupportedType(other)),
        }
    }

    /// Decode the next value, failing without consuming input if its marker is
    /// not `expected`.
    pub fn decode_with_type(
        &mut self,
        expected: Amf0Marker,
    ) -> Result<Amf0Value<'a>, Amf0ReadError> {
        let start = self.cursor.position();
        let got = self.read_marker()?;
        self.cursor.set_position(start);

        if got != expected {
            return Err(Amf0ReadError::WrongType { expected, got });
        }

        self.decode()
    }

    fn read_marker(&mut self) -> Result<Amf0Marker, Amf0ReadError> {
        let byte = self.cursor.read_u8()?;
        Amf0Marker::try_from(byte).map_err(Amf0ReadError::UnknownMarker)
    }

    /// Borrow the next `len` bytes of the input.
    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], Amf0ReadError> {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.offset();
        let end = start
            .checked_add(len)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("need {len} bytes at offset {start}, {} left", data.len() - start),
                )
            })?;

        self.cursor.set_position(end as u64);
        Ok(&data[start..end])
    }

    fn read_string(&mut self) -> Result<Cow<'a, str>, Amf0ReadError> {
        let len = self.cursor.read_u16::<BigEndian>()? as usize;
        let bytes = self.read_slice(len)?;
        Ok(Cow::Borrowed(std::str::from_utf8(bytes)?))
    }

    fn read_long_string(&mut self) -> Result<Cow<'a, str>, Amf0ReadError> {
        let len = self.cursor.read_u32::<BigEndian>()? as usize;
        let bytes = self.read_slice(len)?;
        Ok(Cow::Borrowed(std::str::from_utf8(bytes)?))
    }

    /// Consume the object-end sequence if it is next.
    fn consume_object_end(&mut self) -> bool {
        if self.remaining() < 3 {
            return false;
        }

        let start = self.cursor.position();
        match self.cursor.read_u24::<BigEndian>() {
            Ok(Amf0Marker::OBJECT_END_SEQUENCE) => true,
            _ => {
                self.cursor.set_position(start);
                false
            }
        }
    }

    fn read_property(&mut self, depth: usize) -> Result<Amf0Property<'a>, Amf0ReadError> {
        let key = self.read_string()?;
        let value = self.decode_at(depth)?;
        Ok((key, value))
    }

    fn read_object(&mut self, depth: usize) -> Result<Vec<Amf0Property<'a>>, Amf0ReadError> {
        let mut properties = Vec::new();

        while !self.consume_object_end() {
            properties.push(self.read_property(depth)?);
        }

        Ok(properties)
    }

    fn read_ecma_array(&mut self, depth: usize) -> Result<Vec<Amf0Property<'a>>, Amf0ReadError> {
        let count = self.cursor.read_u32::<BigEndian>()?;
        let mut properties = Vec::with_capacity(count.min(1024) as usize);

        for _ in 0..count {
            properties.push(self.read_property(depth)?);
        }

        // Sometimes the object-end sequence is present and sometimes it is not.
        self.consume_object_end();

        Ok(properties)
    }

    fn read_strict_array(&mut self, depth: usize) -> Result<Vec<Amf0Value<'a>>, Amf0ReadError> {
        let count = self.cursor.read_u32::<BigEndian>()?;
        let mut values = Vec::with_capacity(count.min(1024) as usize);

        for _ in 0..count {
            values.push(self.decode_at(depth)?);
        }

        Ok(values)
    }
}

impl<'a> Iterator for Amf0Decoder<'a> {
    type Item = Result<Amf0Value<'a>, Amf0ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_empty() {
            return None;
        }

        Some(self.decode())
    }
}
