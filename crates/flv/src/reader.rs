use std::io::Read;
use std::iter::FusedIterator;

use bytes::BytesMut;
use tracing::trace;

use crate::error::{FlvError, FormatError, ParseContext};
use crate::framing::{self, PREV_TAG_SIZE_FIELD_SIZE, TAG_HEADER_SIZE, TagHeader};
use crate::tag::FlvTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// `PreviousTagSize0` has not been read yet.
    ExpectFirstSize,
    ExpectTag,
    /// Clean end of stream at a tag boundary.
    Done,
    Failed,
}

/// Sequential reader over the tags of an FLV body.
///
/// The reader must be positioned at the first body byte, i.e. right before
/// `PreviousTagSize0`. Each tag is checked against the back-link that follows
/// it before being yielded. The iterator ends after the first error or when
/// the stream ends exactly at a tag boundary.
pub struct TagReader<R> {
    reader: R,
    state: State,
    /// Number of tags started so far; the index of the tag being read.
    tag_index: u64,
    /// Absolute stream position, for logging only.
    position: u64,
}

impl<R: Read> TagReader<R> {
    /// `position` is the absolute offset `reader` is at, usually
    /// [`FlvHeader::body_offset`](crate::header::FlvHeader::body_offset).
    pub fn new(reader: R, position: u64) -> Self {
        Self {
            reader,
            state: State::ExpectFirstSize,
            tag_index: 0,
            position,
        }
    }

    /// Number of tags read or attempted so far.
    pub fn tag_index(&self) -> u64 {
        self.tag_index
    }

    /// Absolute stream offset of the next unread byte.
    pub fn offset(&self) -> u64 {
        self.position
    }

    fn read_first_size(&mut self) -> Result<(), FormatError> {
        let size = framing::read_prev_tag_size(&mut self.reader)?;
        self.position += PREV_TAG_SIZE_FIELD_SIZE as u64;
        if size != 0 {
            return Err(FormatError::SizeMismatch {
                expected: 0,
                actual: size,
            });
        }
        Ok(())
    }

    /// Read one tag and its back-link. `Ok(None)` is the clean end.
    fn read_tag(&mut self) -> Result<Option<FlvTag>, FormatError> {
        let mut envelope = [0u8; TAG_HEADER_SIZE];
        let read = framing::read_up_to(&mut self.reader, &mut envelope)?;
        if read == 0 {
            return Ok(None);
        }
        if read < TAG_HEADER_SIZE {
            return Err(FormatError::TruncatedStream {
                expected: TAG_HEADER_SIZE,
                actual: read,
            });
        }

        let header = TagHeader::parse(envelope);
        trace!(
            index = self.tag_index,
            position = self.position,
            tag_type = header.tag_type,
            data_size = header.data_size,
            timestamp_ms = header.timestamp_ms,
            "tag envelope"
        );

        let data_size = header.data_size as usize;
        let mut data = BytesMut::zeroed(data_size);
        framing::read_exact_or_truncated(&mut self.reader, &mut data)?;

        let back_link = framing::read_prev_tag_size(&mut self.reader)?;
        if back_link != header.expected_back_link() {
            return Err(FormatError::SizeMismatch {
                expected: header.expected_back_link(),
                actual: back_link,
            });
        }

        self.position += (TAG_HEADER_SIZE + data_size + PREV_TAG_SIZE_FIELD_SIZE) as u64;

        FlvTag::from_parts(self.tag_index, &header, data.freeze()).map(Some)
    }

    fn fail(&mut self, error: FormatError, context: ParseContext) -> Option<Result<FlvTag, FlvError>> {
        self.state = State::Failed;
        Some(Err(error.at(context)))
    }
}

impl<R: Read> Iterator for TagReader<R> {
    type Item = Result<FlvTag, FlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::ExpectFirstSize {
            if let Err(e) = self.read_first_size() {
                return self.fail(e, ParseContext::FirstTagSize);
            }
            self.state = State::ExpectTag;
        }

        if self.state != State::ExpectTag {
            return None;
        }

        self.tag_index += 1;
        match self.read_tag() {
            Ok(Some(tag)) => Some(Ok(tag)),
            Ok(None) => {
                // The attempted tag never started.
                self.tag_index -= 1;
                self.state = State::Done;
                None
            }
            Err(e) => self.fail(e, ParseContext::Tag(self.tag_index)),
        }
    }
}

impl<R: Read> FusedIterator for TagReader<R> {}
