use std::io::{Read, Seek};

use amf0::Amf0Decoder;
use tracing::debug;

use crate::body::BodyInfo;
use crate::error::{FormatError, ParseContext, Result};
use crate::header::FlvHeader;
use crate::reader::TagReader;
use crate::script::{MetaInfo, decode_script_data};
use crate::tag::{FlvTag, FlvTagType};
use crate::video::{VideoDiagnostic, VideoDiagnosticSink, decode_video_tag};

/// Everything a parse produces apart from the video diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct FlvInfo {
    pub header: FlvHeader,
    pub body_info: BodyInfo,
    /// `None` if the file has no script tag.
    pub meta_info: Option<MetaInfo>,
}

/// Single-pass parser over a borrowed FLV stream.
///
/// ```no_run
/// use std::fs::File;
/// use std::io::BufReader;
///
/// let mut reader = BufReader::new(File::open("input.flv")?);
/// let (info, diagnostics) = flv::FlvParser::new(&mut reader).parse()?;
/// println!("{}", info.header);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct FlvParser<'r, R> {
    reader: &'r mut R,
}

impl<'r, R: Read + Seek> FlvParser<'r, R> {
    pub fn new(reader: &'r mut R) -> Self {
        Self { reader }
    }

    /// Parse the whole stream, collecting the video diagnostics.
    pub fn parse(self) -> Result<(FlvInfo, Vec<VideoDiagnostic>)> {
        let mut diagnostics = Vec::new();
        let info = self.parse_with_sink(&mut diagnostics)?;
        Ok((info, diagnostics))
    }

    /// Parse the whole stream, handing each video diagnostic to `sink` as
    /// soon as its tag has been validated.
    ///
    /// The first error aborts the parse. Diagnostics already handed to the
    /// sink stay there.
    pub fn parse_with_sink<S: VideoDiagnosticSink>(self, mut sink: S) -> Result<FlvInfo> {
        let header = FlvHeader::demux(&mut *self.reader).map_err(|e| e.at(ParseContext::Header))?;
        debug!(
            version = header.version,
            has_audio = header.has_audio,
            has_video = header.has_video,
            data_offset = header.data_offset,
            "parsed FLV header"
        );

        let mut body_info = BodyInfo::new();
        let mut meta_info = None;

        for tag in TagReader::new(&mut *self.reader, header.body_offset()) {
            let tag = tag?;
            dispatch(&tag, &mut body_info, &mut meta_info, &mut sink)
                .map_err(|e| e.at(ParseContext::Tag(tag.index)))?;
        }

        debug!(
            audio_tags = body_info.audio_count(),
            video_tags = body_info.video_count(),
            has_metadata = meta_info.is_some(),
            "finished FLV scan"
        );

        Ok(FlvInfo {
            header,
            body_info,
            meta_info,
        })
    }
}

fn dispatch<S: VideoDiagnosticSink>(
    tag: &FlvTag,
    body_info: &mut BodyInfo,
    meta_info: &mut Option<MetaInfo>,
    sink: &mut S,
) -> std::result::Result<(), FormatError> {
    match tag.tag_type {
        FlvTagType::Audio => {
            body_info.record_audio(tag.timestamp_ms);
        }
        FlvTagType::Video => {
            let index = body_info.record_video(tag.timestamp_ms);
            sink.record(decode_video_tag(index, &tag.data)?);
        }
        FlvTagType::ScriptData => {
            let meta = meta_info.get_or_insert_with(MetaInfo::new);
            decode_script_data(Amf0Decoder::new(&tag.data), meta)?;
        }
    }
    Ok(())
}
