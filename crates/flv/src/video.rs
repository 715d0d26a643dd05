//! Legacy `VIDEODATA` envelope decoding.
//!
//! Only the control byte is interpreted for every codec. AVC packets get
//! their envelope decoded and checked; other codecs are acknowledged by id.

use std::fmt;

use tracing::debug;

use crate::avc::{AvcPacketType, AvcVideoPacket};
use crate::error::FormatError;
use crate::macros::nutype_enum;

nutype_enum! {
    /// FLV Frame Type
    /// Defined by:
    /// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV File Format - Video tags)
    /// - video_file_format_spec_v10_1.pdf (Annex E.4.3.1 - VIDEODATA)
    pub enum VideoFrameType(u8) {
        KeyFrame = 1,
        InterFrame = 2,
        /// H.263 only.
        DisposableInterFrame = 3,
        /// Reserved for server use.
        GeneratedKeyFrame = 4,
        /// The body is a one-byte [`VideoCommand`] instead of codec data.
        VideoInfoOrCommand = 5,
    }
}

nutype_enum! {
    /// FLV Video Codec ID
    /// Defined by:
    /// - video_file_format_spec_v10.pdf (Chapter 1 - The FLV File Format - Video tags)
    pub enum VideoCodecId(u8) {
        SorensonH263 = 2,
        ScreenVideo = 3,
        On2Vp6 = 4,
        On2Vp6WithAlpha = 5,
        ScreenVideoV2 = 6,
        Avc = 7,
    }
}

nutype_enum! {
    /// Sideband info carried by a video info/command frame.
    pub enum VideoCommand(u8) {
        StartOfClientSideSeek = 0,
        EndOfClientSideSeek = 1,
    }
}

/// One record per video tag, reported in scan order.
///
/// `index` is the 1-based position of the tag among video tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoDiagnostic {
    /// A video info/command frame; nothing else in the tag was parsed.
    Command { index: u64, command: VideoCommand },
    /// A codec whose payload layout is not decoded.
    Acknowledged {
        index: u64,
        frame_type: VideoFrameType,
        codec_id: VideoCodecId,
    },
    /// An AVC packet whose envelope passed validation.
    Avc {
        index: u64,
        frame_type: VideoFrameType,
        packet_type: AvcPacketType,
        composition_time: u32,
        payload_len: usize,
    },
}

impl VideoDiagnostic {
    pub fn index(&self) -> u64 {
        match *self {
            VideoDiagnostic::Command { index, .. }
            | VideoDiagnostic::Acknowledged { index, .. }
            | VideoDiagnostic::Avc { index, .. } => index,
        }
    }
}

impl fmt::Display for VideoDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoDiagnostic::Command { index, command } => {
                let what = match *command {
                    VideoCommand::StartOfClientSideSeek => "Start of client-side seeking video frame sequence",
                    VideoCommand::EndOfClientSideSeek => "End of client-side seeking video frame sequence",
                    _ => "Unknown video command",
                };
                write!(f, "[{index:<10}], {what} ({})", command.0)
            }
            VideoDiagnostic::Acknowledged {
                index,
                frame_type,
                codec_id,
            } => write!(
                f,
                "[{index:<10}], FrameType: {}, CodecID: {}",
                frame_type.0, codec_id.0
            ),
            VideoDiagnostic::Avc {
                index,
                frame_type,
                packet_type,
                composition_time,
                payload_len,
            } => write!(
                f,
                "[{index:<10}], FrameType: {}, CodecID: 7, AVCPacketType: {}, CompositionTime: {composition_time:<5}, VideoDataLen: {payload_len}",
                frame_type.0, packet_type.0
            ),
        }
    }
}

/// Receives video diagnostics as tags are scanned.
pub trait VideoDiagnosticSink {
    fn record(&mut self, diagnostic: VideoDiagnostic);
}

impl VideoDiagnosticSink for Vec<VideoDiagnostic> {
    fn record(&mut self, diagnostic: VideoDiagnostic) {
        self.push(diagnostic);
    }
}

impl<S: VideoDiagnosticSink + ?Sized> VideoDiagnosticSink for &mut S {
    fn record(&mut self, diagnostic: VideoDiagnostic) {
        (**self).record(diagnostic);
    }
}

/// Adapts a closure into a [`VideoDiagnosticSink`].
pub struct SinkFn<F>(pub F);

impl<F: FnMut(VideoDiagnostic)> VideoDiagnosticSink for SinkFn<F> {
    fn record(&mut self, diagnostic: VideoDiagnostic) {
        (self.0)(diagnostic);
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl VideoDiagnosticSink for NullSink {
    fn record(&mut self, _diagnostic: VideoDiagnostic) {}
}

/// Decode the envelope of one video tag payload.
pub fn decode_video_tag(index: u64, data: &[u8]) -> Result<VideoDiagnostic, FormatError> {
    let Some((&control, body)) = data.split_first() else {
        return Err(FormatError::TruncatedStream {
            expected: 1,
            actual: 0,
        });
    };

    let frame_type = VideoFrameType::from(control >> 4);
    let codec_id = VideoCodecId::from(control & 0x0F);

    let diagnostic = if frame_type == VideoFrameType::VideoInfoOrCommand {
        let Some(&command) = body.first() else {
            return Err(FormatError::TruncatedStream {
                expected: 2,
                actual: data.len(),
            });
        };
        VideoDiagnostic::Command {
            index,
            command: VideoCommand::from(command),
        }
    } else if codec_id == VideoCodecId::Avc {
        let packet = AvcVideoPacket::demux(body)?;
        VideoDiagnostic::Avc {
            index,
            frame_type,
            packet_type: packet.packet_type,
            composition_time: packet.composition_time,
            payload_len: packet.data.len(),
        }
    } else {
        VideoDiagnostic::Acknowledged {
            index,
            frame_type,
            codec_id,
        }
    };

    debug!(%diagnostic, "video tag");
    Ok(diagnostic)
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_avc_nalu() {
        let data = [0x17, 0x01, 0x00, 0x00, 0x64, 0xaa];
        let diagnostic = decode_video_tag(1, &data).unwrap();

        assert_eq!(
            diagnostic,
            VideoDiagnostic::Avc {
                index: 1,
                frame_type: VideoFrameType::KeyFrame,
                packet_type: AvcPacketType::Nalu,
                composition_time: 100,
                payload_len: 1,
            }
        );
    }

    #[test]
    fn test_avc_sequence_header_with_composition_time() {
        let data = [0x17, 0x00, 0x00, 0x00, 0x64, 0xaa];
        let err = decode_video_tag(1, &data).unwrap_err();
        assert!(matches!(err, FormatError::CompositionTimeViolation { .. }));
    }

    #[test]
    fn test_avc_too_short() {
        let data = [0x27, 0x01, 0x00, 0x00, 0x00];
        let err = decode_video_tag(3, &data).unwrap_err();
        assert!(matches!(err, FormatError::InvalidAvcPacket { len: 4 }));
    }

    #[test]
    fn test_command_frame_skips_codec_parsing() {
        // Codec 7 with a body far too short for AVC: not an error for a command frame.
        let data = [0x57, 0x01];
        let diagnostic = decode_video_tag(5, &data).unwrap();

        assert_eq!(
            diagnostic,
            VideoDiagnostic::Command {
                index: 5,
                command: VideoCommand::EndOfClientSideSeek,
            }
        );
        assert!(diagnostic.to_string().contains("End of client-side seeking"));
    }

    #[test]
    fn test_command_frame_without_info_byte() {
        let err = decode_video_tag(1, &[0x50]).unwrap_err();
        assert!(matches!(
            err,
            FormatError::TruncatedStream {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_other_codecs_are_acknowledged() {
        for codec in 2u8..=6 {
            let data = [0x20 | codec, 0xde, 0xad];
            let diagnostic = decode_video_tag(1, &data).unwrap();
            assert_eq!(
                diagnostic,
                VideoDiagnostic::Acknowledged {
                    index: 1,
                    frame_type: VideoFrameType::InterFrame,
                    codec_id: VideoCodecId(codec),
                }
            );
        }

        // Unassigned ids are tolerated too.
        let diagnostic = decode_video_tag(1, &[0x1c]).unwrap();
        assert!(matches!(
            diagnostic,
            VideoDiagnostic::Acknowledged { codec_id, .. } if !codec_id.is_known()
        ));
    }

    #[test]
    fn test_empty_payload() {
        let err = decode_video_tag(1, &[]).unwrap_err();
        assert!(matches!(err, FormatError::TruncatedStream { .. }));
    }

    #[test]
    fn test_display_matches_report_format() {
        let diagnostic = VideoDiagnostic::Avc {
            index: 12,
            frame_type: VideoFrameType::InterFrame,
            packet_type: AvcPacketType::Nalu,
            composition_time: 40,
            payload_len: 1024,
        };
        assert_eq!(
            diagnostic.to_string(),
            "[12        ], FrameType: 2, CodecID: 7, AVCPacketType: 1, CompositionTime: 40   , VideoDataLen: 1024"
        );
    }

    #[test]
    fn test_sinks() {
        let mut records: Vec<VideoDiagnostic> = Vec::new();
        let diagnostic = VideoDiagnostic::Command {
            index: 1,
            command: VideoCommand::StartOfClientSideSeek,
        };
        (&mut records).record(diagnostic);
        assert_eq!(records, vec![diagnostic]);

        let mut count = 0;
        SinkFn(|_: VideoDiagnostic| count += 1).record(diagnostic);
        assert_eq!(count, 1);

        NullSink.record(diagnostic);
    }
}
