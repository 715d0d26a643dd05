use byteorder::{BigEndian, ReadBytesExt};

use crate::error::FormatError;
use crate::macros::nutype_enum;

nutype_enum! {
    /// FLV AVC Packet Type
    /// Defined in the FLV specification. Chapter 1 - AVCVIDEODATA
    pub enum AvcPacketType(u8) {
        /// Payload is an AVCDecoderConfigurationRecord.
        SequenceHeader = 0,
        /// Payload is one or more length-prefixed NAL units.
        Nalu = 1,
        /// Payload is empty.
        EndOfSequence = 2,
    }
}

/// The envelope of an `AVCVIDEOPACKET`, borrowing its payload.
///
/// The payload is not interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvcVideoPacket<'a> {
    pub packet_type: AvcPacketType,
    /// Presentation offset in milliseconds. Only meaningful for NAL units and
    /// zero for every other packet type.
    pub composition_time: u32,
    pub data: &'a [u8],
}

impl<'a> AvcVideoPacket<'a> {
    /// Decode the packet from the video tag body that follows the control
    /// byte.
    pub fn demux(body: &'a [u8]) -> Result<Self, FormatError> {
        if body.len() <= 4 {
            return Err(FormatError::InvalidAvcPacket { len: body.len() });
        }

        let mut reader = body;
        let packet_type = AvcPacketType::from(reader.read_u8()?);
        let composition_time = reader.read_u24::<BigEndian>()?;

        if packet_type != AvcPacketType::Nalu && composition_time != 0 {
            return Err(FormatError::CompositionTimeViolation {
                packet_type: packet_type.0,
                composition_time,
            });
        }

        Ok(AvcVideoPacket {
            packet_type,
            composition_time,
            data: reader,
        })
    }
}
