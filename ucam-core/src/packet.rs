//! JPEG data packet structure and encoding/decoding

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    FRAME_HEADER,
    checksum,
    command::CommandId,
    error::{Error, Result},
};

/// Header in front of every data packet
///
/// # Packet Structure
///
/// ```text
/// ┌─────────────┬─────────────┬─────────────┬─────────────┐
/// │  Packet ID  │ Data Length │  Payload    │ Verify Code │
/// │   2 bytes   │   2 bytes   │   N bytes   │   2 bytes   │
/// │  (LE u16)   │  (LE u16)   │   (bytes)   │             │
/// └─────────────┴─────────────┴─────────────┴─────────────┘
/// ```
///
/// Ids start at 1 and increase by one per packet of the same image.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PacketHeader {
    pub id: u16,
    pub len: u16,
}

impl PacketHeader {
    /// Header size in bytes
    pub const SIZE: usize = 4;

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let [id_lo, id_hi] = self.id.to_le_bytes();
        let [len_lo, len_hi] = self.len.to_le_bytes();
        [id_lo, id_hi, len_lo, len_hi]
    }

    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(Error::FrameTooShort {
                expected: Self::SIZE,
                actual: buf.len(),
            });
        }

        Ok(Self {
            id: u16::from_le_bytes([buf[0], buf[1]]),
            len: u16::from_le_bytes([buf[2], buf[3]]),
        })
    }

    /// Check if the bytes read in place of a header start a NACK frame
    ///
    /// The camera aborts a transfer by sending a NACK where the next packet
    /// would begin; the remaining two bytes follow on the link.
    pub fn is_nack_marker(buf: &[u8]) -> bool {
        buf.len() >= 2 && buf[0] == FRAME_HEADER && buf[1] == u8::from(CommandId::Nack)
    }
}

/// Where the verify code sits in its two byte trailer
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum VerifyCodeLayout {
    /// `[code, 0x00]`, as documented for the camera
    #[default]
    LowByteFirst,
    /// `[0x00, code]`, seen on some firmware
    LowByteLast,
}

impl VerifyCodeLayout {
    pub fn encode(self, code: u8) -> [u8; DataPacket::VERIFY_SIZE] {
        match self {
            Self::LowByteFirst => [code, 0x00],
            Self::LowByteLast => [0x00, code],
        }
    }

    /// Extract the verify code from its trailer
    pub fn decode(self, trailer: [u8; DataPacket::VERIFY_SIZE]) -> u8 {
        match self {
            Self::LowByteFirst => trailer[0],
            Self::LowByteLast => trailer[1],
        }
    }
}

/// One packet of a JPEG transfer
///
/// # Examples
///
/// ```
/// use ucam_core::{DataPacket, VerifyCodeLayout};
///
/// let packet = DataPacket::new(1, vec![0xFF, 0xD8]);
/// let bytes = packet.encode(VerifyCodeLayout::LowByteFirst);
/// assert_eq!(&bytes[..], &[0x01, 0x00, 0x02, 0x00, 0xFF, 0xD8, 0xDA, 0x00]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct DataPacket {
    /// Sequence number, 1 for the first packet
    pub id: u16,

    /// Image bytes carried by this packet
    pub payload: Bytes,
}

impl DataPacket {
    /// Verify code trailer size in bytes
    pub const VERIFY_SIZE: usize = 2;

    /// Bytes of framing around the payload
    pub const OVERHEAD: usize = PacketHeader::SIZE + Self::VERIFY_SIZE;

    pub fn new(id: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// Largest payload a packet of `package_size` bytes can carry
    pub fn max_payload(package_size: u16) -> usize {
        usize::from(package_size).saturating_sub(Self::OVERHEAD)
    }

    pub fn header(&self) -> PacketHeader {
        PacketHeader {
            id: self.id,
            len: self.payload.len() as u16,
        }
    }

    pub fn verify_code(&self) -> u8 {
        checksum::calculate(&self.header().encode(), &self.payload)
    }

    /// Encode packet to bytes
    pub fn encode(&self, layout: VerifyCodeLayout) -> BytesMut {
        let mut buf = BytesMut::with_capacity(Self::OVERHEAD + self.payload.len());

        buf.put_u16_le(self.id);
        buf.put_u16_le(self.payload.len() as u16);
        buf.put_slice(&self.payload);
        buf.put_slice(&layout.encode(self.verify_code()));

        buf
    }

    /// Cut an image into the packets a camera would send for it
    pub fn split(data: &[u8], package_size: u16) -> Vec<DataPacket> {
        let chunk = Self::max_payload(package_size).max(1);

        data.chunks(chunk)
            .enumerate()
            .map(|(i, part)| Self::new(i as u16 + 1, Bytes::copy_from_slice(part)))
            .collect()
    }
}

impl fmt::Debug for DataPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataPacket")
            .field("id", &self.id)
            .field("payload_len", &self.payload.len())
            .field("verify_code", &format!("0x{:02X}", self.verify_code()))
            .finish()
    }
}
