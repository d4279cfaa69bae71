//! uCAM-III command frame encoding/decoding

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use ucam_types::{
    BaudRate, DeviceErrorCode, ImageControls, ImageFormat, JpegResolution, LightFrequency,
    PictureType, RawResolution, SnapType,
};

use crate::{
    FRAME_HEADER,
    FRAME_SIZE,
    command::{CommandId, ResetType},
    constants::{PACKAGE_SIZE_MARKER, TERMINAL_PACKAGE_ID},
    error::{Error, Result},
};

/// Six byte command frame
///
/// # Frame Structure
///
/// ```text
/// ┌────────┬─────────┬──────┬──────┬──────┬──────┐
/// │ Header │ Command │  P1  │  P2  │  P3  │  P4  │
/// │  0xAA  │ 1 byte  │  1   │  1   │  1   │  1   │
/// └────────┴─────────┴──────┴──────┴──────┴──────┘
/// ```
///
/// Decoding keeps every byte as received; [`Frame::reply`] interprets it.
///
/// # Examples
///
/// ```
/// use ucam_core::{CommandId, Frame};
///
/// let frame = Frame::sync();
/// assert_eq!(frame.encode(), [0xAA, 0x0D, 0x00, 0x00, 0x00, 0x00]);
///
/// let decoded = Frame::decode(&frame.encode()).unwrap();
/// assert_eq!(decoded.command_id(), Some(CommandId::Sync));
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Marker byte, 0xAA on every valid frame
    pub header: u8,

    /// Raw command id
    pub command: u8,

    /// Command specific parameters
    pub params: [u8; 4],
}

/// A frame received from the camera, classified by command
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Positive acknowledgement of `command`
    Ack {
        command: u8,
        counter: u8,
        package_id: u16,
    },

    /// Command rejected with a device error code
    Nack { counter: u8, code: DeviceErrorCode },

    /// Picture ready, `length` bytes follow once acknowledged
    Data { data_type: u8, length: u32 },

    /// Camera side SYNC during the handshake
    Sync,

    /// Well formed frame with a command the host never expects back
    Other(Frame),
}

impl Reply {
    /// Check if this is an ACK echoing `command`
    pub fn is_ack_for(&self, command: CommandId) -> bool {
        matches!(self, Self::Ack { command: c, .. } if *c == u8::from(command))
    }
}

impl Frame {
    /// Build a frame from a command id and its parameters
    pub fn new(command: CommandId, params: [u8; 4]) -> Self {
        Self::from_raw(command.into(), params)
    }

    /// Build a frame without checking the command byte
    pub fn from_raw(command: u8, params: [u8; 4]) -> Self {
        Self {
            header: FRAME_HEADER,
            command,
            params,
        }
    }

    /// Encode frame to its wire bytes
    pub fn encode(&self) -> [u8; FRAME_SIZE] {
        let [p1, p2, p3, p4] = self.params;
        [self.header, self.command, p1, p2, p3, p4]
    }

    /// Decode the first six bytes of `buf`
    ///
    /// # Errors
    ///
    /// Returns [`Error::FrameTooShort`] if fewer than six bytes are given.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < FRAME_SIZE {
            return Err(Error::FrameTooShort {
                expected: FRAME_SIZE,
                actual: buf.len(),
            });
        }

        Ok(Self {
            header: buf[0],
            command: buf[1],
            params: [buf[2], buf[3], buf[4], buf[5]],
        })
    }

    pub fn has_valid_header(&self) -> bool {
        self.header == FRAME_HEADER
    }

    pub fn command_id(&self) -> Option<CommandId> {
        CommandId::try_from(self.command).ok()
    }

    /// Classify a frame received from the camera
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the marker byte is wrong.
    pub fn reply(&self) -> Result<Reply> {
        if !self.has_valid_header() {
            return Err(Error::InvalidHeader(self.header));
        }

        let p = self.params;
        let reply = match self.command_id() {
            Some(CommandId::Ack) => Reply::Ack {
                command: p[0],
                counter: p[1],
                package_id: u16::from_le_bytes([p[2], p[3]]),
            },
            Some(CommandId::Nack) => Reply::Nack {
                counter: p[1],
                code: DeviceErrorCode::from(p[2]),
            },
            Some(CommandId::Data) => Reply::Data {
                data_type: p[0],
                length: LittleEndian::read_u24(&p[1..]),
            },
            Some(CommandId::Sync) => Reply::Sync,
            _ => Reply::Other(*self),
        };

        Ok(reply)
    }

    // Host to camera

    pub fn sync() -> Self {
        Self::new(CommandId::Sync, [0; 4])
    }

    /// ACK for `command`, carrying `package_id` in the last two bytes
    pub fn ack(command: u8, package_id: u16) -> Self {
        let [lo, hi] = package_id.to_le_bytes();
        Self::new(CommandId::Ack, [command, 0x00, lo, hi])
    }

    /// Reply to the camera's SYNC that completes the handshake
    pub fn sync_ack() -> Self {
        Self::ack(CommandId::Sync.into(), 0)
    }

    /// Request package `id` during a JPEG transfer (0 opens the transfer)
    pub fn package_ack(id: u16) -> Self {
        Self::ack(0x00, id)
    }

    /// Closes a JPEG transfer
    pub fn terminal_ack() -> Self {
        Self::package_ack(TERMINAL_PACKAGE_ID)
    }

    /// Closes a raw transfer
    pub fn raw_data_ack() -> Self {
        Self::new(CommandId::Ack, [CommandId::Data.into(), 0x00, 0x01, 0x00])
    }

    pub fn init(format: ImageFormat, raw: RawResolution, jpeg: JpegResolution) -> Self {
        Self::new(CommandId::Init, [0x00, format.into(), raw.into(), jpeg.into()])
    }

    pub fn set_package_size(size: u16) -> Self {
        let [lo, hi] = size.to_le_bytes();
        Self::new(CommandId::SetPackageSize, [PACKAGE_SIZE_MARKER, lo, hi, 0x00])
    }

    pub fn snapshot(snap: SnapType, skip_frames: u16) -> Self {
        let [lo, hi] = skip_frames.to_le_bytes();
        Self::new(CommandId::Snapshot, [snap.into(), lo, hi, 0x00])
    }

    pub fn get_picture(picture: PictureType) -> Self {
        Self::new(CommandId::GetPicture, [picture.into(), 0x00, 0x00, 0x00])
    }

    pub fn reset(kind: ResetType) -> Self {
        Self::new(CommandId::Reset, [kind.into(), 0x00, 0x00, 0x00])
    }

    pub fn light(freq: LightFrequency) -> Self {
        Self::new(CommandId::Light, [freq.into(), 0x00, 0x00, 0x00])
    }

    pub fn cbe(controls: ImageControls) -> Self {
        Self::new(
            CommandId::Cbe,
            [
                controls.contrast.into(),
                controls.brightness.into(),
                controls.exposure.into(),
                0x00,
            ],
        )
    }

    pub fn set_baud_rate(baud: BaudRate) -> Self {
        let (div1, div2) = baud.dividers();
        Self::new(CommandId::SetBaudRate, [div1, div2, 0x00, 0x00])
    }

    /// SLEEP with a timeout in seconds, 0 disables sleep
    pub fn sleep(timeout_secs: u8) -> Self {
        Self::new(CommandId::Sleep, [timeout_secs, 0x00, 0x00, 0x00])
    }

    // Camera to host

    pub fn nack(counter: u8, code: DeviceErrorCode) -> Self {
        Self::new(CommandId::Nack, [0x00, counter, code.into(), 0x00])
    }

    /// DATA announcement; lengths above 24 bits are truncated
    pub fn data(data_type: u8, length: u32) -> Self {
        let mut params = [data_type, 0, 0, 0];
        LittleEndian::write_u24(&mut params[1..], length & 0x00FF_FFFF);
        Self::new(CommandId::Data, params)
    }
}

impl From<Frame> for [u8; FRAME_SIZE] {
    fn from(frame: Frame) -> Self {
        frame.encode()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command_id() {
            Some(cmd) => write!(f, "Frame[{}]{:02X?}", cmd.name(), self.params),
            None => write!(f, "Frame[0x{:02X}]{:02X?}", self.command, self.params),
        }
    }
}
