//! Error codes reported by the camera inside a NACK frame

use std::fmt;

/// Device error code (fifth byte of a NACK frame)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeviceErrorCode {
    PictureType,
    PictureUpScale,
    PictureScale,
    UnexpectedReply,
    SendPictureTimeout,
    UnexpectedCommand,
    SramJpegType,
    SramJpegSize,
    PictureFormat,
    PictureSize,
    Parameter,
    SendRegisterTimeout,
    CommandId,
    PictureNotReady,
    TransferPackageNumber,
    SetTransferPackageSize,
    CommandHeader,
    CommandLength,
    SendPicture,
    SendCommand,
    /// Code not listed in the datasheet
    Unknown(u8),
}

impl DeviceErrorCode {
    pub fn code(self) -> u8 {
        match self {
            Self::PictureType => 0x01,
            Self::PictureUpScale => 0x02,
            Self::PictureScale => 0x03,
            Self::UnexpectedReply => 0x04,
            Self::SendPictureTimeout => 0x05,
            Self::UnexpectedCommand => 0x06,
            Self::SramJpegType => 0x07,
            Self::SramJpegSize => 0x08,
            Self::PictureFormat => 0x09,
            Self::PictureSize => 0x0A,
            Self::Parameter => 0x0B,
            Self::SendRegisterTimeout => 0x0C,
            Self::CommandId => 0x0D,
            Self::PictureNotReady => 0x0F,
            Self::TransferPackageNumber => 0x10,
            Self::SetTransferPackageSize => 0x11,
            Self::CommandHeader => 0xF0,
            Self::CommandLength => 0xF1,
            Self::SendPicture => 0xF5,
            Self::SendCommand => 0xFF,
            Self::Unknown(code) => code,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::PictureType => "picture type error",
            Self::PictureUpScale => "picture up-scale error",
            Self::PictureScale => "picture scale error",
            Self::UnexpectedReply => "unexpected reply",
            Self::SendPictureTimeout => "send picture timeout",
            Self::UnexpectedCommand => "unexpected command",
            Self::SramJpegType => "SRAM JPEG type error",
            Self::SramJpegSize => "SRAM JPEG size error",
            Self::PictureFormat => "picture format error",
            Self::PictureSize => "picture size error",
            Self::Parameter => "parameter error",
            Self::SendRegisterTimeout => "send register timeout",
            Self::CommandId => "command ID error",
            Self::PictureNotReady => "picture not ready",
            Self::TransferPackageNumber => "transfer package number error",
            Self::SetTransferPackageSize => "set transfer package size error",
            Self::CommandHeader => "command header error",
            Self::CommandLength => "command length error",
            Self::SendPicture => "send picture error",
            Self::SendCommand => "send command error",
            Self::Unknown(_) => "unknown error",
        }
    }
}

impl From<u8> for DeviceErrorCode {
    fn from(code: u8) -> Self {
        match code {
            0x01 => Self::PictureType,
            0x02 => Self::PictureUpScale,
            0x03 => Self::PictureScale,
            0x04 => Self::UnexpectedReply,
            0x05 => Self::SendPictureTimeout,
            0x06 => Self::UnexpectedCommand,
            0x07 => Self::SramJpegType,
            0x08 => Self::SramJpegSize,
            0x09 => Self::PictureFormat,
            0x0A => Self::PictureSize,
            0x0B => Self::Parameter,
            0x0C => Self::SendRegisterTimeout,
            0x0D => Self::CommandId,
            0x0F => Self::PictureNotReady,
            0x10 => Self::TransferPackageNumber,
            0x11 => Self::SetTransferPackageSize,
            0xF0 => Self::CommandHeader,
            0xF1 => Self::CommandLength,
            0xF5 => Self::SendPicture,
            0xFF => Self::SendCommand,
            other => Self::Unknown(other),
        }
    }
}

impl From<DeviceErrorCode> for u8 {
    fn from(code: DeviceErrorCode) -> u8 {
        code.code()
    }
}

impl fmt::Display for DeviceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.description(), self.code())
    }
}
