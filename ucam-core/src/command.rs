//! uCAM-III command definitions

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command ids
///
/// The second byte of every frame. Requests go from host to camera,
/// `Ack`, `Nack`, `Data` and `Sync` also travel the other way.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandId {
    // Capture setup
    Init = 0x01,
    GetPicture = 0x04,
    Snapshot = 0x05,
    SetPackageSize = 0x06,
    SetBaudRate = 0x07,
    Reset = 0x08,

    // Link control
    Data = 0x0A,
    Sync = 0x0D,
    Ack = 0x0E,
    Nack = 0x0F,

    // Image controls
    Light = 0x13,
    Cbe = 0x14,
    Sleep = 0x15,
}

impl CommandId {
    /// Commands `configure` may push from session state
    pub fn is_configuration(self) -> bool {
        matches!(
            self,
            Self::Init | Self::SetPackageSize | Self::Reset | Self::Light | Self::Cbe
        )
    }

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "INITIAL",
            Self::GetPicture => "GET_PICTURE",
            Self::Snapshot => "SNAPSHOT",
            Self::SetPackageSize => "SET_PACKAGE_SIZE",
            Self::SetBaudRate => "SET_BAUD_RATE",
            Self::Reset => "RESET",
            Self::Data => "DATA",
            Self::Sync => "SYNC",
            Self::Ack => "ACK",
            Self::Nack => "NAK",
            Self::Light => "LIGHT",
            Self::Cbe => "CONTRAST_BRIGHTNESS_EXPOSURE",
            Self::Sleep => "SLEEP",
        }
    }
}

impl From<CommandId> for u8 {
    fn from(cmd: CommandId) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for CommandId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Init),
            0x04 => Ok(Self::GetPicture),
            0x05 => Ok(Self::Snapshot),
            0x06 => Ok(Self::SetPackageSize),
            0x07 => Ok(Self::SetBaudRate),
            0x08 => Ok(Self::Reset),
            0x0A => Ok(Self::Data),
            0x0D => Ok(Self::Sync),
            0x0E => Ok(Self::Ack),
            0x0F => Ok(Self::Nack),
            0x13 => Ok(Self::Light),
            0x14 => Ok(Self::Cbe),
            0x15 => Ok(Self::Sleep),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// Scope of a RESET command
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ResetType {
    /// Reboot the whole module
    FullSystem = 0x00,
    /// Only return the command state machine to idle
    StateMachine = 0x01,
}

impl From<ResetType> for u8 {
    fn from(kind: ResetType) -> u8 {
        kind as u8
    }
}
