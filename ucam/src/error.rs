//! High-level error types

use ucam_core::CommandId;
use ucam_types::DeviceErrorCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Link error: {0}")]
    Link(#[from] ucam_transport::Error),

    /// The camera never completed the SYNC exchange
    #[error("Sync failed after {attempts} attempts")]
    SyncFailed { attempts: usize },

    /// The camera answered with a NACK; `Data` stands for the image transfer
    #[error("{command} rejected by camera: {code}")]
    Nacked {
        command: CommandId,
        code: DeviceErrorCode,
    },

    #[error("{operation} gave up after {attempts} attempts")]
    MaxRetriesExceeded {
        operation: &'static str,
        attempts: usize,
    },

    #[error("Checksum mismatch in packet {packet_id}: expected 0x{expected:02X}, got 0x{received:02X}")]
    ChecksumMismatch {
        packet_id: u16,
        expected: u8,
        received: u8,
    },

    #[error("{0} is not a configuration command")]
    InvalidCommand(CommandId),

    #[error("Malformed reply from camera: {0}")]
    MalformedReply(String),

    #[error("Camera not synchronized")]
    NotSynchronized,

    #[error("Package size not acknowledged by camera")]
    PackageSizeNotAcknowledged,

    #[error("Buffer too small: need {required} bytes, have {available}")]
    BufferTooSmall { required: usize, available: usize },

    #[error("Core protocol error: {0}")]
    Core(ucam_core::Error),

    #[error("Type error: {0}")]
    Types(#[from] ucam_types::Error),
}

impl From<ucam_core::Error> for Error {
    fn from(err: ucam_core::Error) -> Self {
        match err {
            ucam_core::Error::NotSynchronized => Self::NotSynchronized,
            ucam_core::Error::Types(e) => Self::Types(e),
            other => Self::Core(other),
        }
    }
}

impl Error {
    /// Check if retrying the same operation may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Link(e) => e.is_timeout(),
            Self::MaxRetriesExceeded { .. }
            | Self::ChecksumMismatch { .. }
            | Self::Nacked { .. } => true,
            _ => false,
        }
    }

    /// Check if the camera has to be reset and synchronized again
    pub fn requires_resync(&self) -> bool {
        match self {
            Self::Link(e) => !e.is_timeout(),
            Self::SyncFailed { .. } | Self::NotSynchronized | Self::MalformedReply(_) => true,
            _ => false,
        }
    }
}
