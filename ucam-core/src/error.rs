//! Error types for ucam-core

/// Result type alias for ucam-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Buffer is too short to hold a frame
    #[error("Frame too short: expected {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// Frame does not start with the 0xAA marker
    #[error("Invalid frame header: 0x{0:02X}")]
    InvalidHeader(u8),

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Package size outside what the camera accepts
    #[error("Package size {size} out of range ({min}..={max})")]
    PackageSizeOutOfRange {
        size: u16,
        min: u16,
        max: u16,
    },

    /// Invalid session state transition
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),

    /// Command issued before the handshake completed
    #[error("Session not synchronized - run the sync handshake first")]
    NotSynchronized,

    /// Invalid device parameter
    #[error(transparent)]
    Types(#[from] ucam_types::Error),
}
