//! Protocol constants

/// Package size the driver negotiates unless told otherwise
pub const DEFAULT_PACKAGE_SIZE: u16 = 512;

/// Smallest package size the camera accepts
pub const MIN_PACKAGE_SIZE: u16 = 64;

/// Largest package size the camera accepts
pub const MAX_PACKAGE_SIZE: u16 = 512;

/// First parameter of SET PACKAGE SIZE
pub const PACKAGE_SIZE_MARKER: u8 = 0x08;

/// Package id echoed in the ACK that closes a JPEG transfer
pub const TERMINAL_PACKAGE_ID: u16 = 0xF0F0;

/// Handshake attempts before giving up (datasheet: up to 60 SYNCs)
pub const SYNC_ATTEMPTS: usize = 60;
