//! # ucam-core
//!
//! Core protocol implementation for the uCAM-III serial camera.
//!
//! This crate provides the low-level protocol primitives:
//! - Command frame encoding/decoding and reply classification
//! - Data packet framing for JPEG transfers
//! - Verify code calculation
//! - Command definitions
//! - Session state

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod frame;
pub mod packet;
pub mod session;

pub use command::{CommandId, ResetType};
pub use error::{Error, Result};
pub use frame::{Frame, Reply};
pub use packet::{DataPacket, PacketHeader, VerifyCodeLayout};
pub use session::{Session, SyncState, TransferMode};

/// Size of every command, ACK, NACK and DATA frame
pub const FRAME_SIZE: usize = 6;

/// Marker byte that starts every command frame
pub const FRAME_HEADER: u8 = 0xAA;
