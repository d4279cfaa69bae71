//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Nothing arrived within the read window; `received` bytes were kept
    #[error("Read timeout: got {received} of {expected} bytes")]
    Timeout { expected: usize, received: usize },

    #[error("Operation not supported by this link: {0}")]
    Unsupported(&'static str),

    #[error("Invalid port name: {0:?}")]
    InvalidPortName(String),

    #[cfg(feature = "serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[cfg(feature = "rppal")]
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),
}

impl Error {
    /// Soft timeouts are short reads, not link failures
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
