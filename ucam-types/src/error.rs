pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Level {0} is outside the 0..=4 scale")]
    InvalidLevel(u8),

    #[error("Unknown {kind} code: 0x{code:02X}")]
    UnknownCode { kind: &'static str, code: u8 },

    #[error("Baud rate {0} is not supported by the camera")]
    UnsupportedBaudRate(u32),
}
