//! Image format, resolution and picture selectors
//!
//! The codes are the parameter bytes the camera expects in INIT, SNAPSHOT
//! and GET PICTURE.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// Colour setting sent as the second INIT parameter
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ImageFormat {
    /// Raw, 8-bit luminance only
    Gray8 = 0x03,
    /// Raw, 16-bit 565 RGB
    Rgb565 = 0x06,
    /// Compressed JPEG
    #[default]
    Jpeg = 0x07,
    /// Raw, 16-bit YCbCr 4:2:2 with bytes reversed
    CrYCbY = 0x08,
}

impl ImageFormat {
    /// Bytes per pixel of an uncompressed frame, `None` for JPEG
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            Self::Gray8 => Some(1),
            Self::Rgb565 | Self::CrYCbY => Some(2),
            Self::Jpeg => None,
        }
    }

    pub fn is_raw(self) -> bool {
        self.bytes_per_pixel().is_some()
    }
}

impl From<ImageFormat> for u8 {
    fn from(format: ImageFormat) -> u8 {
        format as u8
    }
}

impl TryFrom<u8> for ImageFormat {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x03 => Ok(Self::Gray8),
            0x06 => Ok(Self::Rgb565),
            0x07 => Ok(Self::Jpeg),
            0x08 => Ok(Self::CrYCbY),
            code => Err(Error::UnknownCode { kind: "image format", code }),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gray8 => "GRAY8",
            Self::Rgb565 => "RGB565",
            Self::Jpeg => "JPEG",
            Self::CrYCbY => "CrYCbY",
        };
        f.write_str(name)
    }
}

/// Resolution of an uncompressed picture (third INIT parameter)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RawResolution {
    W80H60 = 0x01,
    #[default]
    W160H120 = 0x03,
    W128H128 = 0x09,
    W128H96 = 0x0B,
}

impl RawResolution {
    /// Width and height in pixels
    pub fn dimensions(self) -> (u16, u16) {
        match self {
            Self::W80H60 => (80, 60),
            Self::W160H120 => (160, 120),
            Self::W128H128 => (128, 128),
            Self::W128H96 => (128, 96),
        }
    }

    /// Size of one uncompressed frame in the given format
    ///
    /// Returns `None` for JPEG, whose size is only known after the snapshot.
    pub fn frame_len(self, format: ImageFormat) -> Option<usize> {
        let (w, h) = self.dimensions();
        format
            .bytes_per_pixel()
            .map(|bpp| usize::from(w) * usize::from(h) * bpp)
    }
}

impl From<RawResolution> for u8 {
    fn from(res: RawResolution) -> u8 {
        res as u8
    }
}

impl TryFrom<u8> for RawResolution {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::W80H60),
            0x03 => Ok(Self::W160H120),
            0x09 => Ok(Self::W128H128),
            0x0B => Ok(Self::W128H96),
            code => Err(Error::UnknownCode { kind: "raw resolution", code }),
        }
    }
}

/// Resolution of a JPEG picture (fourth INIT parameter)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum JpegResolution {
    W160H128 = 0x03,
    W320H240 = 0x05,
    #[default]
    W640H480 = 0x07,
}

impl JpegResolution {
    /// Width and height in pixels
    pub fn dimensions(self) -> (u16, u16) {
        match self {
            Self::W160H128 => (160, 128),
            Self::W320H240 => (320, 240),
            Self::W640H480 => (640, 480),
        }
    }
}

impl From<JpegResolution> for u8 {
    fn from(res: JpegResolution) -> u8 {
        res as u8
    }
}

impl TryFrom<u8> for JpegResolution {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x03 => Ok(Self::W160H128),
            0x05 => Ok(Self::W320H240),
            0x07 => Ok(Self::W640H480),
            code => Err(Error::UnknownCode { kind: "JPEG resolution", code }),
        }
    }
}

/// Picture requested by GET PICTURE
///
/// `Snapshot` fetches the frame held by a preceding SNAPSHOT command, the
/// other two grab a live preview frame directly.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PictureType {
    #[default]
    Snapshot = 0x01,
    Raw = 0x02,
    Jpeg = 0x05,
}

impl From<PictureType> for u8 {
    fn from(pic: PictureType) -> u8 {
        pic as u8
    }
}

impl TryFrom<u8> for PictureType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Snapshot),
            0x02 => Ok(Self::Raw),
            0x05 => Ok(Self::Jpeg),
            code => Err(Error::UnknownCode { kind: "picture type", code }),
        }
    }
}

/// Frame kind the camera holds after SNAPSHOT
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum SnapType {
    #[default]
    Jpeg = 0x00,
    Raw = 0x01,
}

impl From<SnapType> for u8 {
    fn from(snap: SnapType) -> u8 {
        snap as u8
    }
}

impl TryFrom<u8> for SnapType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x00 => Ok(Self::Jpeg),
            0x01 => Ok(Self::Raw),
            code => Err(Error::UnknownCode { kind: "snap type", code }),
        }
    }
}

/// A picture retrieved from the camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Image bytes exactly as the camera sent them
    pub data: Vec<u8>,

    /// Format the camera was initialized with
    pub format: ImageFormat,

    /// Width and height in pixels
    pub dimensions: (u16, u16),

    /// When the transfer completed
    pub captured_at: DateTime<Utc>,
}

impl Image {
    pub fn new(data: Vec<u8>, format: ImageFormat, dimensions: (u16, u16)) -> Self {
        Self {
            data,
            format,
            dimensions,
            captured_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Image[{} {}x{}, {} bytes, {}]",
            self.format,
            self.dimensions.0,
            self.dimensions.1,
            self.data.len(),
            self.captured_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
