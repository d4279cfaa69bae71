//! Type definitions for ucam
//!
//! Device vocabulary shared by the protocol core and the driver: image
//! formats and resolutions, picture and snapshot types, the baud divider
//! table, image controls and the error codes the camera reports in a NACK.

pub mod baud;
pub mod controls;
pub mod device_error;
pub mod error;
pub mod image;

pub use baud::BaudRate;
pub use controls::{ImageControls, Level, LightFrequency};
pub use device_error::DeviceErrorCode;
pub use error::{Error, Result};
pub use image::{Image, ImageFormat, JpegResolution, PictureType, RawResolution, SnapType};
