//! # ucam
//!
//! Host-side driver for the 4D Systems uCAM-III serial camera.
//!
//! ## Features
//!
//! - Reset and SYNC handshake with linear backoff
//! - Command/ACK/NACK exchange with bounded retry
//! - JPEG snapshots in verified packets, raw pictures as one stream
//! - Blocking API over any [`Link`]: serial port, pipe or test double
//!
//! ## Quick Start
//!
//! ```no_run
//! use ucam::{BaudRate, Camera, ImageFormat, JpegResolution};
//!
//! fn main() -> ucam::Result<()> {
//!     let mut camera = Camera::open("/dev/ttyUSB0", BaudRate::B115200)?;
//!     camera.session_mut().set_format(ImageFormat::Jpeg);
//!     camera.session_mut().set_jpeg_resolution(JpegResolution::W320H240);
//!
//!     camera.sync()?;
//!
//!     let len = camera.snap_picture()?;
//!     let mut buf = vec![0u8; len];
//!     let report = camera.get_data(len, &mut buf)?;
//!     println!("{} bytes in {} packets", report.received, report.packets);
//!
//!     camera.close()
//! }
//! ```

pub mod camera;
pub mod capture;
pub mod command;
pub mod config;
pub mod error;
pub mod handshake;
pub mod retry;
pub mod transfer;

// Re-exports
pub use camera::Camera;
pub use config::{CameraConfig, ChecksumPolicy, HandshakeConfig};
pub use error::{Error, Result};
pub use retry::{Attempt, RetryPolicy};
pub use transfer::TransferReport;

pub use ucam_core::{
    CommandId, Frame, ResetType, Session, SyncState, TransferMode, VerifyCodeLayout,
};
pub use ucam_transport::{IoLink, Link, ResetLine};
pub use ucam_types::{
    BaudRate, DeviceErrorCode, Image, ImageControls, ImageFormat, JpegResolution, Level,
    LightFrequency, PictureType, RawResolution, SnapType,
};

#[cfg(feature = "serial")]
pub use ucam_transport::SerialLink;

#[cfg(feature = "rppal")]
pub use ucam_transport::GpioResetLine;

#[cfg(test)]
pub(crate) mod test_support {
    use mockall::mock;

    mock! {
        pub Link {}

        impl ucam_transport::Link for Link {
            fn read(&mut self, buf: &mut [u8]) -> ucam_transport::Result<usize>;
            fn write(&mut self, buf: &[u8]) -> ucam_transport::Result<usize>;
            fn flush(&mut self) -> ucam_transport::Result<()>;
            fn clear_input(&mut self) -> ucam_transport::Result<()>;
            fn set_baud_rate(&mut self, bits_per_second: u32) -> ucam_transport::Result<()>;
            fn name(&self) -> String;
        }
    }

    mock! {
        pub ResetLine {}

        impl ucam_transport::ResetLine for ResetLine {
            fn set_low(&mut self) -> ucam_transport::Result<()>;
            fn set_high(&mut self) -> ucam_transport::Result<()>;
        }
    }
}
