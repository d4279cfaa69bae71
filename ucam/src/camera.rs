//! High-level camera interface

use std::fmt;

use tracing::{info, warn};

use ucam_core::Session;
use ucam_transport::{Link, ResetLine};

use crate::{
    config::{CameraConfig, ChecksumPolicy, HandshakeConfig},
    error::Result,
    retry::RetryPolicy,
};

/// uCAM-III camera
///
/// Owns the link, the optional reset line and the session. Every
/// operation takes `&mut self`, so one camera is driven by one caller at
/// a time.
///
/// # Examples
///
/// ```no_run
/// use ucam::{BaudRate, Camera};
///
/// fn main() -> ucam::Result<()> {
///     let mut camera = Camera::open("/dev/ttyUSB0", BaudRate::B115200)?;
///
///     camera.sync()?;
///     let image = camera.capture()?;
///     println!("{}", image);
///
///     camera.close()
/// }
/// ```
pub struct Camera {
    pub(crate) link: Box<dyn Link>,
    pub(crate) reset_line: Option<Box<dyn ResetLine>>,
    pub(crate) session: Session,
    pub(crate) config: CameraConfig,
    closed: bool,
}

impl Camera {
    /// Create a camera over an open link
    ///
    /// Without a reset line, resets are sent as RESET commands.
    pub fn new(link: impl Link + 'static) -> Self {
        Self {
            link: Box::new(link),
            reset_line: None,
            session: Session::new(),
            config: CameraConfig::default(),
            closed: false,
        }
    }

    /// Open a serial port and create a camera on it
    ///
    /// `baud` must be one of the rates the camera detects on its own after
    /// power up ([`BaudRate::NATIVE`](ucam_types::BaudRate::NATIVE)); switch
    /// to others with `set_baud_rate` once synchronized.
    #[cfg(feature = "serial")]
    pub fn open(path: &str, baud: ucam_types::BaudRate) -> Result<Self> {
        if !baud.is_native() {
            return Err(ucam_types::Error::UnsupportedBaudRate(baud.bits_per_second()).into());
        }

        let link = ucam_transport::SerialLink::open(path, baud.bits_per_second())?;
        let mut camera = Self::new(link);
        camera.session.set_baud_rate(baud);
        Ok(camera)
    }

    /// Drive resets through a hardware line
    pub fn with_reset_line(mut self, line: impl ResetLine + 'static) -> Self {
        self.reset_line = Some(Box::new(line));
        self
    }

    /// Claim BCM GPIO `pin` as the reset line
    #[cfg(feature = "rppal")]
    pub fn with_reset_pin(self, pin: u8) -> Result<Self> {
        let line = ucam_transport::GpioResetLine::new(pin)?;
        Ok(self.with_reset_line(line))
    }

    pub fn with_config(mut self, config: CameraConfig) -> Self {
        self.config = config;
        self
    }

    /// Set retry budget of commands and DATA polling
    pub fn with_command_retry(mut self, policy: RetryPolicy) -> Self {
        self.config.command_retry = policy;
        self
    }

    /// Set stall budget of image transfers
    pub fn with_stream_retry(mut self, policy: RetryPolicy) -> Self {
        self.config.stream_retry = policy;
        self
    }

    pub fn with_handshake(mut self, handshake: HandshakeConfig) -> Self {
        self.config.handshake = handshake;
        self
    }

    pub fn with_checksum_policy(mut self, policy: ChecksumPolicy) -> Self {
        self.config.checksum = policy;
        self
    }

    pub fn with_verify_layout(mut self, layout: ucam_core::VerifyCodeLayout) -> Self {
        self.config.verify_layout = layout;
        self
    }

    /// Start from an existing session configuration
    ///
    /// Sync state is not carried over.
    pub fn with_session(mut self, mut session: Session) -> Self {
        session.desynchronize();
        self.session = session;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Change capture settings; they reach the camera on the next
    /// `configure` or `snap_picture`
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn is_synchronized(&self) -> bool {
        self.session.is_synchronized()
    }

    pub fn has_reset_line(&self) -> bool {
        self.reset_line.is_some()
    }

    pub fn link_name(&self) -> String {
        self.link.name()
    }

    /// Release the camera
    ///
    /// Pulses the reset line if there is one and clears synchronization.
    /// Calling it again does nothing.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        info!(link = %self.link.name(), "Closing camera");
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        self.session.desynchronize();

        if let Some(line) = self.reset_line.as_mut() {
            line.pulse(self.config.handshake.reset_hold)?;
        }

        Ok(())
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        if self.closed {
            return;
        }

        warn!(link = %self.link.name(), "Camera dropped without close");
        if let Err(e) = self.release() {
            warn!("Failed to release camera: {}", e);
        }
    }
}

impl fmt::Debug for Camera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Camera")
            .field("link", &self.link.name())
            .field("reset_line", &self.reset_line.is_some())
            .field("session", &self.session)
            .field("config", &self.config)
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::Error, test_support::MockLink};

    #[cfg(feature = "serial")]
    #[test]
    fn test_open_rejects_rate_camera_cannot_detect() {
        assert!(matches!(
            Camera::open("/dev/ucam-does-not-exist", ucam_types::BaudRate::B3686400),
            Err(Error::Types(ucam_types::Error::UnsupportedBaudRate(3_686_400)))
        ));
    }

    #[cfg(feature = "serial")]
    #[test]
    fn test_open_native_rate_reaches_the_port() {
        assert!(matches!(
            Camera::open("/dev/ucam-does-not-exist", ucam_types::BaudRate::B57600),
            Err(Error::Link(_))
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut link = MockLink::new();
        link.expect_name().return_const("mock".to_string());

        let mut camera = Camera::new(link);
        camera.close().unwrap();
        camera.close().unwrap();
        assert!(!camera.is_synchronized());
    }
}
