//! Session state for one camera connection
//!
//! A session tracks:
//! - The capture configuration pushed to the camera (format, resolutions,
//!   picture and snap type, package size, skip frames, image controls)
//! - Whether the camera acknowledged the current package size
//! - Link synchronization state

use ucam_types::{
    BaudRate, ImageControls, ImageFormat, JpegResolution, Level, LightFrequency, PictureType,
    RawResolution, SnapType,
};

use crate::{
    constants::{DEFAULT_PACKAGE_SIZE, MAX_PACKAGE_SIZE, MIN_PACKAGE_SIZE},
    error::{Error, Result},
    packet::DataPacket,
};

/// Link synchronization state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// No handshake yet, or the link was lost
    #[default]
    Unsynchronized,

    /// Hard reset in progress
    Resetting,

    /// SYNC frames being exchanged
    Handshaking,

    /// Handshake complete, commands may be sent
    Synchronized,
}

/// How image bytes arrive after the DATA frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// JPEG in id-numbered packets, each acknowledged
    Packetized,

    /// Uncompressed bytes with no framing, one ACK at the end
    RawStream,
}

/// Session configuration and state
///
/// Owned by a single camera; every mutation goes through `&mut self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    baud_rate: BaudRate,
    format: ImageFormat,
    raw_resolution: RawResolution,
    jpeg_resolution: JpegResolution,
    picture_type: PictureType,
    snap_type: SnapType,
    package_size: u16,
    skip_frames: u16,
    controls: ImageControls,
    light_frequency: LightFrequency,
    sync_state: SyncState,
    package_size_acknowledged: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Create an unsynchronized session with the camera's power-up defaults
    pub fn new() -> Self {
        Self {
            baud_rate: BaudRate::default(),
            format: ImageFormat::default(),
            raw_resolution: RawResolution::default(),
            jpeg_resolution: JpegResolution::default(),
            picture_type: PictureType::default(),
            snap_type: SnapType::default(),
            package_size: DEFAULT_PACKAGE_SIZE,
            skip_frames: 0,
            controls: ImageControls::default(),
            light_frequency: LightFrequency::default(),
            sync_state: SyncState::Unsynchronized,
            package_size_acknowledged: false,
        }
    }

    // Configuration

    pub fn baud_rate(&self) -> BaudRate {
        self.baud_rate
    }

    /// Record the rate the camera was switched to
    pub fn set_baud_rate(&mut self, baud: BaudRate) {
        self.baud_rate = baud;
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn set_format(&mut self, format: ImageFormat) {
        self.format = format;
    }

    pub fn raw_resolution(&self) -> RawResolution {
        self.raw_resolution
    }

    pub fn set_raw_resolution(&mut self, res: RawResolution) {
        self.raw_resolution = res;
    }

    pub fn jpeg_resolution(&self) -> JpegResolution {
        self.jpeg_resolution
    }

    pub fn set_jpeg_resolution(&mut self, res: JpegResolution) {
        self.jpeg_resolution = res;
    }

    pub fn picture_type(&self) -> PictureType {
        self.picture_type
    }

    pub fn set_picture_type(&mut self, picture: PictureType) {
        self.picture_type = picture;
    }

    pub fn snap_type(&self) -> SnapType {
        self.snap_type
    }

    pub fn set_snap_type(&mut self, snap: SnapType) {
        self.snap_type = snap;
    }

    pub fn package_size(&self) -> u16 {
        self.package_size
    }

    /// Set the transfer package size
    ///
    /// The camera has to acknowledge the new size again before the next
    /// snapshot; setting the current value keeps the acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageSizeOutOfRange`] outside 64..=512.
    pub fn set_package_size(&mut self, size: u16) -> Result<()> {
        if !(MIN_PACKAGE_SIZE..=MAX_PACKAGE_SIZE).contains(&size) {
            return Err(Error::PackageSizeOutOfRange {
                size,
                min: MIN_PACKAGE_SIZE,
                max: MAX_PACKAGE_SIZE,
            });
        }

        if size != self.package_size {
            self.package_size = size;
            self.package_size_acknowledged = false;
        }

        Ok(())
    }

    pub fn skip_frames(&self) -> u16 {
        self.skip_frames
    }

    pub fn set_skip_frames(&mut self, frames: u16) {
        self.skip_frames = frames;
    }

    pub fn controls(&self) -> ImageControls {
        self.controls
    }

    pub fn set_controls(&mut self, controls: ImageControls) {
        self.controls = controls;
    }

    pub fn set_contrast(&mut self, level: u8) -> Result<()> {
        self.controls.contrast = Level::new(level)?;
        Ok(())
    }

    pub fn set_brightness(&mut self, level: u8) -> Result<()> {
        self.controls.brightness = Level::new(level)?;
        Ok(())
    }

    pub fn set_exposure(&mut self, level: u8) -> Result<()> {
        self.controls.exposure = Level::new(level)?;
        Ok(())
    }

    pub fn light_frequency(&self) -> LightFrequency {
        self.light_frequency
    }

    pub fn set_light_frequency(&mut self, freq: LightFrequency) {
        self.light_frequency = freq;
    }

    // Derived values

    /// Transfer mode implied by the picture and snap type
    pub fn transfer_mode(&self) -> TransferMode {
        match (self.picture_type, self.snap_type) {
            (PictureType::Snapshot, SnapType::Jpeg) | (PictureType::Jpeg, _) => {
                TransferMode::Packetized
            }
            (PictureType::Snapshot, SnapType::Raw) | (PictureType::Raw, _) => {
                TransferMode::RawStream
            }
        }
    }

    /// Largest payload of one data packet at the current package size
    pub fn max_payload(&self) -> usize {
        DataPacket::max_payload(self.package_size)
    }

    /// Width and height of the picture the next transfer will deliver
    pub fn image_dimensions(&self) -> (u16, u16) {
        match self.transfer_mode() {
            TransferMode::Packetized => self.jpeg_resolution.dimensions(),
            TransferMode::RawStream => self.raw_resolution.dimensions(),
        }
    }

    // Package size acknowledgement

    pub fn is_package_size_acknowledged(&self) -> bool {
        self.package_size_acknowledged
    }

    pub fn mark_package_size_acknowledged(&mut self) {
        self.package_size_acknowledged = true;
    }

    // Synchronization

    pub fn sync_state(&self) -> SyncState {
        self.sync_state
    }

    pub fn is_synchronized(&self) -> bool {
        self.sync_state == SyncState::Synchronized
    }

    /// Fail unless the handshake has completed
    pub fn ensure_synchronized(&self) -> Result<()> {
        if self.is_synchronized() {
            Ok(())
        } else {
            Err(Error::NotSynchronized)
        }
    }

    /// Enter the reset phase; valid from any state
    pub fn begin_reset(&mut self) {
        self.sync_state = SyncState::Resetting;
        self.package_size_acknowledged = false;
    }

    /// Start exchanging SYNC frames
    pub fn begin_handshake(&mut self) -> Result<()> {
        match self.sync_state {
            SyncState::Unsynchronized | SyncState::Resetting => {
                self.sync_state = SyncState::Handshaking;
                Ok(())
            }
            state => Err(Error::InvalidSessionState(format!(
                "Cannot start handshake from state: {:?}",
                state
            ))),
        }
    }

    /// Mark the handshake complete
    pub fn mark_synchronized(&mut self) -> Result<()> {
        if self.sync_state != SyncState::Handshaking {
            return Err(Error::InvalidSessionState(format!(
                "Cannot synchronize from state: {:?}",
                self.sync_state
            )));
        }

        self.sync_state = SyncState::Synchronized;
        Ok(())
    }

    /// Drop synchronization after a failed handshake or on close
    pub fn desynchronize(&mut self) {
        self.sync_state = SyncState::Unsynchronized;
        self.package_size_acknowledged = false;
    }
}
