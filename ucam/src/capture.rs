//! Capture sequencer: configure, snapshot, wait for DATA

use tracing::{debug, info};

use ucam_core::{CommandId, Frame, Reply, TransferMode};
use ucam_types::{Image, ImageFormat, PictureType};

use crate::{
    camera::Camera,
    error::{Error, Result},
    retry::Attempt,
};

impl Camera {
    /// Take a picture and return its size in bytes
    ///
    /// Sends INIT and SET PACKAGE SIZE from the session, then SNAPSHOT
    /// (snapshot picture type only) and GET PICTURE, and waits for the DATA
    /// frame announcing the picture. The bytes are fetched with
    /// [`Camera::get_data`].
    pub fn snap_picture(&mut self) -> Result<usize> {
        self.session.ensure_synchronized()?;

        self.configure(CommandId::Init)?;
        self.configure(CommandId::SetPackageSize)?;

        let picture = self.session.picture_type();
        if picture == PictureType::Snapshot {
            let frame = Frame::snapshot(self.session.snap_type(), self.session.skip_frames());
            self.exchange(frame)?;
            debug!(
                snap = ?self.session.snap_type(),
                skip = self.session.skip_frames(),
                "Snapshot taken"
            );
        }

        self.exchange(Frame::get_picture(picture))?;

        let len = self.wait_for_data(picture)?;
        info!(?picture, len, "Picture ready");
        Ok(len)
    }

    /// Snap a picture and fetch it in one go
    pub fn capture(&mut self) -> Result<Image> {
        let len = self.snap_picture()?;

        let mut data = vec![0u8; len];
        let report = self.get_data(len, &mut data)?;
        data.truncate(report.received);

        let format = match self.session.transfer_mode() {
            TransferMode::Packetized => ImageFormat::Jpeg,
            TransferMode::RawStream => self.session.format(),
        };

        Ok(Image::new(data, format, self.session.image_dimensions()))
    }

    fn wait_for_data(&mut self, picture: PictureType) -> Result<usize> {
        let expected = u8::from(picture);
        let policy = self.config.command_retry;

        policy.run("DATA", |attempt| match self.read_reply()? {
            Some(Reply::Data { data_type, length }) if data_type == expected => {
                Ok(Attempt::Done(length as usize))
            }
            Some(Reply::Nack { code, .. }) => Err(Error::Nacked {
                command: CommandId::GetPicture,
                code,
            }),
            other => {
                debug!(attempt, reply = ?other, "Waiting for DATA");
                Ok(Attempt::Retry)
            }
        })
    }
}
