//! Command engine: send a frame, classify the reply, retry within budget

use tracing::{debug, info, trace};

use ucam_core::{CommandId, FRAME_SIZE, Frame, Reply, ResetType};
use ucam_transport::Error as LinkError;
use ucam_types::BaudRate;

use crate::{
    camera::Camera,
    error::{Error, Result},
    retry::Attempt,
};

impl Camera {
    /// Send a command and wait for the ACK echoing it
    ///
    /// A NACK fails at once with [`Error::Nacked`]. Timeouts and unrelated
    /// replies retry the whole exchange.
    pub fn send_with_ack(&mut self, frame: Frame) -> Result<()> {
        self.session.ensure_synchronized()?;
        self.exchange(frame)
    }

    /// Send a frame the camera does not answer
    pub fn send_without_ack(&mut self, frame: Frame) -> Result<()> {
        self.session.ensure_synchronized()?;
        self.transmit(frame)
    }

    /// Push one configuration command built from the session
    ///
    /// Only INIT, SET PACKAGE SIZE, RESET (state machine), LIGHT and CBE are
    /// accepted; anything else fails with [`Error::InvalidCommand`] without
    /// touching the link.
    pub fn configure(&mut self, command: CommandId) -> Result<()> {
        if !command.is_configuration() {
            return Err(Error::InvalidCommand(command));
        }
        self.session.ensure_synchronized()?;

        let s = &self.session;
        let frame = match command {
            CommandId::Init => Frame::init(s.format(), s.raw_resolution(), s.jpeg_resolution()),
            CommandId::SetPackageSize => Frame::set_package_size(s.package_size()),
            CommandId::Reset => Frame::reset(ResetType::StateMachine),
            CommandId::Light => Frame::light(s.light_frequency()),
            CommandId::Cbe => Frame::cbe(s.controls()),
            other => return Err(Error::InvalidCommand(other)),
        };

        self.exchange(frame)?;

        if command == CommandId::SetPackageSize {
            self.session.mark_package_size_acknowledged();
        }

        debug!(%command, "Configuration applied");
        Ok(())
    }

    /// Switch the camera to another baud rate and follow with the host port
    pub fn set_baud_rate(&mut self, baud: BaudRate) -> Result<()> {
        self.send_with_ack(Frame::set_baud_rate(baud))?;
        self.session.set_baud_rate(baud);

        match self.link.set_baud_rate(baud.bits_per_second()) {
            Ok(()) => info!(%baud, "Baud rate changed"),
            Err(LinkError::Unsupported(_)) => {
                debug!(%baud, "Camera switched, link cannot be retuned")
            }
            Err(e) => return Err(e.into()),
        }

        Ok(())
    }

    /// Set the idle timeout after which the camera sleeps, 0 disables it
    pub fn set_sleep_timeout(&mut self, seconds: u8) -> Result<()> {
        self.send_with_ack(Frame::sleep(seconds))
    }

    pub(crate) fn exchange(&mut self, frame: Frame) -> Result<()> {
        let command = CommandId::try_from(frame.command)?;
        let policy = self.config.command_retry;

        debug!(%command, "Sending command");

        policy.run(command.name(), |attempt| {
            if !self.write_frame(&frame)? {
                return Ok(Attempt::Retry);
            }

            match self.read_reply()? {
                Some(Reply::Nack { code, .. }) => Err(Error::Nacked { command, code }),
                Some(reply) if reply.is_ack_for(command) => Ok(Attempt::Done(())),
                other => {
                    trace!(%command, attempt, reply = ?other, "No ACK");
                    Ok(Attempt::Retry)
                }
            }
        })
    }

    pub(crate) fn transmit(&mut self, frame: Frame) -> Result<()> {
        let command = CommandId::try_from(frame.command)?;
        let policy = self.config.command_retry;

        policy.run(command.name(), |_| {
            Ok(if self.write_frame(&frame)? {
                Attempt::Done(())
            } else {
                Attempt::Retry
            })
        })
    }

    /// Write a frame; `false` if the link accepted none of it
    ///
    /// Once part of the frame is on the line the rest is pushed within the
    /// stream stall budget, so a retry never resends a frame's head.
    pub(crate) fn write_frame(&mut self, frame: &Frame) -> Result<bool> {
        let bytes = frame.encode();

        match self.link.write_exact(&bytes) {
            Ok(()) => Ok(true),
            Err(LinkError::Timeout { received: 0, .. }) => Ok(false),
            Err(LinkError::Timeout { received, .. }) => {
                trace!(written = received, "Finishing partial frame write");
                let mut budget = self.config.stream_retry.stall_budget("frame write");
                self.write_budgeted(&bytes[received..], &mut budget)?;
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read and classify one frame; `None` if nothing arrived or the
    /// header is broken
    ///
    /// A frame that has started is read to its end within the stream stall
    /// budget; dropping its head would misalign every later reply.
    pub(crate) fn read_reply(&mut self) -> Result<Option<Reply>> {
        let mut buf = [0u8; FRAME_SIZE];

        match self.link.read_exact(&mut buf) {
            Ok(()) => {}
            Err(LinkError::Timeout { received: 0, .. }) => return Ok(None),
            Err(LinkError::Timeout { received, .. }) => {
                trace!(received, "Finishing partial frame read");
                let mut budget = self.config.stream_retry.stall_budget("frame read");
                self.read_budgeted(&mut buf[received..], &mut budget)?;
            }
            Err(e) => return Err(e.into()),
        }

        match Frame::decode(&buf)?.reply() {
            Ok(reply) => Ok(Some(reply)),
            Err(ucam_core::Error::InvalidHeader(header)) => {
                trace!(header = format!("0x{:02X}", header), "Discarding frame");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
