//! Reset and SYNC handshake

use std::thread;

use tracing::{debug, info, trace, warn};

use ucam_core::{CommandId, Frame, Reply, ResetType};

use crate::{
    camera::Camera,
    error::{Error, Result},
    retry::Attempt,
};

impl Camera {
    /// Reset the camera and establish frame alignment
    ///
    /// Runs the hard reset, waits for power-up, then sends SYNC until the
    /// camera answers ACK + SYNC, which is acknowledged in turn. Fails with
    /// [`Error::SyncFailed`] once every attempt went unanswered; the camera
    /// then stays unusable until the next successful `sync`.
    pub fn sync(&mut self) -> Result<()> {
        info!(link = %self.link.name(), "Synchronizing camera");

        let result = self.run_sync();
        if result.is_err() {
            self.session.desynchronize();
        }
        result
    }

    /// Reset the camera through the reset line, or a full-system RESET
    /// command if there is none
    ///
    /// The camera has to be synchronized again afterwards.
    pub fn hard_reset(&mut self) -> Result<()> {
        self.session.begin_reset();
        let result = self.reset_device();
        self.session.desynchronize();
        result
    }

    /// Send RESET to a synchronized camera
    ///
    /// A full system reset reboots the camera and drops synchronization; a
    /// state machine reset only aborts the current operation.
    pub fn soft_reset(&mut self, kind: ResetType) -> Result<()> {
        self.send_with_ack(Frame::reset(kind))?;

        if kind == ResetType::FullSystem {
            self.session.desynchronize();
        }
        Ok(())
    }

    fn run_sync(&mut self) -> Result<()> {
        let handshake = self.config.handshake;

        self.session.begin_reset();
        match self.reset_device() {
            Ok(()) => {}
            Err(e @ (Error::MaxRetriesExceeded { .. } | Error::Nacked { .. })) => {
                warn!("Reset not acknowledged, continuing with SYNC: {}", e);
            }
            Err(e) => return Err(e),
        }

        thread::sleep(handshake.power_up_delay);
        self.link.clear_input()?;
        self.session.begin_handshake()?;

        let result = handshake
            .retry_policy()
            .run("SYNC", |attempt| self.sync_attempt(attempt));

        match result {
            Ok(()) => {
                self.session.mark_synchronized()?;
                info!("Camera synchronized");
                thread::sleep(handshake.settle_delay);
                Ok(())
            }
            Err(Error::MaxRetriesExceeded { operation: "SYNC", attempts }) => {
                warn!(attempts, "Camera did not answer SYNC");
                Err(Error::SyncFailed { attempts })
            }
            Err(e) => Err(e),
        }
    }

    fn sync_attempt(&mut self, attempt: usize) -> Result<Attempt<()>> {
        trace!(attempt, "SYNC");

        if !self.write_frame(&Frame::sync())? {
            return Ok(Attempt::Retry);
        }

        match self.read_reply()? {
            Some(reply) if reply.is_ack_for(CommandId::Sync) => {}
            _ => return Ok(Attempt::Retry),
        }

        match self.read_reply()? {
            Some(Reply::Sync) => {}
            other => {
                debug!(attempt, reply = ?other, "ACK without SYNC");
                return Ok(Attempt::Retry);
            }
        }

        Ok(if self.write_frame(&Frame::sync_ack())? {
            debug!(attempt, "SYNC acknowledged");
            Attempt::Done(())
        } else {
            Attempt::Retry
        })
    }

    fn reset_device(&mut self) -> Result<()> {
        let hold = self.config.handshake.reset_hold;

        if let Some(line) = self.reset_line.as_mut() {
            debug!(?hold, "Pulsing reset line");
            line.pulse(hold)?;
            return Ok(());
        }

        debug!("No reset line, sending RESET");
        self.exchange(Frame::reset(ResetType::FullSystem))
    }
}
