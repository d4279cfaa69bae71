//! Bulk transfer engine

use tracing::{debug, info, trace, warn};

use ucam_core::{CommandId, DataPacket, Frame, PacketHeader, Reply, TransferMode, checksum};

use crate::{
    camera::Camera,
    config::ChecksumPolicy,
    error::{Error, Result},
    retry::StallBudget,
};

/// Summary of one image transfer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferReport {
    /// Image bytes written to the buffer
    pub received: usize,

    /// Data packets received, 0 for a raw stream
    pub packets: usize,

    /// Ids of packets whose verify code did not match
    pub checksum_mismatches: Vec<u16>,
}

impl TransferReport {
    pub fn is_clean(&self) -> bool {
        self.checksum_mismatches.is_empty()
    }
}

impl Camera {
    /// Fetch the picture announced by [`Camera::snap_picture`]
    ///
    /// `len` is the size from the DATA frame and `buf` must hold at least
    /// that many bytes. JPEG pictures arrive in packets which are verified
    /// and acknowledged one by one; raw pictures arrive as one unframed
    /// stream.
    pub fn get_data(&mut self, len: usize, buf: &mut [u8]) -> Result<TransferReport> {
        self.session.ensure_synchronized()?;

        if !self.session.is_package_size_acknowledged() {
            return Err(Error::PackageSizeNotAcknowledged);
        }
        if len == 0 {
            return Err(Error::MalformedReply("camera announced an empty picture".to_string()));
        }
        if buf.len() < len {
            return Err(Error::BufferTooSmall {
                required: len,
                available: buf.len(),
            });
        }

        let mode = self.session.transfer_mode();
        debug!(?mode, len, "Starting transfer");

        self.transmit(Frame::package_ack(0))?;

        let report = match mode {
            TransferMode::Packetized => self.receive_packets(&mut buf[..len])?,
            TransferMode::RawStream => self.receive_stream(&mut buf[..len])?,
        };

        info!(
            received = report.received,
            packets = report.packets,
            mismatches = report.checksum_mismatches.len(),
            "Transfer complete"
        );
        Ok(report)
    }

    fn receive_packets(&mut self, buf: &mut [u8]) -> Result<TransferReport> {
        let len = buf.len();
        let max_payload = self.session.max_payload();
        let policy = self.config.checksum;
        let layout = self.config.verify_layout;
        let mut budget = self.config.stream_retry.stall_budget("image transfer");

        let mut report = TransferReport::default();
        let mut expected_id: u16 = 1;

        while report.received < len {
            let mut raw = [0u8; PacketHeader::SIZE];
            self.read_budgeted(&mut raw, &mut budget)?;

            let header = PacketHeader::decode(&raw)?;

            if is_transfer_nack(&raw, expected_id) {
                return Err(self.read_transfer_nack(raw, &mut budget)?);
            }

            let size = usize::from(header.len);
            let remaining = len - report.received;

            if header.id != expected_id {
                return Err(Error::MalformedReply(format!(
                    "expected packet {}, got {}",
                    expected_id, header.id
                )));
            }
            if size == 0 || size > max_payload || size > remaining {
                return Err(Error::MalformedReply(format!(
                    "packet {} declares {} bytes ({} allowed, {} remaining)",
                    header.id, size, max_payload, remaining
                )));
            }

            let start = report.received;
            let payload = &mut buf[start..start + size];
            self.read_budgeted(payload, &mut budget)?;

            let mut trailer = [0u8; DataPacket::VERIFY_SIZE];
            self.read_budgeted(&mut trailer, &mut budget)?;

            if policy != ChecksumPolicy::Ignore {
                let expected = checksum::calculate(&raw, payload);
                let received = layout.decode(trailer);

                if expected != received {
                    if policy == ChecksumPolicy::Strict {
                        return Err(Error::ChecksumMismatch {
                            packet_id: header.id,
                            expected,
                            received,
                        });
                    }
                    warn!(
                        packet = header.id,
                        expected = format!("0x{:02X}", expected),
                        received = format!("0x{:02X}", received),
                        "Verify code mismatch"
                    );
                    report.checksum_mismatches.push(header.id);
                }
            }

            report.received += size;
            report.packets += 1;
            trace!(packet = header.id, size, received = report.received, "Packet received");

            let ack = if report.received < len {
                Frame::package_ack(header.id)
            } else {
                Frame::terminal_ack()
            };
            self.transmit(ack)?;

            expected_id = expected_id.wrapping_add(1);
        }

        Ok(report)
    }

    fn receive_stream(&mut self, buf: &mut [u8]) -> Result<TransferReport> {
        let mut budget = self.config.stream_retry.stall_budget("raw stream");
        self.read_budgeted(buf, &mut budget)?;

        self.transmit(Frame::raw_data_ack())?;

        Ok(TransferReport {
            received: buf.len(),
            ..TransferReport::default()
        })
    }

    /// The camera replaced the next packet header with a NACK frame
    fn read_transfer_nack(
        &mut self,
        head: [u8; PacketHeader::SIZE],
        budget: &mut StallBudget,
    ) -> Result<Error> {
        let mut tail = [0u8; 2];
        self.read_budgeted(&mut tail, budget)?;

        let bytes = [head[0], head[1], head[2], head[3], tail[0], tail[1]];
        match Frame::decode(&bytes)?.reply()? {
            Reply::Nack { code, .. } => {
                warn!(%code, "Transfer aborted by camera");
                Ok(Error::Nacked {
                    command: CommandId::Data,
                    code,
                })
            }
            other => Ok(Error::MalformedReply(format!("{:?}", other))),
        }
    }

    /// Fill `buf` from the link, sleeping on empty reads within `budget`
    pub(crate) fn read_budgeted(&mut self, buf: &mut [u8], budget: &mut StallBudget) -> Result<()> {
        let mut filled = 0;

        while filled < buf.len() {
            match self.link.read(&mut buf[filled..])? {
                0 => budget.stalled()?,
                n => {
                    filled += n;
                    budget.progressed();
                }
            }
        }

        Ok(())
    }

    /// Write all of `buf` and flush, sleeping on refused writes within
    /// `budget`
    pub(crate) fn write_budgeted(&mut self, buf: &[u8], budget: &mut StallBudget) -> Result<()> {
        let mut written = 0;

        while written < buf.len() {
            match self.link.write(&buf[written..])? {
                0 => budget.stalled()?,
                n => {
                    written += n;
                    budget.progressed();
                }
            }
        }

        self.link.flush()?;
        Ok(())
    }
}

/// Check if the bytes read in place of packet `expected_id`'s header are a
/// NACK
///
/// Packet id 0x0FAA is encoded as `AA 0F`, the same bytes a NACK starts
/// with, so the marker only counts when it is not the expected header.
fn is_transfer_nack(raw: &[u8; PacketHeader::SIZE], expected_id: u16) -> bool {
    PacketHeader::is_nack_marker(raw) && u16::from_le_bytes([raw[0], raw[1]]) != expected_id
}
