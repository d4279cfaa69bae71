//! Simulated uCAM-III for integration tests
//!
//! Answers frames as they are written, the way the camera does: SYNC after
//! a configurable number of attempts, ACK or NACK for commands, DATA after
//! GET PICTURE and packets or a raw stream once the host acknowledges.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use ucam::{
    CameraConfig, CommandId, DeviceErrorCode, Frame, Link, PictureType, SnapType,
    VerifyCodeLayout,
};
use ucam_core::{DataPacket, FRAME_SIZE, constants::TERMINAL_PACKAGE_ID};

/// What the simulated camera does and what it has seen
#[derive(Debug)]
pub struct State {
    /// SYNC attempt (1-based) the camera first answers; 0 never answers
    pub answer_sync_on: usize,

    /// Picture handed out after GET PICTURE
    pub image: Vec<u8>,

    /// Reply to this command with a NACK instead of an ACK
    pub nack: Option<(CommandId, DeviceErrorCode)>,

    /// Replace this packet with a NACK frame
    pub nack_packet: Option<(u16, DeviceErrorCode)>,

    /// Flip a payload byte of this packet after the verify code is computed
    pub corrupt_packet: Option<u16>,

    /// Send packets with this id offset (0 keeps them in order)
    pub packet_id_offset: u16,

    pub layout: VerifyCodeLayout,

    /// Most bytes one read returns
    pub read_chunk: usize,

    /// Empty reads before each non-empty one while streaming image data
    pub stalls_per_read: usize,

    // Observations
    pub synchronized: bool,
    pub syncs_seen: usize,
    pub frames: Vec<[u8; FRAME_SIZE]>,
    pub package_acks: Vec<u16>,
    pub raw_acks: usize,
    pub package_size: u16,

    pub(crate) outbox: VecDeque<u8>,
    pub(crate) partial: Vec<u8>,
    pub(crate) snap_type: SnapType,
    pub(crate) streaming: bool,
    pub(crate) pending_stalls: usize,
    pub(crate) packets: Vec<DataPacket>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            answer_sync_on: 1,
            image: Vec::new(),
            nack: None,
            nack_packet: None,
            corrupt_packet: None,
            packet_id_offset: 0,
            layout: VerifyCodeLayout::LowByteFirst,
            read_chunk: usize::MAX,
            stalls_per_read: 0,
            synchronized: false,
            syncs_seen: 0,
            frames: Vec::new(),
            package_acks: Vec::new(),
            raw_acks: 0,
            package_size: 512,
            outbox: VecDeque::new(),
            partial: Vec::new(),
            snap_type: SnapType::Jpeg,
            streaming: false,
            pending_stalls: 0,
            packets: Vec::new(),
        }
    }
}

impl State {
    /// Frames of one command the host has written
    pub fn frames_of(&self, command: CommandId) -> usize {
        self.frames
            .iter()
            .filter(|f| f[1] == u8::from(command))
            .count()
    }

    fn reply(&mut self, frame: Frame) {
        self.outbox.extend(frame.encode());
    }

    fn handle(&mut self, bytes: [u8; FRAME_SIZE]) {
        self.frames.push(bytes);

        let Ok(frame) = Frame::decode(&bytes) else {
            return;
        };
        let Some(command) = frame.command_id() else {
            return;
        };
        let p = frame.params;

        match command {
            CommandId::Sync => {
                self.syncs_seen += 1;
                if self.answer_sync_on != 0 && self.syncs_seen >= self.answer_sync_on {
                    self.reply(Frame::ack(CommandId::Sync.into(), 0));
                    self.reply(Frame::sync());
                }
            }
            CommandId::Ack => self.handle_ack(p),
            _ if !self.synchronized => {}
            _ => self.handle_command(command, p),
        }
    }

    fn handle_ack(&mut self, p: [u8; 4]) {
        match p[0] {
            0x0D => self.synchronized = true,
            0x0A => {
                self.raw_acks += 1;
                self.streaming = false;
            }
            0x00 => {
                let id = u16::from_le_bytes([p[2], p[3]]);
                self.package_acks.push(id);

                if id == TERMINAL_PACKAGE_ID {
                    self.streaming = false;
                } else {
                    self.send_packet(usize::from(id));
                }
            }
            _ => {}
        }
    }

    fn handle_command(&mut self, command: CommandId, p: [u8; 4]) {
        if let Some((nacked, code)) = self.nack {
            if nacked == command {
                self.reply(Frame::nack(1, code));
                return;
            }
        }

        match command {
            CommandId::SetPackageSize => self.package_size = u16::from_le_bytes([p[1], p[2]]),
            CommandId::Snapshot => {
                self.snap_type = SnapType::try_from(p[0]).unwrap_or(SnapType::Jpeg)
            }
            _ => {}
        }

        self.reply(Frame::ack(command.into(), 0));

        // full system reset reboots the camera
        if command == CommandId::Reset && p[0] == 0x00 {
            self.synchronized = false;
        }

        if command == CommandId::GetPicture {
            let picture = PictureType::try_from(p[0]).unwrap_or(PictureType::Snapshot);
            let raw = picture == PictureType::Raw
                || (picture == PictureType::Snapshot && self.snap_type == SnapType::Raw);

            self.packets = if raw {
                Vec::new()
            } else {
                DataPacket::split(&self.image, self.package_size)
            };
            self.reply(Frame::data(p[0], self.image.len() as u32));
        }
    }

    /// Queue packet `index` (0-based); a raw picture goes out whole on the
    /// opening ACK
    fn send_packet(&mut self, index: usize) {
        if self.packets.is_empty() {
            if index == 0 {
                self.streaming = true;
                self.pending_stalls = self.stalls_per_read;
                let image = self.image.clone();
                self.outbox.extend(image);
            }
            return;
        }

        let Some(packet) = self.packets.get(index).cloned() else {
            return;
        };

        self.streaming = true;
        self.pending_stalls = self.stalls_per_read;

        if let Some((id, code)) = self.nack_packet {
            if id == packet.id {
                self.reply(Frame::nack(0, code));
                return;
            }
        }

        let mut bytes = DataPacket::new(packet.id + self.packet_id_offset, packet.payload.clone())
            .encode(self.layout);
        if self.corrupt_packet == Some(packet.id) {
            bytes[4] ^= 0x01;
        }
        self.outbox.extend(bytes.iter().copied());
    }
}

/// Link end of the simulated camera
pub struct SimulatedCamera {
    state: Arc<Mutex<State>>,
}

impl SimulatedCamera {
    /// Create a camera and a handle to inspect it after the link moves
    pub fn new(state: State) -> (Self, Arc<Mutex<State>>) {
        let state = Arc::new(Mutex::new(state));
        (Self { state: state.clone() }, state)
    }
}

impl Link for SimulatedCamera {
    fn read(&mut self, buf: &mut [u8]) -> ucam_transport::Result<usize> {
        let mut s = self.state.lock();

        if s.streaming && s.pending_stalls > 0 {
            s.pending_stalls -= 1;
            return Ok(0);
        }

        let n = buf.len().min(s.read_chunk).min(s.outbox.len());
        for (slot, byte) in buf.iter_mut().zip(s.outbox.drain(..n)) {
            *slot = byte;
        }

        if n > 0 && s.streaming {
            s.pending_stalls = s.stalls_per_read;
        }
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> ucam_transport::Result<usize> {
        let mut s = self.state.lock();
        s.partial.extend_from_slice(buf);

        while s.partial.len() >= FRAME_SIZE {
            let mut frame = [0u8; FRAME_SIZE];
            frame.copy_from_slice(&s.partial[..FRAME_SIZE]);
            s.partial.drain(..FRAME_SIZE);
            s.handle(frame);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> ucam_transport::Result<()> {
        Ok(())
    }

    fn name(&self) -> String {
        "simulated".to_string()
    }
}

/// Driver settings with every wait at zero
pub fn fast_config() -> CameraConfig {
    CameraConfig::without_delays()
}

/// Deterministic picture bytes
pub fn image(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
