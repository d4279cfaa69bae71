//! Snapshot and image transfer against a simulated camera

mod support;

use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use support::{SimulatedCamera, State, fast_config, image, init_tracing};
use ucam::{
    Camera, ChecksumPolicy, CommandId, DeviceErrorCode, Error, ImageFormat, PictureType,
    RawResolution, SnapType, VerifyCodeLayout,
};

fn synced(state: State) -> (Camera, Arc<Mutex<State>>) {
    let (link, state) = SimulatedCamera::new(state);
    let mut camera = Camera::new(link).with_config(fast_config());
    camera.sync().unwrap();
    (camera, state)
}

#[test]
fn jpeg_snapshot_end_to_end() {
    init_tracing();
    let picture = image(1000);
    let (mut camera, state) = synced(State {
        image: picture.clone(),
        ..State::default()
    });

    let len = camera.snap_picture().unwrap();
    assert_eq!(len, 1000);

    let mut buf = vec![0u8; len];
    let report = camera.get_data(len, &mut buf).unwrap();

    assert_eq!(report.received, 1000);
    assert_eq!(report.packets, 2);
    assert!(report.is_clean());
    assert_eq!(buf, picture);

    let s = state.lock();
    assert_eq!(s.package_size, 512);
    // opening ACK, ACK for packet 1, terminal ACK after packet 2
    assert_eq!(s.package_acks, vec![0x0000, 0x0001, 0xF0F0]);
    assert_eq!(s.frames_of(CommandId::Snapshot), 1);
}

#[test]
fn jpeg_packets_reassemble_in_order_with_short_reads() {
    let picture = image(2000);
    let (mut camera, state) = synced(State {
        image: picture.clone(),
        read_chunk: 7,
        ..State::default()
    });
    camera.session_mut().set_package_size(128).unwrap();

    let captured = camera.capture().unwrap();

    assert_eq!(captured.data, picture);
    assert_eq!(captured.format, ImageFormat::Jpeg);
    assert_eq!(captured.dimensions, (640, 480));

    // 2000 bytes in 122-byte payloads: 16 full packets and one of 48
    let s = state.lock();
    assert_eq!(s.package_size, 128);
    assert_eq!(s.package_acks.len(), 18);
    assert_eq!(s.package_acks[16], 16);
    assert_eq!(s.package_acks.last(), Some(&0xF0F0));
}

#[test]
fn checksum_mismatch_is_advisory_by_default() {
    let picture = image(1000);
    let (mut camera, _state) = synced(State {
        image: picture.clone(),
        corrupt_packet: Some(2),
        ..State::default()
    });

    let len = camera.snap_picture().unwrap();
    let mut buf = vec![0u8; len];
    let report = camera.get_data(len, &mut buf).unwrap();

    assert_eq!(report.received, 1000);
    assert_eq!(report.checksum_mismatches, vec![2]);
    assert_ne!(buf, picture);
}

#[test]
fn checksum_mismatch_aborts_when_strict() {
    let (link, _state) = SimulatedCamera::new(State {
        image: image(1000),
        corrupt_packet: Some(1),
        ..State::default()
    });
    let mut camera = Camera::new(link)
        .with_config(fast_config())
        .with_checksum_policy(ChecksumPolicy::Strict);
    camera.sync().unwrap();

    let len = camera.snap_picture().unwrap();
    let mut buf = vec![0u8; len];

    assert!(matches!(
        camera.get_data(len, &mut buf),
        Err(Error::ChecksumMismatch { packet_id: 1, .. })
    ));
}

#[test]
fn checksum_ignored_when_disabled() {
    let (link, _state) = SimulatedCamera::new(State {
        image: image(600),
        corrupt_packet: Some(1),
        ..State::default()
    });
    let mut camera = Camera::new(link)
        .with_config(fast_config())
        .with_checksum_policy(ChecksumPolicy::Ignore);
    camera.sync().unwrap();

    let len = camera.snap_picture().unwrap();
    let mut buf = vec![0u8; len];
    let report = camera.get_data(len, &mut buf).unwrap();

    assert!(report.is_clean());
}

#[test]
fn verify_code_in_high_byte() {
    let picture = image(700);
    let (link, _state) = SimulatedCamera::new(State {
        image: picture.clone(),
        layout: VerifyCodeLayout::LowByteLast,
        ..State::default()
    });
    let mut camera = Camera::new(link)
        .with_config(fast_config())
        .with_verify_layout(VerifyCodeLayout::LowByteLast);
    camera.sync().unwrap();

    let captured = camera.capture().unwrap();
    assert_eq!(captured.data, picture);
}

#[test]
fn nack_during_transfer_aborts() {
    let (mut camera, _state) = synced(State {
        image: image(1500),
        nack_packet: Some((2, DeviceErrorCode::TransferPackageNumber)),
        ..State::default()
    });

    let len = camera.snap_picture().unwrap();
    let mut buf = vec![0u8; len];

    assert!(matches!(
        camera.get_data(len, &mut buf),
        Err(Error::Nacked {
            command: CommandId::Data,
            code: DeviceErrorCode::TransferPackageNumber,
        })
    ));
}

#[test]
fn out_of_sequence_packet_is_malformed() {
    let (mut camera, _state) = synced(State {
        image: image(1000),
        packet_id_offset: 1,
        ..State::default()
    });

    let len = camera.snap_picture().unwrap();
    let mut buf = vec![0u8; len];

    assert!(matches!(
        camera.get_data(len, &mut buf),
        Err(Error::MalformedReply(_))
    ));
}

#[test]
fn nack_on_snapshot_fails_capture() {
    let (mut camera, state) = synced(State {
        image: image(100),
        nack: Some((CommandId::Snapshot, DeviceErrorCode::PictureNotReady)),
        ..State::default()
    });

    let result = camera.snap_picture();

    assert!(matches!(
        result,
        Err(Error::Nacked {
            command: CommandId::Snapshot,
            code: DeviceErrorCode::PictureNotReady,
        })
    ));
    assert_eq!(state.lock().frames_of(CommandId::Snapshot), 1);
    assert_eq!(state.lock().frames_of(CommandId::GetPicture), 0);
}

#[test]
fn preview_jpeg_skips_snapshot() {
    let picture = image(300);
    let (mut camera, state) = synced(State {
        image: picture.clone(),
        ..State::default()
    });
    camera.session_mut().set_picture_type(PictureType::Jpeg);

    let captured = camera.capture().unwrap();

    assert_eq!(captured.data, picture);
    assert_eq!(state.lock().frames_of(CommandId::Snapshot), 0);
}

fn raw_camera(
    len: usize,
    read_chunk: usize,
    stalls_per_read: usize,
) -> (Camera, Arc<Mutex<State>>) {
    let (mut camera, state) = synced(State {
        image: image(len),
        read_chunk,
        stalls_per_read,
        ..State::default()
    });
    let session = camera.session_mut();
    session.set_format(ImageFormat::Gray8);
    session.set_raw_resolution(RawResolution::W80H60);
    session.set_snap_type(SnapType::Raw);
    (camera, state)
}

#[test]
fn raw_stream_completes_within_budget() {
    let (mut camera, state) = raw_camera(4800, 1024, 9);

    let len = camera.snap_picture().unwrap();
    assert_eq!(len, 4800);

    let mut buf = vec![0u8; len];
    let report = camera.get_data(len, &mut buf).unwrap();

    assert_eq!(report.received, 4800);
    assert_eq!(report.packets, 0);
    assert_eq!(buf, image(4800));

    let s = state.lock();
    assert_eq!(s.raw_acks, 1);
    assert_eq!(s.package_acks, vec![0]);
}

#[test]
fn raw_stream_stalls_past_budget() {
    let (mut camera, state) = raw_camera(4800, 1024, 10);

    let len = camera.snap_picture().unwrap();
    let mut buf = vec![0u8; len];

    assert!(matches!(
        camera.get_data(len, &mut buf),
        Err(Error::MaxRetriesExceeded { attempts: 10, .. })
    ));
    assert_eq!(state.lock().raw_acks, 0);
}

#[test]
fn raw_capture_reports_format_and_size() {
    let (mut camera, _state) = raw_camera(4800, 4800, 0);

    let captured = camera.capture().unwrap();

    assert_eq!(captured.format, ImageFormat::Gray8);
    assert_eq!(captured.dimensions, (80, 60));
    assert_eq!(captured.len(), RawResolution::W80H60.frame_len(ImageFormat::Gray8).unwrap());
}
