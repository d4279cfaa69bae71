//! Raw GRAY8 capture example
//!
//! Writes the 80x60 frame as a binary PGM.
//!
//! UCAM_PORT=/dev/ttyUSB0 cargo run --example raw_capture -- frame.pgm

use std::io::Write;

use anyhow::{Context, ensure};
use tracing_subscriber::EnvFilter;
use ucam::{BaudRate, Camera, ImageFormat, RawResolution, SerialLink, SnapType};

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = match std::env::var("UCAM_PORT") {
        Ok(port) => port,
        Err(_) => SerialLink::available_ports()?
            .into_iter()
            .next()
            .context("no serial port found, set UCAM_PORT")?,
    };
    let baud = match std::env::var("UCAM_BAUD") {
        Ok(bps) => {
            BaudRate::from_bits_per_second(bps.parse().context("UCAM_BAUD is not a number")?)?
        }
        Err(_) => BaudRate::B115200,
    };
    let output = std::env::args().nth(1).unwrap_or_else(|| "frame.pgm".to_string());

    let mut camera = Camera::open(&port, baud).with_context(|| format!("opening {}", port))?;

    let session = camera.session_mut();
    session.set_format(ImageFormat::Gray8);
    session.set_raw_resolution(RawResolution::W80H60);
    session.set_snap_type(SnapType::Raw);

    camera.sync().context("camera did not synchronize")?;

    let len = camera.snap_picture()?;
    let expected = RawResolution::W80H60.frame_len(ImageFormat::Gray8).unwrap_or(len);
    ensure!(len == expected, "camera announced {} bytes, expected {}", len, expected);

    let mut buf = vec![0u8; len];
    let report = camera.get_data(len, &mut buf)?;
    println!("Received {} bytes", report.received);

    let (width, height) = RawResolution::W80H60.dimensions();
    let mut file = std::fs::File::create(&output).with_context(|| format!("creating {}", output))?;
    write!(file, "P5\n{} {}\n255\n", width, height)?;
    file.write_all(&buf)?;
    println!("Saved to {}", output);

    camera.close()?;
    Ok(())
}
