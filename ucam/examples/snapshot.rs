//! JPEG snapshot example
//!
//! UCAM_PORT=/dev/ttyUSB0 UCAM_BAUD=115200 cargo run --example snapshot -- out.jpg

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use ucam::{BaudRate, Camera, JpegResolution, SerialLink};

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
    let output = std::env::args().nth(1).unwrap_or_else(|| "snapshot.jpg".to_string());

    let mut camera = Camera::open(&port, baud).with_context(|| format!("opening {}", port))?;
    camera = with_reset_pin(camera)?;

    camera.session_mut().set_jpeg_resolution(JpegResolution::W640H480);
    camera.session_mut().set_package_size(512)?;

    camera.sync().context("camera did not synchronize")?;

    let image = camera.capture()?;
    println!("{}", image);

    std::fs::write(&output, &image.data).with_context(|| format!("writing {}", output))?;
    println!("Saved to {}", output);

    camera.close()?;
    Ok(())
}

#[cfg(feature = "rppal")]
fn with_reset_pin(camera: Camera) -> anyhow::Result<Camera> {
    match std::env::var("UCAM_RESET_PIN") {
        Ok(pin) => {
            let pin = pin.parse().context("UCAM_RESET_PIN is not a pin number")?;
            Ok(camera.with_reset_pin(pin)?)
        }
        Err(_) => Ok(camera),
    }
}

#[cfg(not(feature = "rppal"))]
fn with_reset_pin(camera: Camera) -> anyhow::Result<Camera> {
    if std::env::var("UCAM_RESET_PIN").is_ok() {
        tracing::warn!("UCAM_RESET_PIN ignored, built without the rppal feature");
    }
    Ok(camera)
}
