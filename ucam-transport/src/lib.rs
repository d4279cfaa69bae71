//! Transport layer for the uCAM-III
//!
//! Provides blocking byte links (serial port, any `Read + Write`) and the
//! optional hardware reset line.

pub mod error;
#[cfg(feature = "rppal")]
pub mod gpio;
pub mod io;
#[cfg(feature = "serial")]
pub mod serial;

pub use error::{Error, Result};
#[cfg(feature = "rppal")]
pub use gpio::GpioResetLine;
pub use io::IoLink;
#[cfg(feature = "serial")]
pub use serial::SerialLink;

use std::thread;
use std::time::Duration;

use tracing::trace;

/// Blocking byte link to the camera
///
/// Implementations report a read window that elapsed without data as
/// `Ok(0)`. The provided `read_exact` turns that into [`Error::Timeout`] so
/// callers can apply their own retry budget; only hard failures surface as
/// [`Error::Io`].
pub trait Link: Send {
    /// Read whatever is available, at most `buf.len()` bytes
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write some prefix of `buf`
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    fn flush(&mut self) -> Result<()>;

    /// Discard bytes received but not read yet
    fn clear_input(&mut self) -> Result<()> {
        Ok(())
    }

    /// Retune the host side of the link
    fn set_baud_rate(&mut self, _bits_per_second: u32) -> Result<()> {
        Err(Error::Unsupported("set_baud_rate"))
    }

    /// Name used in logs
    fn name(&self) -> String;

    /// Fill `buf` completely, issuing as many reads as it takes
    ///
    /// An empty read ends the call with [`Error::Timeout`]; the first
    /// `received` bytes of `buf` then hold what did arrive, so the caller
    /// can finish the read instead of losing frame alignment.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut received = 0;

        while received < buf.len() {
            match self.read(&mut buf[received..])? {
                0 => {
                    return Err(Error::Timeout {
                        expected: buf.len(),
                        received,
                    });
                }
                n => received += n,
            }
        }

        trace!(link = %self.name(), bytes = format!("{:02X?}", buf), "RX");
        Ok(())
    }

    /// Write all of `buf` and flush
    ///
    /// A write that accepts nothing ends the call with [`Error::Timeout`],
    /// `received` counting the bytes already on the line.
    fn write_exact(&mut self, buf: &[u8]) -> Result<()> {
        let mut written = 0;

        while written < buf.len() {
            match self.write(&buf[written..])? {
                0 => {
                    return Err(Error::Timeout {
                        expected: buf.len(),
                        received: written,
                    });
                }
                n => written += n,
            }
        }

        self.flush()?;
        trace!(link = %self.name(), bytes = format!("{:02X?}", buf), "TX");
        Ok(())
    }
}

impl<L: Link + ?Sized> Link for Box<L> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn clear_input(&mut self) -> Result<()> {
        (**self).clear_input()
    }

    fn set_baud_rate(&mut self, bits_per_second: u32) -> Result<()> {
        (**self).set_baud_rate(bits_per_second)
    }

    fn name(&self) -> String {
        (**self).name()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }

    fn write_exact(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_exact(buf)
    }
}

/// Hardware reset input of the camera (active low)
pub trait ResetLine: Send {
    fn set_low(&mut self) -> Result<()>;

    fn set_high(&mut self) -> Result<()>;

    /// Hold the camera in reset for `hold`, then release it
    fn pulse(&mut self, hold: Duration) -> Result<()> {
        self.set_low()?;
        thread::sleep(hold);
        self.set_high()
    }
}

/// Map a read/write error to "nothing transferred" when it only means the
/// port's timeout window elapsed
pub(crate) fn idle_as_zero(err: std::io::Error) -> Result<usize> {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => Ok(0),
        _ => Err(Error::Io(err)),
    }
}
