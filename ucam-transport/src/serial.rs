//! Serial port link

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use crate::{
    Link,
    error::{Error, Result},
    idle_as_zero,
};

/// UART link to the camera, 8-N-1 without flow control
pub struct SerialLink {
    port: Box<dyn SerialPort>,
}

impl SerialLink {
    /// Per-read window; a read that sees nothing in this time returns empty
    pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

    /// Open a serial device
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ucam_transport::SerialLink;
    ///
    /// let link = SerialLink::open("/dev/ttyUSB0", 115_200).unwrap();
    /// ```
    pub fn open(path: &str, bits_per_second: u32) -> Result<Self> {
        if path.trim().is_empty() {
            return Err(Error::InvalidPortName(path.to_string()));
        }

        debug!(path, baud = bits_per_second, "Opening serial port");

        let port = serialport::new(path, bits_per_second)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Self::READ_TIMEOUT)
            .open()?;

        info!(path, baud = bits_per_second, "Serial port open");
        Ok(Self { port })
    }

    /// Names of the serial devices present on this machine
    pub fn available_ports() -> Result<Vec<String>> {
        Ok(serialport::available_ports()?
            .into_iter()
            .map(|p| p.port_name)
            .collect())
    }
}

impl Link for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.port.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return idle_as_zero(e),
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        loop {
            match self.port.write(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return idle_as_zero(e),
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.port.flush()?;
        Ok(())
    }

    fn clear_input(&mut self) -> Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn set_baud_rate(&mut self, bits_per_second: u32) -> Result<()> {
        self.port.set_baud_rate(bits_per_second)?;
        debug!(port = %self.name(), baud = bits_per_second, "Serial port retuned");
        Ok(())
    }

    fn name(&self) -> String {
        self.port.name().unwrap_or_else(|| "serial".to_string())
    }
}
