//! Reset line on a Raspberry Pi GPIO pin

use rppal::gpio::{Gpio, OutputPin};
use tracing::{debug, info};

use crate::{ResetLine, error::Result};

/// Camera RESET input wired to a BCM GPIO pin
///
/// The pin is claimed high so the camera keeps running until the first
/// pulse.
pub struct GpioResetLine {
    pin: OutputPin,
}

impl GpioResetLine {
    pub fn new(bcm_pin: u8) -> Result<Self> {
        info!(pin = bcm_pin, "Initializing reset GPIO");

        let pin = Gpio::new()?.get(bcm_pin)?.into_output_high();
        Ok(Self { pin })
    }

    pub fn pin(&self) -> u8 {
        self.pin.pin()
    }
}

impl ResetLine for GpioResetLine {
    fn set_low(&mut self) -> Result<()> {
        debug!(pin = self.pin(), "Reset asserted");
        self.pin.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<()> {
        debug!(pin = self.pin(), "Reset released");
        self.pin.set_high();
        Ok(())
    }
}
