//! GPIO reset line on Raspberry Pi class boards

use rppal::gpio::{Gpio, OutputPin};
use tracing::debug;

use crate::{error::*, ResetLine};

/// Camera reset pin driven through `rppal`
///
/// The uCAM-III reset input is active low.
pub struct GpioResetLine {
    pin: OutputPin,
}

impl GpioResetLine {
    /// BCM pin wired to the camera reset on the flight board (wiringPi 7)
    pub const DEFAULT_PIN: u8 = 4;

    /// Claim `pin` as an output, released (high)
    pub fn new(pin: u8) -> Result<Self> {
        let mut pin = Gpio::new()?.get(pin)?.into_output();
        pin.set_high();

        debug!("Reset line on GPIO {} ready", pin.pin());

        Ok(Self { pin })
    }
}

impl ResetLine for GpioResetLine {
    fn set_reset(&mut self, asserted: bool) -> Result<()> {
        if asserted {
            self.pin.set_low();
        } else {
            self.pin.set_high();
        }
        Ok(())
    }
}
