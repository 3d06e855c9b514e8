//! GPIO Abstractions
//!
//! Reset line handling for the tuner. Bus mode is latched on the rising edge
//! of RST: SDIO low selects the two-wire (I2C) interface.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::RESET_PULSE_MS;

/// Which line failed while selecting the bus mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineError {
    /// RST could not be driven
    Reset,
    /// SDIO could not be driven
    Sdio,
}

#[cfg(feature = "embedded")]
impl defmt::Format for LineError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Reset => defmt::write!(f, "RST"),
            Self::Sdio => defmt::write!(f, "SDIO"),
        }
    }
}

/// Active-low hardware reset line
pub struct ResetLine<RST> {
    pin: RST,
}

impl<RST: OutputPin> ResetLine<RST> {
    /// Wrap the RST pin
    #[must_use]
    pub fn new(pin: RST) -> Self {
        Self { pin }
    }

    /// Pulse RST low then release it
    ///
    /// # Errors
    /// Propagates the pin error.
    pub fn pulse<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), RST::Error> {
        self.pin.set_low()?;
        delay.delay_ms(RESET_PULSE_MS);
        self.pin.set_high()?;
        delay.delay_ms(RESET_PULSE_MS);
        Ok(())
    }

    /// Give the pin back
    pub fn release(self) -> RST {
        self.pin
    }
}

/// Latch two-wire mode: hold SDIO low across a reset pulse
///
/// Must run before the pin is handed to the I2C peripheral.
///
/// # Errors
/// Reports which line could not be driven.
pub fn select_two_wire<RST, SDIO, D>(
    rst: &mut RST,
    sdio: &mut SDIO,
    delay: &mut D,
) -> Result<(), LineError>
where
    RST: OutputPin,
    SDIO: OutputPin,
    D: DelayNs,
{
    sdio.set_low().map_err(|_| LineError::Sdio)?;
    rst.set_low().map_err(|_| LineError::Reset)?;
    delay.delay_ms(RESET_PULSE_MS);
    rst.set_high().map_err(|_| LineError::Reset)?;
    delay.delay_ms(RESET_PULSE_MS);
    sdio.set_high().map_err(|_| LineError::Sdio)?;
    Ok(())
}
