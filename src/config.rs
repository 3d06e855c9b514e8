//! System configuration and hardware constants
//!
//! Timing constants for the Si470x bring-up sequences, the demo board pin
//! map and the driver configuration struct.

use crate::hal::i2c::I2cAddress;
use crate::types::{Band, DeEmphasis, OscillatorType, Space, Volume};

/// Si470x I2C address
pub const I2C_ADDRESS: u8 = 0x10;

/// I2C bus frequency (the chip supports fast mode)
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Number of 16-bit registers on the chip
pub const REGISTER_COUNT: usize = crate::registers::REGISTER_COUNT;

/// Crystal oscillator start-up time in milliseconds
pub const CRYSTAL_SETTLE_MS: u32 = 500;

/// Settle time after enabling the chip in milliseconds
pub const POWER_UP_SETTLE_MS: u32 = 60;

/// Settle time after disabling the chip in milliseconds
pub const POWER_DOWN_SETTLE_MS: u32 = 100;

/// RST low and recovery time in milliseconds
pub const RESET_PULSE_MS: u32 = 1;

/// Wait between setting TUNE and the first completion poll in milliseconds
pub const TUNE_SETTLE_MS: u32 = 60;

/// Default delay between completion polls in milliseconds
pub const POLL_INTERVAL_MS: u32 = 10;

/// Default bound on one completion wait in milliseconds
///
/// A full-band seek at 50 kHz spacing takes a few seconds.
pub const POLL_TIMEOUT_MS: u32 = 5_000;

/// Pin assignments for GPIO
pub mod pins {
    //! Demo board wiring (NUCLEO-G474RE)

    /// I2C1 SCL
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA, doubles as SDIO during mode selection
    pub const I2C1_SDA: &str = "PB9";

    /// Tuner RST (active low)
    pub const TUNER_RST: &str = "PB7";

    /// Tuner GPIO2 (STC/RDS interrupt, active low)
    pub const TUNER_GPIO2: &str = "PB6";
}

/// Driver configuration
///
/// Every field has a documented default; build variations with the
/// `with_*` methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Si470xConfig {
    /// Bus address (default 0x10)
    pub address: I2cAddress,
    /// Reference clock source (default crystal)
    pub oscillator: OscillatorType,
    /// Crystal start-up wait in milliseconds (default 500)
    pub crystal_settle_ms: u32,
    /// Delay between completion polls in milliseconds (default 10)
    pub poll_interval_ms: u32,
    /// Bound on one completion wait in milliseconds (default 5000)
    pub poll_timeout_ms: u32,
    /// Route seek/tune complete to GPIO2 (default off)
    pub seek_interrupt: bool,
    /// Route RDS ready to GPIO2 (default off)
    pub rds_interrupt: bool,
    /// Band applied at power-up (default 87.5–108 MHz)
    pub band: Band,
    /// Channel spacing applied at power-up (default 100 kHz)
    pub space: Space,
    /// De-emphasis applied at power-up (default 75 µs)
    pub de_emphasis: DeEmphasis,
    /// Volume applied at power-up (default 0)
    pub volume: Volume,
}

impl Si470xConfig {
    /// Configuration with every default
    #[must_use]
    pub const fn new() -> Self {
        Self {
            address: I2cAddress::new(I2C_ADDRESS),
            oscillator: OscillatorType::Crystal,
            crystal_settle_ms: CRYSTAL_SETTLE_MS,
            poll_interval_ms: POLL_INTERVAL_MS,
            poll_timeout_ms: POLL_TIMEOUT_MS,
            seek_interrupt: false,
            rds_interrupt: false,
            band: Band::UsaEurope,
            space: Space::Khz100,
            de_emphasis: DeEmphasis::Us75,
            volume: Volume::MUTE,
        }
    }

    /// Set the bus address (returns new config)
    #[must_use]
    pub const fn with_address(self, address: I2cAddress) -> Self {
        Self { address, ..self }
    }

    /// Set the oscillator source (returns new config)
    #[must_use]
    pub const fn with_oscillator(self, oscillator: OscillatorType) -> Self {
        Self { oscillator, ..self }
    }

    /// Set the crystal settle delay (returns new config)
    #[must_use]
    pub const fn with_crystal_settle_ms(self, crystal_settle_ms: u32) -> Self {
        Self {
            crystal_settle_ms,
            ..self
        }
    }

    /// Set the poll interval and bound (returns new config)
    #[must_use]
    pub const fn with_polling(self, poll_interval_ms: u32, poll_timeout_ms: u32) -> Self {
        Self {
            poll_interval_ms,
            poll_timeout_ms,
            ..self
        }
    }

    /// Route seek/tune complete to GPIO2 (returns new config)
    #[must_use]
    pub const fn with_seek_interrupt(self, seek_interrupt: bool) -> Self {
        Self {
            seek_interrupt,
            ..self
        }
    }

    /// Route RDS ready to GPIO2 (returns new config)
    #[must_use]
    pub const fn with_rds_interrupt(self, rds_interrupt: bool) -> Self {
        Self {
            rds_interrupt,
            ..self
        }
    }

    /// Set the power-up band (returns new config)
    #[must_use]
    pub const fn with_band(self, band: Band) -> Self {
        Self { band, ..self }
    }

    /// Set the power-up spacing (returns new config)
    #[must_use]
    pub const fn with_space(self, space: Space) -> Self {
        Self { space, ..self }
    }

    /// Set the power-up de-emphasis (returns new config)
    #[must_use]
    pub const fn with_de_emphasis(self, de_emphasis: DeEmphasis) -> Self {
        Self {
            de_emphasis,
            ..self
        }
    }

    /// Set the power-up volume (returns new config)
    #[must_use]
    pub const fn with_volume(self, volume: Volume) -> Self {
        Self { volume, ..self }
    }

    /// Maximum number of completion polls per wait, at least one
    #[must_use]
    pub const fn max_polls(&self) -> u32 {
        let interval = if self.poll_interval_ms == 0 {
            1
        } else {
            self.poll_interval_ms
        };
        let polls = self.poll_timeout_ms / interval;
        if polls == 0 {
            1
        } else {
            polls
        }
    }

    /// Whether any interrupt is routed to GPIO2
    #[must_use]
    pub const fn gpio2_interrupt(&self) -> bool {
        self.seek_interrupt || self.rds_interrupt
    }
}

impl Default for Si470xConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Si470xConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Si470x({}, band {}, space {}, vol {=u8})",
            self.address,
            self.band,
            self.space,
            self.volume.level()
        );
    }
}
