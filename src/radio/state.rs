//! Tuning State
//!
//! Host-side cached tuning parameters. Bulk reads never change these; only
//! driver operations do, and a completed seek reconciles the frequency with
//! the channel the chip reports.

use crate::types::{Band, Frequency, OscillatorType, Space, Volume};

/// Cached tuning parameters (immutable)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TuningState {
    /// Last tuned or reconciled frequency
    frequency: Frequency,
    /// Band preset
    band: Band,
    /// Channel spacing
    space: Space,
    /// Volume level
    volume: Volume,
    /// Reference clock source
    oscillator: OscillatorType,
}

impl TuningState {
    /// Create a state at the lower edge of `band`
    #[must_use]
    pub const fn new(band: Band, space: Space, volume: Volume, oscillator: OscillatorType) -> Self {
        Self {
            frequency: band.start(),
            band,
            space,
            volume,
            oscillator,
        }
    }

    /// Get cached frequency
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Get band preset
    #[must_use]
    pub const fn band(&self) -> Band {
        self.band
    }

    /// Get channel spacing
    #[must_use]
    pub const fn space(&self) -> Space {
        self.space
    }

    /// Get volume
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.volume
    }

    /// Get oscillator source
    #[must_use]
    pub const fn oscillator(&self) -> OscillatorType {
        self.oscillator
    }

    /// Channel number of the cached frequency
    #[must_use]
    pub const fn channel(&self) -> u16 {
        self.band.channel_for(self.frequency, self.space)
    }

    /// Frequency of a channel number under the current band and spacing
    #[must_use]
    pub const fn frequency_of(&self, channel: u16) -> Frequency {
        self.band.frequency_for(channel, self.space)
    }

    /// Next channel up, wrapping to the band start when the step would
    /// pass the upper edge
    #[must_use]
    pub const fn step_up(&self) -> Frequency {
        let next = self.frequency.as_10khz() + self.space.step();
        if next <= self.band.end().as_10khz() {
            Frequency::from_10khz(next)
        } else {
            self.band.start()
        }
    }

    /// Next channel down, wrapping to the highest grid channel when the step
    /// would pass the lower edge
    #[must_use]
    pub const fn step_down(&self) -> Frequency {
        let start = self.band.start().as_10khz();
        let current = self.frequency.as_10khz();
        if current >= start + self.space.step() {
            Frequency::from_10khz(current - self.space.step())
        } else {
            self.top_of_band()
        }
    }

    /// Highest frequency of the band that lies on the channel grid
    #[must_use]
    pub const fn top_of_band(&self) -> Frequency {
        self.frequency_of(self.band.channel_for(self.band.end(), self.space))
    }

    /// Move the cached frequency onto the channel grid of the current band,
    /// falling back to the band start when it lies outside the band
    #[must_use]
    pub const fn snapped(self) -> Self {
        let frequency = if self.band.contains(self.frequency) {
            self.frequency_of(self.channel())
        } else {
            self.band.start()
        };
        Self { frequency, ..self }
    }

    /// Set frequency (returns new state)
    #[must_use]
    pub const fn with_frequency(self, frequency: Frequency) -> Self {
        Self { frequency, ..self }
    }

    /// Set band (returns new state)
    #[must_use]
    pub const fn with_band(self, band: Band) -> Self {
        Self { band, ..self }
    }

    /// Set spacing (returns new state)
    #[must_use]
    pub const fn with_space(self, space: Space) -> Self {
        Self { space, ..self }
    }

    /// Set volume (returns new state)
    #[must_use]
    pub const fn with_volume(self, volume: Volume) -> Self {
        Self { volume, ..self }
    }

    /// Set oscillator source (returns new state)
    #[must_use]
    pub const fn with_oscillator(self, oscillator: OscillatorType) -> Self {
        Self { oscillator, ..self }
    }
}

impl Default for TuningState {
    fn default() -> Self {
        Self::new(
            Band::UsaEurope,
            Space::Khz100,
            Volume::MUTE,
            OscillatorType::Crystal,
        )
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TuningState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Tuning({}, {}, {}, vol {=u8})",
            self.frequency,
            self.band,
            self.space,
            self.volume.level()
        );
    }
}
