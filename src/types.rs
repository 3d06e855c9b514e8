//! Shared types used across the Si470x driver
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;
use core::fmt::Write as _;

/// Longest fixed-width frequency text, `"108"` + a 4-byte separator + `"00"`
pub const FREQUENCY_TEXT_LEN: usize = 9;

/// Fixed-width frequency text
pub type FrequencyText = heapless::String<FREQUENCY_TEXT_LEN>;

/// Tuned frequency in units of 10 kHz (hundredths of a MHz)
///
/// `10390` is 103.90 MHz. This is the unit the chip's channel formula is
/// expressed in, so all conversions stay in integer arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u16);

impl Frequency {
    /// Lowest band edge supported by any band preset (64.00 MHz)
    pub const MIN: Self = Self(6400);

    /// Highest band edge supported by any band preset (108.00 MHz)
    pub const MAX: Self = Self(10800);

    /// Create a frequency from 10 kHz units
    #[must_use]
    pub const fn from_10khz(units: u16) -> Self {
        Self(units)
    }

    /// Create a frequency from kHz (truncated to 10 kHz)
    #[must_use]
    pub const fn from_khz(khz: u32) -> Option<Self> {
        let units = khz / 10;
        if units > u16::MAX as u32 {
            None
        } else {
            Some(Self(units as u16))
        }
    }

    /// Get the frequency in 10 kHz units
    #[must_use]
    pub const fn as_10khz(self) -> u16 {
        self.0
    }

    /// Get the frequency in kHz
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0 as u32 * 10
    }

    /// Whole MHz part (`103` for 103.90 MHz)
    #[must_use]
    pub const fn mhz(self) -> u16 {
        self.0 / 100
    }

    /// Fractional part in hundredths of a MHz (`90` for 103.90 MHz)
    #[must_use]
    pub const fn hundredths(self) -> u16 {
        self.0 % 100
    }

    /// Fixed-width text such as `" 87,50"` or `"103,90"`.
    ///
    /// The integer part is right aligned in three columns (leading zeros
    /// become spaces) and `separator` is placed before the two decimals.
    #[must_use]
    pub fn format_with(self, separator: char) -> FrequencyText {
        let mut out = FrequencyText::new();
        // 3 digits + separator (at most 4 bytes) + 2 digits fills the capacity exactly
        let _ = write!(out, "{:>3}{}{:02}", self.mhz(), separator, self.hundredths());
        out
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({}.{:02} MHz)", self.mhz(), self.hundredths())
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} MHz", self.mhz(), self.hundredths())
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}.{=u16:02} MHz", self.mhz(), self.hundredths());
    }
}

/// Band preset (`BAND` field of system configuration 2)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Band {
    /// 87.5–108 MHz (USA, Europe)
    #[default]
    UsaEurope,
    /// 76–108 MHz (Japan wide band)
    JapanWide,
    /// 76–90 MHz (Japan)
    Japan,
    /// 64–108 MHz (reserved setting on Si4702/03)
    Reserved,
}

impl Band {
    /// All presets in register order
    pub const ALL: [Self; 4] = [Self::UsaEurope, Self::JapanWide, Self::Japan, Self::Reserved];

    /// Decode from the 2-bit register field
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::UsaEurope,
            1 => Self::JapanWide,
            2 => Self::Japan,
            _ => Self::Reserved,
        }
    }

    /// Get the 2-bit register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::UsaEurope => 0,
            Self::JapanWide => 1,
            Self::Japan => 2,
            Self::Reserved => 3,
        }
    }

    /// Lower band edge
    #[must_use]
    pub const fn start(self) -> Frequency {
        match self {
            Self::UsaEurope => Frequency(8750),
            Self::JapanWide | Self::Japan => Frequency(7600),
            Self::Reserved => Frequency(6400),
        }
    }

    /// Upper band edge
    #[must_use]
    pub const fn end(self) -> Frequency {
        match self {
            Self::UsaEurope | Self::JapanWide | Self::Reserved => Frequency(10800),
            Self::Japan => Frequency(9000),
        }
    }

    /// Check whether a frequency lies within the band edges
    #[must_use]
    pub const fn contains(self, freq: Frequency) -> bool {
        freq.0 >= self.start().0 && freq.0 <= self.end().0
    }

    /// Channel number for a frequency: `(freq - start) / spacing`
    #[must_use]
    pub const fn channel_for(self, freq: Frequency, space: Space) -> u16 {
        freq.0.saturating_sub(self.start().0) / space.step()
    }

    /// Frequency for a channel number: `channel * spacing + start`
    #[must_use]
    pub const fn frequency_for(self, channel: u16, space: Space) -> Frequency {
        Frequency(channel.saturating_mul(space.step()).saturating_add(self.start().0))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Band {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::UsaEurope => defmt::write!(f, "87.5-108"),
            Self::JapanWide => defmt::write!(f, "76-108"),
            Self::Japan => defmt::write!(f, "76-90"),
            Self::Reserved => defmt::write!(f, "64-108"),
        }
    }
}

/// Channel spacing (`SPACE` field of system configuration 2)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Space {
    /// 200 kHz (USA, Australia)
    Khz200,
    /// 100 kHz (Europe, Japan)
    #[default]
    Khz100,
    /// 50 kHz
    Khz50,
    /// 10 kHz
    Khz10,
}

impl Space {
    /// All spacings in register order
    pub const ALL: [Self; 4] = [Self::Khz200, Self::Khz100, Self::Khz50, Self::Khz10];

    /// Decode from the 2-bit register field
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Khz200,
            1 => Self::Khz100,
            2 => Self::Khz50,
            _ => Self::Khz10,
        }
    }

    /// Get the 2-bit register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Khz200 => 0,
            Self::Khz100 => 1,
            Self::Khz50 => 2,
            Self::Khz10 => 3,
        }
    }

    /// Step in 10 kHz units
    #[must_use]
    pub const fn step(self) -> u16 {
        match self {
            Self::Khz200 => 20,
            Self::Khz100 => 10,
            Self::Khz50 => 5,
            Self::Khz10 => 1,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Space {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} kHz", self.step() * 10);
    }
}

/// Audio volume, 0 (mute) to 15
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Volume(u8);

impl Volume {
    /// Highest volume step
    pub const MAX: u8 = 15;

    /// Silent (chip reset value)
    pub const MUTE: Self = Self(0);

    /// Create a volume, returns None above 15
    #[must_use]
    pub const fn new(level: u8) -> Option<Self> {
        if level <= Self::MAX {
            Some(Self(level))
        } else {
            None
        }
    }

    /// Get the level
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// One step louder, saturating at 15
    #[must_use]
    pub const fn up(self) -> Self {
        if self.0 < Self::MAX {
            Self(self.0 + 1)
        } else {
            self
        }
    }

    /// One step quieter, saturating at 0
    #[must_use]
    pub const fn down(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

/// Reference clock source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OscillatorType {
    /// 32.768 kHz crystal on the chip's oscillator pins
    #[default]
    Crystal,
    /// External reference clock on RCLK
    ReferenceClock,
}

impl OscillatorType {
    /// Value of the `XOSCEN` bit
    #[must_use]
    pub const fn xoscen(self) -> bool {
        matches!(self, Self::Crystal)
    }
}

/// What the chip does when a seek reaches a band edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SeekMode {
    /// Wrap around and continue seeking
    #[default]
    Wrap,
    /// Stop at the band limit
    Stop,
}

/// Seek direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SeekDirection {
    /// Towards lower frequencies
    #[default]
    Down,
    /// Towards higher frequencies
    Up,
}

/// FM de-emphasis time constant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeEmphasis {
    /// 75 µs (USA)
    #[default]
    Us75,
    /// 50 µs (Europe, Australia, Japan)
    Us50,
}

/// RDS reporting mode (`RDSM` bit)
///
/// Only changes how the chip reports block errors; decoding is identical.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RdsMode {
    /// Standard mode
    #[default]
    Standard,
    /// Verbose mode, block error levels are reported in BLERA..BLERD
    Verbose,
}

/// Softmute attack/recover rate (`SMUTER`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SoftmuteRate {
    /// Fastest (default)
    #[default]
    Fastest,
    /// Fast
    Fast,
    /// Slow
    Slow,
    /// Slowest
    Slowest,
}

impl SoftmuteRate {
    /// Get the 2-bit register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Fastest => 0,
            Self::Fast => 1,
            Self::Slow => 2,
            Self::Slowest => 3,
        }
    }
}

/// Softmute attenuation (`SMUTEA`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SoftmuteAttenuation {
    /// 16 dB (default)
    #[default]
    Db16,
    /// 14 dB
    Db14,
    /// 12 dB
    Db12,
    /// 10 dB
    Db10,
}

impl SoftmuteAttenuation {
    /// Get the 2-bit register value
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Db16 => 0,
            Self::Db14 => 1,
            Self::Db12 => 2,
            Self::Db10 => 3,
        }
    }
}

/// Driver error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Bus transaction failed
    I2c(E),
    /// The reset line could not be driven
    ResetPin,
    /// The chip did not report seek/tune completion within the poll bound
    Timeout,
    /// An argument was out of range; no state was changed
    InvalidParameter,
    /// A tune or seek is already in progress
    Busy,
}

#[cfg(feature = "embedded")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::I2c(_) => defmt::write!(f, "I2C error"),
            Self::ResetPin => defmt::write!(f, "reset pin error"),
            Self::Timeout => defmt::write!(f, "timeout"),
            Self::InvalidParameter => defmt::write!(f, "invalid parameter"),
            Self::Busy => defmt::write!(f, "busy"),
        }
    }
}
