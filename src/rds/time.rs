//! Group 4A clock-time decoding
//!
//! Blocks B, C and D form one 48-bit word `B << 32 | C << 16 | D`:
//!
//! ```text
//!  33        17 16   12 11    6   5    4      0
//! ┌────────────┬───────┬───────┬──────┬────────┐
//! │    MJD     │ hour  │minute │ sign │ offset │
//! └────────────┴───────┴───────┴──────┴────────┘
//! ```
//!
//! The offset counts half hours; sign bit 0 is `+`.

use core::fmt::Write as _;

use super::block::RdsBlocks;

/// Longest formatted time, `"HH:MM +HH:MM"`
pub const TIME_TEXT_LEN: usize = 12;

/// Formatted time text
pub type TimeText = heapless::String<TIME_TEXT_LEN>;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// Largest accepted offset in whole hours
const MAX_OFFSET_HOURS: u8 = 12;

/// Calendar date
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RdsDate {
    /// Year (e.g. 2023)
    pub year: u16,
    /// Month, 1..=12
    pub month: u8,
    /// Day of month, 1..=31
    pub day: u8,
}

/// Fields of a group 4A payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RdsDateTime {
    /// Modified Julian day
    pub mjd: u32,
    /// UTC hour
    pub hour: u8,
    /// UTC minute
    pub minute: u8,
    /// Local offset in half hours
    pub offset: u8,
    /// Offset is negative
    pub negative: bool,
}

impl RdsDateTime {
    /// Unpack a group 4A payload; the group type is not checked here
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_blocks(blocks: &RdsBlocks) -> Self {
        let raw = ((blocks.b as u64) << 32) | ((blocks.c as u64) << 16) | blocks.d as u64;
        Self {
            mjd: ((raw >> 17) & 0x1_FFFF) as u32,
            hour: ((raw >> 12) & 0x1F) as u8,
            minute: ((raw >> 6) & 0x3F) as u8,
            offset: (raw & 0x1F) as u8,
            negative: raw & (1 << 5) != 0,
        }
    }

    /// Whole hours of the local offset
    #[must_use]
    pub const fn offset_hours(&self) -> u8 {
        self.offset / 2
    }

    /// Remaining minutes of the local offset (0 or 30)
    #[must_use]
    pub const fn offset_minutes(&self) -> u8 {
        (self.offset % 2) * 30
    }

    /// Check the decoded fields against their ranges
    ///
    /// Hour and minute bounds are inclusive (24 and 60) to tolerate the
    /// leap-second encodings some encoders send.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.hour <= 24 && self.minute <= 60 && self.offset_hours() <= MAX_OFFSET_HOURS
    }

    /// Signed offset in minutes
    #[must_use]
    pub const fn offset_total_minutes(&self) -> i32 {
        let minutes = self.offset as i32 * 30;
        if self.negative {
            -minutes
        } else {
            minutes
        }
    }

    /// `"HH:MM +HH:MM"`, UTC followed by the local offset
    #[must_use]
    pub fn utc_text(&self) -> TimeText {
        let mut out = TimeText::new();
        let sign = if self.negative { '-' } else { '+' };
        // Fixed width, always fits
        let _ = write!(
            out,
            "{:02}:{:02} {}{:02}:{:02}",
            self.hour,
            self.minute,
            sign,
            self.offset_hours(),
            self.offset_minutes()
        );
        out
    }

    /// `"HH:MM"` local time, wrapped into one day
    #[must_use]
    pub fn local_text(&self) -> TimeText {
        let utc = i32::from(self.hour) * 60 + i32::from(self.minute);
        let local = (utc + self.offset_total_minutes()).rem_euclid(MINUTES_PER_DAY);
        let mut out = TimeText::new();
        let _ = write!(out, "{:02}:{:02}", local / 60, local % 60);
        out
    }

    /// Calendar date of the MJD field
    ///
    /// Integer form of the conversion in the RDS standard (annex G), valid
    /// from 1900-03-01 to 2100-02-28.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn date(&self) -> RdsDate {
        let mjd = self.mjd as i64;
        let yp = (mjd * 100 - 1_507_820) / 36_525;
        let yd = yp * 36_525 / 100;
        let mp = (mjd * 10_000 - 149_561_000 - yd * 10_000) / 306_001;
        let day = mjd - 14_956 - yd - mp * 306_001 / 10_000;
        let k = if mp == 14 || mp == 15 { 1 } else { 0 };

        RdsDate {
            year: (1900 + yp + k) as u16,
            month: (mp - 1 - k * 12) as u8,
            day: day as u8,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for RdsDateTime {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "MJD {=u32} {=u8:02}:{=u8:02} {}{=u8}",
            self.mjd,
            self.hour,
            self.minute,
            if self.negative { "-" } else { "+" },
            self.offset
        );
    }
}
