//! RDS block snapshot and block B decoding
//!
//! Block B carries the group type and version in its upper bits. The low
//! five bits change meaning with the group type, so block B is decoded into
//! a tagged payload instead of being exposed as overlapping bitfields.

use crate::registers::{reg, ReadChannel, ShadowRegisters, StatusRssi};

/// Group version (block B bit 11)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupVersion {
    /// Version A: block C carries group data
    A,
    /// Version B: block C repeats the PI code
    B,
}

#[cfg(feature = "embedded")]
impl defmt::Format for GroupVersion {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::A => defmt::write!(f, "A"),
            Self::B => defmt::write!(f, "B"),
        }
    }
}

/// Group-specific low bits of block B
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockBPayload {
    /// Group 0: basic tuning and switching information
    Basic {
        /// Programme service name segment (0..=3)
        segment: u8,
        /// Decoder identification bit for this segment
        decoder_id: bool,
        /// Music/speech switch (music when set)
        music: bool,
        /// Traffic announcement
        traffic_announcement: bool,
    },
    /// Group 2: radio text
    RadioText {
        /// Text segment (0..=15)
        segment: u8,
        /// Text A/B flag, toggles when the message is replaced
        text_ab: bool,
    },
    /// Any other group, raw low bits
    Other {
        /// Bits 4:0
        content: u8,
    },
}

/// Decoded block B
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockB {
    /// Group type (0..=15)
    pub group_type: u8,
    /// Group version
    pub version: GroupVersion,
    /// Traffic programme flag
    pub traffic_program: bool,
    /// Programme type code
    pub pty: u8,
    /// Group-specific payload
    pub payload: BlockBPayload,
}

impl BlockB {
    /// Decode a raw block B word
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn decode(raw: u16) -> Self {
        let group_type = (raw >> 12) as u8;
        let low = (raw & 0x1F) as u8;
        let payload = match group_type {
            0 => BlockBPayload::Basic {
                segment: low & 0x03,
                decoder_id: low & 0x04 != 0,
                music: low & 0x08 != 0,
                traffic_announcement: low & 0x10 != 0,
            },
            2 => BlockBPayload::RadioText {
                segment: low & 0x0F,
                text_ab: low & 0x10 != 0,
            },
            _ => BlockBPayload::Other { content: low },
        };

        Self {
            group_type,
            version: if raw & (1 << 11) == 0 {
                GroupVersion::A
            } else {
                GroupVersion::B
            },
            traffic_program: raw & (1 << 10) != 0,
            pty: ((raw >> 5) & 0x1F) as u8,
            payload,
        }
    }

    /// Text A/B flag (bit 4), whatever the group type
    #[must_use]
    pub const fn text_ab(&self) -> bool {
        match self.payload {
            BlockBPayload::Basic {
                traffic_announcement,
                ..
            } => traffic_announcement,
            BlockBPayload::RadioText { text_ab, .. } => text_ab,
            BlockBPayload::Other { content } => content & 0x10 != 0,
        }
    }
}

/// The four RDS blocks of one received group
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RdsBlocks {
    /// Block A (PI code)
    pub a: u16,
    /// Block B (group type, flags)
    pub b: u16,
    /// Block C
    pub c: u16,
    /// Block D
    pub d: u16,
}

impl RdsBlocks {
    /// Snapshot registers 0x0C..=0x0F
    #[must_use]
    pub fn from_shadow(shadow: &ShadowRegisters) -> Self {
        Self {
            a: shadow.get(reg::RDS_A),
            b: shadow.get(reg::RDS_B),
            c: shadow.get(reg::RDS_C),
            d: shadow.get(reg::RDS_D),
        }
    }

    /// Decoded block B
    #[must_use]
    pub const fn block_b(&self) -> BlockB {
        BlockB::decode(self.b)
    }

    /// Block C then block D, high byte first
    #[must_use]
    pub const fn cd_bytes(&self) -> [u8; 4] {
        let [c0, c1] = self.c.to_be_bytes();
        let [d0, d1] = self.d.to_be_bytes();
        [c0, c1, d0, d1]
    }

    /// Block D, high byte first
    #[must_use]
    pub const fn d_bytes(&self) -> [u8; 2] {
        self.d.to_be_bytes()
    }
}

/// Corrected error count of one block (verbose RDS mode)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlockErrors {
    /// No errors
    #[default]
    None,
    /// One or two errors corrected
    Corrected1to2,
    /// Three to five errors corrected
    Corrected3to5,
    /// Six or more errors, block unusable
    Uncorrectable,
}

impl BlockErrors {
    /// Decode a 2-bit BLER field
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::None,
            1 => Self::Corrected1to2,
            2 => Self::Corrected3to5,
            _ => Self::Uncorrectable,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BlockErrors {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "0"),
            Self::Corrected1to2 => defmt::write!(f, "1-2"),
            Self::Corrected3to5 => defmt::write!(f, "3-5"),
            Self::Uncorrectable => defmt::write!(f, "6+"),
        }
    }
}

/// Error levels for blocks A through D
///
/// Only meaningful with `RdsMode::Verbose`; in standard mode the chip
/// reports zero here.
#[must_use]
pub fn block_errors(shadow: &ShadowRegisters) -> [BlockErrors; 4] {
    let status = shadow.view::<StatusRssi>();
    let chan = shadow.view::<ReadChannel>();
    [
        BlockErrors::from_bits(status.blera()),
        BlockErrors::from_bits(chan.blerb()),
        BlockErrors::from_bits(chan.blerc()),
        BlockErrors::from_bits(chan.blerd()),
    ]
}
