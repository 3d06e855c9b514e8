//! Radio Data System decoding
//!
//! The chip delivers one RDS group at a time in registers 0x0C..=0x0F.
//! Block B selects the layout of the rest; the decoder keeps the station
//! name, both radio text variants and the clock time.

pub mod block;
pub mod decoder;
pub mod time;

pub use block::{BlockB, BlockBPayload, BlockErrors, GroupVersion, RdsBlocks};
pub use decoder::RdsDecoder;
pub use time::{RdsDate, RdsDateTime};

/// Which buffer a processed group went to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RdsGroupKind {
    /// Group 0A/0B, station name
    StationName,
    /// Group 2A, 64 character radio text
    ProgramInformation,
    /// Group 2B, 32 character radio text
    StationInformation,
    /// Group 4A, clock time
    ClockTime,
    /// Group 4A with out-of-range fields, discarded
    Invalid,
    /// Any other group, not decoded
    Other(u8, GroupVersion),
}

#[cfg(feature = "embedded")]
impl defmt::Format for RdsGroupKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::StationName => defmt::write!(f, "PS"),
            Self::ProgramInformation => defmt::write!(f, "RT-A"),
            Self::StationInformation => defmt::write!(f, "RT-B"),
            Self::ClockTime => defmt::write!(f, "CT"),
            Self::Invalid => defmt::write!(f, "CT(invalid)"),
            Self::Other(group, version) => defmt::write!(f, "{=u8}{}", group, version),
        }
    }
}
