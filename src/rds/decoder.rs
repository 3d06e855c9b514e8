//! RDS text and time buffers
//!
//! Buffers keep their content until a matching group overwrites a segment
//! or the decoder is cleared, so partially received text stays visible.

use super::block::{BlockBPayload, GroupVersion, RdsBlocks};
use super::time::{RdsDateTime, TimeText};
use super::RdsGroupKind;

/// Programme service name length
pub const STATION_NAME_LEN: usize = 8;

/// Radio text length, version A
pub const PROGRAM_INFO_LEN: usize = 64;

/// Radio text length, version B
pub const STATION_INFO_LEN: usize = 32;

/// Decode buffers for one receiver
#[derive(Clone, Debug)]
pub struct RdsDecoder {
    station_name: [u8; STATION_NAME_LEN + 1],
    program_info: [u8; PROGRAM_INFO_LEN + 1],
    station_info: [u8; STATION_INFO_LEN + 1],
    time: TimeText,
    last_time: Option<RdsDateTime>,
}

impl RdsDecoder {
    /// Create a decoder with empty buffers
    #[must_use]
    pub const fn new() -> Self {
        Self {
            station_name: [0; STATION_NAME_LEN + 1],
            program_info: [0; PROGRAM_INFO_LEN + 1],
            station_info: [0; STATION_INFO_LEN + 1],
            time: TimeText::new(),
            last_time: None,
        }
    }

    /// Zero every buffer
    pub fn clear(&mut self) {
        self.station_name.fill(0);
        self.program_info.fill(0);
        self.station_info.fill(0);
        self.time.clear();
        self.last_time = None;
    }

    /// Dispatch one group to the matching decoder
    pub fn process(&mut self, blocks: &RdsBlocks) -> RdsGroupKind {
        let block_b = blocks.block_b();
        match (block_b.group_type, block_b.version) {
            (0, _) => {
                self.decode_station_name(blocks);
                RdsGroupKind::StationName
            }
            (2, GroupVersion::A) => {
                self.decode_program_info(blocks);
                RdsGroupKind::ProgramInformation
            }
            (2, GroupVersion::B) => {
                self.decode_station_info(blocks);
                RdsGroupKind::StationInformation
            }
            (4, GroupVersion::A) => {
                if self.decode_time(blocks).is_some() {
                    RdsGroupKind::ClockTime
                } else {
                    RdsGroupKind::Invalid
                }
            }
            (group_type, version) => RdsGroupKind::Other(group_type, version),
        }
    }

    /// Group 0: two name characters from block D at `segment * 2`
    ///
    /// Returns false when the group is not type 0.
    pub fn decode_station_name(&mut self, blocks: &RdsBlocks) -> bool {
        let BlockBPayload::Basic { segment, .. } = blocks.block_b().payload else {
            return false;
        };
        let at = usize::from(segment) * 2;
        self.station_name[at..at + 2].copy_from_slice(&blocks.d_bytes());
        self.station_name[STATION_NAME_LEN] = 0;
        true
    }

    /// Group 2A: four text characters from blocks C and D at `segment * 4`
    ///
    /// Returns false when the group is not type 2A.
    pub fn decode_program_info(&mut self, blocks: &RdsBlocks) -> bool {
        let block_b = blocks.block_b();
        let BlockBPayload::RadioText { segment, .. } = block_b.payload else {
            return false;
        };
        if block_b.version != GroupVersion::A {
            return false;
        }
        let at = usize::from(segment) * 4;
        self.program_info[at..at + 4].copy_from_slice(&blocks.cd_bytes());
        self.program_info[PROGRAM_INFO_LEN] = 0;
        true
    }

    /// Group 2B: two text characters from block D at `segment * 2`
    ///
    /// Returns false when the group is not type 2B.
    pub fn decode_station_info(&mut self, blocks: &RdsBlocks) -> bool {
        let block_b = blocks.block_b();
        let BlockBPayload::RadioText { segment, .. } = block_b.payload else {
            return false;
        };
        if block_b.version != GroupVersion::B {
            return false;
        }
        let at = usize::from(segment) * 2;
        self.station_info[at..at + 2].copy_from_slice(&blocks.d_bytes());
        self.station_info[STATION_INFO_LEN] = 0;
        true
    }

    /// Group 4A: decode and format the clock time
    ///
    /// Returns the `"HH:MM +HH:MM"` text, or None when the group is not 4A
    /// or a field is out of range. The previous time is kept on failure.
    pub fn decode_time(&mut self, blocks: &RdsBlocks) -> Option<&str> {
        let block_b = blocks.block_b();
        if block_b.group_type != 4 || block_b.version != GroupVersion::A {
            return None;
        }
        let time = RdsDateTime::from_blocks(blocks);
        if !time.is_valid() {
            return None;
        }
        self.time = time.utc_text();
        self.last_time = Some(time);
        Some(self.time.as_str())
    }

    /// Station name with control characters replaced by spaces
    pub fn station_name(&mut self) -> &[u8] {
        sanitize(&mut self.station_name);
        &self.station_name[..STATION_NAME_LEN]
    }

    /// Version A radio text with control characters replaced by spaces
    pub fn program_info(&mut self) -> &[u8] {
        sanitize(&mut self.program_info);
        &self.program_info[..PROGRAM_INFO_LEN]
    }

    /// Version B radio text with control characters replaced by spaces
    pub fn station_info(&mut self) -> &[u8] {
        sanitize(&mut self.station_info);
        &self.station_info[..STATION_INFO_LEN]
    }

    /// Last valid clock time text
    #[must_use]
    pub fn time(&self) -> Option<&str> {
        self.last_time.map(|_| self.time.as_str())
    }

    /// Last valid clock time fields
    #[must_use]
    pub const fn date_time(&self) -> Option<RdsDateTime> {
        self.last_time
    }

    /// Station name buffer including its terminator
    #[must_use]
    pub const fn raw_station_name(&self) -> &[u8; STATION_NAME_LEN + 1] {
        &self.station_name
    }

    /// Version A radio text buffer including its terminator
    #[must_use]
    pub const fn raw_program_info(&self) -> &[u8; PROGRAM_INFO_LEN + 1] {
        &self.program_info
    }

    /// Version B radio text buffer including its terminator
    #[must_use]
    pub const fn raw_station_info(&self) -> &[u8; STATION_INFO_LEN + 1] {
        &self.station_info
    }
}

impl Default for RdsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace bytes below 0x20 with spaces and terminate at the last byte
pub fn sanitize(text: &mut [u8]) {
    let Some((last, body)) = text.split_last_mut() else {
        return;
    };
    for byte in body.iter_mut().filter(|b| **b < b' ') {
        *byte = b' ';
    }
    *last = 0;
}
