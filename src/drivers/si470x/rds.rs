//! RDS access
//!
//! Accessors decode the group currently held in the shadow bank. Check
//! [`Si470x::rds_ready`] and call [`Si470x::refresh_rds`] first; without that
//! they see whatever group was read last.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use super::{DriverResult, Si470x};
use crate::rds::block::block_errors;
use crate::rds::time::TimeText;
use crate::rds::{BlockErrors, GroupVersion, RdsBlocks, RdsDate, RdsDateTime, RdsDecoder, RdsGroupKind};
use crate::registers::{StatusRssi, SysConfig1};
use crate::types::Error;

impl<I2C, D, RST> Si470x<I2C, D, RST>
where
    I2C: I2c,
    D: DelayNs,
    RST: OutputPin,
{
    /// Enable or disable the RDS decoder; disabling clears the buffers
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_rds(&mut self, enabled: bool) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<SysConfig1>(|r| r.set_rds(enabled));
        self.flush()?;
        if !enabled {
            self.rds.clear();
        }
        Ok(())
    }

    /// Check whether RDS is enabled on the shadow copy
    #[must_use]
    pub fn is_rds_enabled(&self) -> bool {
        self.shadow.view::<SysConfig1>().rds()
    }

    /// A new group is waiting (reads the status register)
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn rds_ready(&mut self) -> DriverResult<bool, I2C::Error> {
        self.refresh_status()?;
        Ok(self.shadow.view::<StatusRssi>().rdsr())
    }

    /// The RDS decoder is synchronized (reads the status register)
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn rds_sync(&mut self) -> DriverResult<bool, I2C::Error> {
        self.refresh_status()?;
        Ok(self.shadow.view::<StatusRssi>().rdss())
    }

    /// Read status, read channel and the four RDS blocks
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn refresh_rds(&mut self) -> DriverResult<(), I2C::Error> {
        self.transport
            .read_rds_window(&mut self.shadow)
            .map_err(Error::I2c)
    }

    /// If a group is ready, read it and feed it to the matching buffer
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn poll_rds(&mut self) -> DriverResult<Option<RdsGroupKind>, I2C::Error> {
        if !self.rds_ready()? {
            return Ok(None);
        }
        self.refresh_rds()?;
        let kind = self.rds.process(&RdsBlocks::from_shadow(&self.shadow));
        trace!("rds: {}", kind);
        Ok(Some(kind))
    }

    /// RDS blocks of the current group
    #[must_use]
    pub fn rds_blocks(&self) -> RdsBlocks {
        RdsBlocks::from_shadow(&self.shadow)
    }

    /// Group type of the current group
    #[must_use]
    pub fn rds_group_type(&self) -> u8 {
        self.rds_blocks().block_b().group_type
    }

    /// Version of the current group
    #[must_use]
    pub fn rds_version(&self) -> GroupVersion {
        self.rds_blocks().block_b().version
    }

    /// Programme type of the current group
    #[must_use]
    pub fn rds_program_type(&self) -> u8 {
        self.rds_blocks().block_b().pty
    }

    /// Traffic programme flag of the current group
    #[must_use]
    pub fn rds_traffic_program(&self) -> bool {
        self.rds_blocks().block_b().traffic_program
    }

    /// Text A/B flag of the current group
    #[must_use]
    pub fn rds_text_ab(&self) -> bool {
        self.rds_blocks().block_b().text_ab()
    }

    /// Block error levels A..D, meaningful in verbose mode only
    #[must_use]
    pub fn rds_block_errors(&self) -> [BlockErrors; 4] {
        block_errors(&self.shadow)
    }

    /// Station name, updated from the current group when it is type 0
    ///
    /// None when the current group is not type 0.
    pub fn rds_station_name(&mut self) -> Option<&[u8]> {
        let blocks = RdsBlocks::from_shadow(&self.shadow);
        if self.rds.decode_station_name(&blocks) {
            Some(self.rds.station_name())
        } else {
            None
        }
    }

    /// 64 character radio text, updated from the current group when it is 2A
    ///
    /// None when the current group is not 2A.
    pub fn rds_program_information(&mut self) -> Option<&[u8]> {
        let blocks = RdsBlocks::from_shadow(&self.shadow);
        if self.rds.decode_program_info(&blocks) {
            Some(self.rds.program_info())
        } else {
            None
        }
    }

    /// 32 character radio text, updated from the current group when it is 2B
    ///
    /// None when the current group is not 2B.
    pub fn rds_station_information(&mut self) -> Option<&[u8]> {
        let blocks = RdsBlocks::from_shadow(&self.shadow);
        if self.rds.decode_station_info(&blocks) {
            Some(self.rds.station_info())
        } else {
            None
        }
    }

    /// `"HH:MM +HH:MM"` UTC time of the current group
    ///
    /// None unless the current group is a valid 4A.
    pub fn rds_time(&mut self) -> Option<&str> {
        let blocks = RdsBlocks::from_shadow(&self.shadow);
        self.rds.decode_time(&blocks)
    }

    /// `"HH:MM"` local time of the current group
    ///
    /// None unless the current group is a valid 4A.
    pub fn rds_local_time(&mut self) -> Option<TimeText> {
        self.rds_date_time().map(|time| time.local_text())
    }

    /// Calendar date of the current group
    ///
    /// None unless the current group is a valid 4A.
    pub fn rds_date(&mut self) -> Option<RdsDate> {
        self.rds_date_time().map(|time| time.date())
    }

    fn rds_date_time(&mut self) -> Option<RdsDateTime> {
        self.rds_time()?;
        self.rds.date_time()
    }

    /// Accumulated decode buffers
    pub fn rds_decoder(&mut self) -> &mut RdsDecoder {
        &mut self.rds
    }

    /// Zero every decode buffer
    pub fn clear_rds_buffers(&mut self) {
        self.rds.clear();
    }
}
