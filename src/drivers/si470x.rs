//! `Si4702`/`Si4703` FM Receiver Driver
//!
//! Every operation follows the same pattern: change fields on the shadow
//! copy, then flush registers 0x02..=0x07 in one write. Reads refresh the
//! whole bank (or the status/RDS prefix of the read sequence).
//!
//! Tuning, seeking and RDS accessors live in the `tuning` and `rds`
//! submodules; this file holds power control and audio configuration.

mod rds;
mod tuning;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;

use crate::config::{Si470xConfig, POWER_DOWN_SETTLE_MS, POWER_UP_SETTLE_MS};
use crate::hal::gpio::ResetLine;
use crate::hal::i2c::I2cAddress;
use crate::radio::state::TuningState;
use crate::radio::tune::{TuneSequencer, TuneState};
use crate::rds::RdsDecoder;
use crate::registers::{
    reg, ChipId, DeviceId, PowerConfig, ShadowRegisters, StatusRssi, SysConfig1, SysConfig2,
    SysConfig3, Test1,
};
use crate::types::{
    Band, DeEmphasis, Error, RdsMode, SoftmuteAttenuation, SoftmuteRate, Space, Volume,
};

/// Driver result for a given bus error type
pub type DriverResult<T, E> = Result<T, Error<E>>;

/// GPIO2 function that routes STC/RDS interrupts
const GPIO2_INTERRUPT: u8 = 0b01;

/// Default stereo/mono blend threshold
const BLEND_DEFAULT: u8 = 0b01;

/// Chip identification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipInfo {
    /// Part number (0x01 = Si4702/03)
    pub part_number: u8,
    /// Manufacturer ID (0x242)
    pub manufacturer_id: u16,
    /// Chip revision
    pub revision: u8,
    /// Device code (0b0001 Si4702, 0b1001 Si4703 when powered up)
    pub device: u8,
    /// Firmware version (0 while powered down)
    pub firmware: u8,
}

impl ChipInfo {
    /// Decode the identification registers of a shadow bank
    #[must_use]
    pub fn from_shadow(shadow: &ShadowRegisters) -> Self {
        let device_id = shadow.view::<DeviceId>();
        let chip_id = shadow.view::<ChipId>();
        Self {
            part_number: device_id.part_number(),
            manufacturer_id: device_id.manufacturer_id(),
            revision: chip_id.revision(),
            device: chip_id.device(),
            firmware: chip_id.firmware(),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChipInfo {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "PN {=u8:#x} MFG {=u16:#x} REV {=u8:#x} DEV {=u8:#x} FW {=u8}",
            self.part_number,
            self.manufacturer_id,
            self.revision,
            self.device,
            self.firmware
        );
    }
}

/// `Si4702`/`Si4703` driver
pub struct Si470x<I2C, D, RST> {
    transport: crate::transaction::RegisterTransport<I2C>,
    delay: D,
    reset: ResetLine<RST>,
    config: Si470xConfig,
    shadow: ShadowRegisters,
    state: TuningState,
    tune: TuneSequencer,
    rds: RdsDecoder,
    seek_failed: bool,
}

impl<I2C, D, RST> Si470x<I2C, D, RST>
where
    I2C: I2c,
    D: DelayNs,
    RST: OutputPin,
{
    /// Create a driver; nothing is sent until [`Self::setup`]
    #[must_use]
    pub fn new(i2c: I2C, delay: D, reset: RST, config: Si470xConfig) -> Self {
        Self {
            transport: crate::transaction::RegisterTransport::new(i2c, config.address),
            delay,
            reset: ResetLine::new(reset),
            config,
            shadow: ShadowRegisters::new(),
            state: TuningState::new(config.band, config.space, config.volume, config.oscillator),
            tune: TuneSequencer::new(config.max_polls()),
            rds: RdsDecoder::new(),
            seek_failed: false,
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &Si470xConfig {
        &self.config
    }

    /// Bus address in use
    #[must_use]
    pub const fn address(&self) -> I2cAddress {
        self.transport.address()
    }

    /// Cached tuning parameters
    #[must_use]
    pub const fn tuning_state(&self) -> &TuningState {
        &self.state
    }

    /// Tune/seek handshake state
    #[must_use]
    pub const fn tune_state(&self) -> TuneState {
        self.tune.state()
    }

    /// Shadow register bank
    #[must_use]
    pub const fn shadow(&self) -> &ShadowRegisters {
        &self.shadow
    }

    // ========================================================================
    // Power
    // ========================================================================

    /// Pulse the reset line
    ///
    /// # Errors
    /// `ResetPin` if the line cannot be driven.
    pub fn reset(&mut self) -> DriverResult<(), I2C::Error> {
        debug!("si470x: reset");
        self.reset
            .pulse(&mut self.delay)
            .map_err(|_| Error::ResetPin)
    }

    /// Reset and power up
    ///
    /// # Errors
    /// Reset pin or bus failure.
    pub fn setup(&mut self) -> DriverResult<(), I2C::Error> {
        self.reset()?;
        self.power_up()
    }

    /// Start the oscillator, enable the chip and apply the configured
    /// band, spacing, de-emphasis and volume
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn power_up(&mut self) -> DriverResult<(), I2C::Error> {
        let config = self.config;

        self.refresh()?;
        self.shadow.modify::<Test1>(|r| {
            r.set_xoscen(config.oscillator.xoscen());
            r.set_ahizen(false);
        });
        self.flush()?;
        debug!("si470x: oscillator start, waiting {=u32} ms", config.crystal_settle_ms);
        self.delay.delay_ms(config.crystal_settle_ms);

        self.refresh()?;
        self.shadow.modify::<PowerConfig>(|r| {
            r.set_dsmute(true);
            r.set_dmute(true);
            r.set_mono(false);
            r.set_rdsm(false);
            r.set_skmode(false);
            r.set_seekup(false);
            r.set_seek(false);
            r.set_disable(false);
            r.set_enable(true);
        });
        self.shadow.modify::<SysConfig1>(|r| {
            r.set_rdsien(config.rds_interrupt);
            r.set_stcien(config.seek_interrupt);
            r.set_rds(false);
            r.set_de(matches!(config.de_emphasis, DeEmphasis::Us50));
            r.set_agcd(false);
            r.set_blndadj(BLEND_DEFAULT);
            r.set_gpio3(0);
            r.set_gpio2(if config.gpio2_interrupt() { GPIO2_INTERRUPT } else { 0 });
            r.set_gpio1(0);
        });
        self.shadow.modify::<SysConfig2>(|r| {
            r.set_seekth(0);
            r.set_band(config.band.bits());
            r.set_space(config.space.bits());
            r.set_volume(config.volume.level());
        });
        self.shadow.modify::<SysConfig3>(|r| {
            r.set_smuter(0);
            r.set_smutea(0);
            r.set_volext(false);
            r.set_sksnr(0);
            r.set_skcnt(0);
        });
        self.flush()?;
        self.delay.delay_ms(POWER_UP_SETTLE_MS);
        self.refresh()?;
        self.delay.delay_ms(POWER_UP_SETTLE_MS);

        self.state = TuningState::new(config.band, config.space, config.volume, config.oscillator);
        self.tune.abort();
        self.rds.clear();
        self.seek_failed = false;
        info!("si470x: powered up, {}", ChipInfo::from_shadow(&self.shadow));
        Ok(())
    }

    /// Put the chip into its low power state
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn power_down(&mut self) -> DriverResult<(), I2C::Error> {
        self.refresh()?;
        self.shadow.modify::<Test1>(|r| r.set_ahizen(true));
        self.shadow.modify::<SysConfig1>(|r| {
            r.set_rds(false);
            r.set_gpio3(0);
            r.set_gpio2(0);
            r.set_gpio1(0);
        });
        self.shadow.modify::<PowerConfig>(|r| {
            r.set_enable(true);
            r.set_disable(true);
        });
        self.rds.clear();
        self.flush()?;
        self.delay.delay_ms(POWER_DOWN_SETTLE_MS);
        self.tune.abort();
        debug!("si470x: powered down");
        Ok(())
    }

    // ========================================================================
    // Register access
    // ========================================================================

    /// Read all sixteen registers into the shadow bank
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn refresh(&mut self) -> DriverResult<(), I2C::Error> {
        self.transport.read_all(&mut self.shadow).map_err(Error::I2c)
    }

    /// Read only the status register
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn refresh_status(&mut self) -> DriverResult<(), I2C::Error> {
        self.transport.read_status(&mut self.shadow).map_err(Error::I2c)
    }

    /// Write registers 0x02..=0x07
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn flush(&mut self) -> DriverResult<(), I2C::Error> {
        self.flush_through(reg::WRITE_END)
    }

    /// Write registers 0x02 through `upper` (clamped to 0x07)
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn flush_through(&mut self, upper: u8) -> DriverResult<(), I2C::Error> {
        self.transport
            .write_registers(&self.shadow, upper)
            .map_err(Error::I2c)
    }

    /// Shadow value of one register, 0 for addresses above 0x0F
    #[must_use]
    pub fn shadow_register(&self, addr: u8) -> u16 {
        self.shadow.get(addr)
    }

    /// Overwrite one shadow register; ignored above 0x0F
    ///
    /// Nothing reaches the chip until the next flush.
    pub fn set_shadow_register(&mut self, addr: u8, value: u16) {
        self.shadow.set(addr, value);
    }

    /// Scan the bus for responding addresses
    pub fn scan_bus(&mut self) -> heapless::Vec<I2cAddress, 16> {
        self.transport.scan()
    }

    /// Give back the bus, delay and reset pin
    pub fn release(self) -> (I2C, D, RST) {
        (self.transport.release(), self.delay, self.reset.release())
    }

    // ========================================================================
    // Band and audio
    // ========================================================================

    /// Select the band preset
    ///
    /// A cached frequency outside the new band moves to the band start; the
    /// chip keeps playing its current channel until the next tune.
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_band(&mut self, band: Band) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<SysConfig2>(|r| r.set_band(band.bits()));
        self.flush()?;
        self.state = self.state.with_band(band).snapped();
        Ok(())
    }

    /// Select the channel spacing
    ///
    /// The cached frequency is rounded down onto the new grid.
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_space(&mut self, space: Space) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<SysConfig2>(|r| r.set_space(space.bits()));
        self.flush()?;
        self.state = self.state.with_space(space).snapped();
        Ok(())
    }

    /// Set the volume, 0..=15
    ///
    /// # Errors
    /// `InvalidParameter` above 15 (nothing is changed), or a bus failure.
    pub fn set_volume(&mut self, level: u8) -> DriverResult<(), I2C::Error> {
        let Some(volume) = Volume::new(level) else {
            warn!("si470x: volume {=u8} rejected", level);
            return Err(Error::InvalidParameter);
        };
        self.apply_volume(volume)
    }

    /// Current volume
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.state.volume()
    }

    /// One step louder, stops at 15
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn volume_up(&mut self) -> DriverResult<(), I2C::Error> {
        self.apply_volume(self.state.volume().up())
    }

    /// One step quieter, stops at 0
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn volume_down(&mut self) -> DriverResult<(), I2C::Error> {
        self.apply_volume(self.state.volume().down())
    }

    fn apply_volume(&mut self, volume: Volume) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<SysConfig2>(|r| r.set_volume(volume.level()));
        self.flush()?;
        self.state = self.state.with_volume(volume);
        Ok(())
    }

    /// Extended volume range (attenuates by a further 30 dB)
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_extended_volume(&mut self, enabled: bool) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<SysConfig3>(|r| r.set_volext(enabled));
        self.flush()
    }

    /// Mute or unmute the audio output
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_mute(&mut self, muted: bool) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<PowerConfig>(|r| r.set_dmute(!muted));
        self.flush()
    }

    /// Check whether the audio output is muted
    #[must_use]
    pub fn is_muted(&self) -> bool {
        !self.shadow.view::<PowerConfig>().dmute()
    }

    /// Force mono output
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_mono(&mut self, mono: bool) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<PowerConfig>(|r| r.set_mono(mono));
        self.flush()
    }

    /// Enable or disable softmute
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_softmute(&mut self, enabled: bool) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<PowerConfig>(|r| r.set_dsmute(!enabled));
        self.flush()
    }

    /// Softmute attack/recover rate
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_softmute_rate(&mut self, rate: SoftmuteRate) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<SysConfig3>(|r| r.set_smuter(rate.bits()));
        self.flush()
    }

    /// Softmute attenuation
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_softmute_attenuation(
        &mut self,
        attenuation: SoftmuteAttenuation,
    ) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<SysConfig3>(|r| r.set_smutea(attenuation.bits()));
        self.flush()
    }

    /// Enable or disable automatic gain control
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_agc(&mut self, enabled: bool) -> DriverResult<(), I2C::Error> {
        self.shadow.modify::<SysConfig1>(|r| r.set_agcd(!enabled));
        self.flush()
    }

    /// De-emphasis time constant
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_de_emphasis(&mut self, de_emphasis: DeEmphasis) -> DriverResult<(), I2C::Error> {
        self.shadow
            .modify::<SysConfig1>(|r| r.set_de(matches!(de_emphasis, DeEmphasis::Us50)));
        self.flush()
    }

    /// RDS reporting mode; decoding is the same in both modes
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn set_rds_mode(&mut self, mode: RdsMode) -> DriverResult<(), I2C::Error> {
        self.shadow
            .modify::<PowerConfig>(|r| r.set_rdsm(matches!(mode, RdsMode::Verbose)));
        self.flush()
    }

    // ========================================================================
    // Status and identification
    // ========================================================================

    /// Received signal strength in dBµV (reads the status register)
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn rssi(&mut self) -> DriverResult<u8, I2C::Error> {
        self.refresh_status()?;
        Ok(self.shadow.view::<StatusRssi>().rssi())
    }

    /// Stereo pilot detected (reads the status register)
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn is_stereo(&mut self) -> DriverResult<bool, I2C::Error> {
        self.refresh_status()?;
        Ok(self.shadow.view::<StatusRssi>().st())
    }

    /// Read and decode the identification registers
    ///
    /// # Errors
    /// Propagates bus failures.
    pub fn chip_info(&mut self) -> DriverResult<ChipInfo, I2C::Error> {
        self.refresh()?;
        Ok(ChipInfo::from_shadow(&self.shadow))
    }

    /// Part number from the last read
    #[must_use]
    pub fn part_number(&self) -> u8 {
        self.shadow.view::<DeviceId>().part_number()
    }

    /// Manufacturer ID from the last read
    #[must_use]
    pub fn manufacturer_id(&self) -> u16 {
        self.shadow.view::<DeviceId>().manufacturer_id()
    }

    /// Firmware version from the last read
    #[must_use]
    pub fn firmware_version(&self) -> u8 {
        self.shadow.view::<ChipId>().firmware()
    }

    /// Device code from the last read
    #[must_use]
    pub fn device(&self) -> u8 {
        self.shadow.view::<ChipId>().device()
    }

    /// Chip revision from the last read
    #[must_use]
    pub fn chip_revision(&self) -> u8 {
        self.shadow.view::<ChipId>().revision()
    }
}
