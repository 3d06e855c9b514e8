//! Si470x register map
//!
//! The chip has sixteen 16-bit registers. [`ShadowRegisters`] is the host
//! side mirror; the bitfield views below reinterpret one mirrored word each.
//! A view owns a copy of the word, so reading a view, changing a field and
//! storing it back is a plain read-modify-write of that word.

use bitfield::bitfield;

/// Si470x register addresses
pub mod reg {
    /// Device ID (read-only)
    pub const DEVICE_ID: u8 = 0x00;
    /// Chip ID (read-only)
    pub const CHIP_ID: u8 = 0x01;
    /// Power configuration
    pub const POWER_CONFIG: u8 = 0x02;
    /// Channel
    pub const CHANNEL: u8 = 0x03;
    /// System configuration 1
    pub const SYS_CONFIG1: u8 = 0x04;
    /// System configuration 2
    pub const SYS_CONFIG2: u8 = 0x05;
    /// System configuration 3
    pub const SYS_CONFIG3: u8 = 0x06;
    /// Test 1 (oscillator, audio high-Z)
    pub const TEST1: u8 = 0x07;
    /// Test 2 (reserved)
    pub const TEST2: u8 = 0x08;
    /// Boot configuration (reserved)
    pub const BOOT_CONFIG: u8 = 0x09;
    /// Status and RSSI (read-only)
    pub const STATUS_RSSI: u8 = 0x0A;
    /// Read channel (read-only)
    pub const READ_CHANNEL: u8 = 0x0B;
    /// RDS block A (read-only)
    pub const RDS_A: u8 = 0x0C;
    /// RDS block B (read-only)
    pub const RDS_B: u8 = 0x0D;
    /// RDS block C (read-only)
    pub const RDS_C: u8 = 0x0E;
    /// RDS block D (read-only)
    pub const RDS_D: u8 = 0x0F;

    /// First register of every write transaction
    pub const WRITE_START: u8 = POWER_CONFIG;
    /// Last register of the documented configuration range
    pub const WRITE_END: u8 = TEST1;
    /// First register of every read transaction
    pub const READ_START: u8 = STATUS_RSSI;
    /// Last addressable register
    pub const LAST: u8 = RDS_D;
}

/// Number of addressable registers
pub const REGISTER_COUNT: usize = 16;

/// A bitfield view bound to one register address
pub trait Register: Copy {
    /// Register address of this view
    const ADDRESS: u8;

    /// Reinterpret a raw register word
    fn from_raw(raw: u16) -> Self;

    /// The raw register word
    fn raw(self) -> u16;
}

macro_rules! register_impl {
    ($type:ident, $addr:expr) => {
        impl Register for $type {
            const ADDRESS: u8 = $addr;

            fn from_raw(raw: u16) -> Self {
                Self(raw)
            }

            fn raw(self) -> u16 {
                self.0
            }
        }
    };
}

bitfield! {
    /// Register 0x00: device identification
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct DeviceId(u16);
    impl Debug;
    /// Part number
    pub u8, part_number, set_part_number: 15, 12;
    /// Manufacturer ID
    pub u16, manufacturer_id, set_manufacturer_id: 11, 0;
}
register_impl!(DeviceId, reg::DEVICE_ID);

bitfield! {
    /// Register 0x01: chip identification
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct ChipId(u16);
    impl Debug;
    /// Chip revision (0x04 = rev C)
    pub u8, revision, set_revision: 15, 10;
    /// Device: 0b0001 Si4702 powered up, 0b1001 Si4703 powered up
    pub u8, device, set_device: 9, 6;
    /// Firmware version
    pub u8, firmware, set_firmware: 5, 0;
}
register_impl!(ChipId, reg::CHIP_ID);

bitfield! {
    /// Register 0x02: power configuration
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct PowerConfig(u16);
    impl Debug;
    /// Softmute disable
    pub dsmute, set_dsmute: 15;
    /// Mute disable
    pub dmute, set_dmute: 14;
    /// Force mono
    pub mono, set_mono: 13;
    /// RDS verbose mode
    pub rdsm, set_rdsm: 11;
    /// Seek mode: stop at band limit when set
    pub skmode, set_skmode: 10;
    /// Seek up when set
    pub seekup, set_seekup: 9;
    /// Seek enable
    pub seek, set_seek: 8;
    /// Powerup disable
    pub disable, set_disable: 6;
    /// Powerup enable
    pub enable, set_enable: 0;
}
register_impl!(PowerConfig, reg::POWER_CONFIG);

bitfield! {
    /// Register 0x03: channel
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Channel(u16);
    impl Debug;
    /// Tune enable
    pub tune, set_tune: 15;
    /// Channel select
    pub u16, chan, set_chan: 9, 0;
}
register_impl!(Channel, reg::CHANNEL);

bitfield! {
    /// Register 0x04: system configuration 1
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct SysConfig1(u16);
    impl Debug;
    /// RDS interrupt enable
    pub rdsien, set_rdsien: 15;
    /// Seek/tune complete interrupt enable
    pub stcien, set_stcien: 14;
    /// RDS enable
    pub rds, set_rds: 12;
    /// De-emphasis: 50 µs when set
    pub de, set_de: 11;
    /// AGC disable
    pub agcd, set_agcd: 10;
    /// Stereo/mono blend level adjustment
    pub u8, blndadj, set_blndadj: 7, 6;
    /// GPIO3 function
    pub u8, gpio3, set_gpio3: 5, 4;
    /// GPIO2 function (0b01 routes STC/RDS interrupts)
    pub u8, gpio2, set_gpio2: 3, 2;
    /// GPIO1 function
    pub u8, gpio1, set_gpio1: 1, 0;
}
register_impl!(SysConfig1, reg::SYS_CONFIG1);

bitfield! {
    /// Register 0x05: system configuration 2
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct SysConfig2(u16);
    impl Debug;
    /// RSSI seek threshold
    pub u8, seekth, set_seekth: 15, 8;
    /// Band select
    pub u8, band, set_band: 7, 6;
    /// Channel spacing
    pub u8, space, set_space: 5, 4;
    /// Volume
    pub u8, volume, set_volume: 3, 0;
}
register_impl!(SysConfig2, reg::SYS_CONFIG2);

bitfield! {
    /// Register 0x06: system configuration 3
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct SysConfig3(u16);
    impl Debug;
    /// Softmute attack/recover rate
    pub u8, smuter, set_smuter: 15, 14;
    /// Softmute attenuation
    pub u8, smutea, set_smutea: 13, 12;
    /// Extended volume range (-30 dB)
    pub volext, set_volext: 8;
    /// Seek SNR threshold
    pub u8, sksnr, set_sksnr: 7, 4;
    /// Seek FM impulse detection threshold
    pub u8, skcnt, set_skcnt: 3, 0;
}
register_impl!(SysConfig3, reg::SYS_CONFIG3);

bitfield! {
    /// Register 0x07: test 1
    ///
    /// Bits 13:0 are reserved and must keep the value read from the chip.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct Test1(u16);
    impl Debug;
    /// Crystal oscillator enable
    pub xoscen, set_xoscen: 15;
    /// Audio high-Z enable
    pub ahizen, set_ahizen: 14;
    /// Reserved bits
    pub u16, reserved, _: 13, 0;
}
register_impl!(Test1, reg::TEST1);

bitfield! {
    /// Register 0x0A: status and RSSI
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct StatusRssi(u16);
    impl Debug;
    /// New RDS group ready
    pub rdsr, set_rdsr: 15;
    /// Seek/tune complete
    pub stc, set_stc: 14;
    /// Seek fail / band limit reached
    pub sf_bl, set_sf_bl: 13;
    /// AFC railed (invalid channel)
    pub afcrl, set_afcrl: 12;
    /// RDS decoder synchronized
    pub rdss, set_rdss: 11;
    /// RDS block A errors
    pub u8, blera, set_blera: 10, 9;
    /// Stereo indicator
    pub st, set_st: 8;
    /// Received signal strength in dBµV
    pub u8, rssi, set_rssi: 7, 0;
}
register_impl!(StatusRssi, reg::STATUS_RSSI);

bitfield! {
    /// Register 0x0B: read channel
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct ReadChannel(u16);
    impl Debug;
    /// RDS block B errors
    pub u8, blerb, set_blerb: 15, 14;
    /// RDS block C errors
    pub u8, blerc, set_blerc: 13, 12;
    /// RDS block D errors
    pub u8, blerd, set_blerd: 11, 10;
    /// Currently tuned channel, updated during seek
    pub u16, readchan, set_readchan: 9, 0;
}
register_impl!(ReadChannel, reg::READ_CHANNEL);

/// Host-side mirror of the sixteen device registers
///
/// Reads and writes here never touch the bus. Addresses outside 0x00..=0x0F
/// are ignored on write and read back as 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShadowRegisters {
    words: [u16; REGISTER_COUNT],
}

impl ShadowRegisters {
    /// Create a bank with every register cleared
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: [0; REGISTER_COUNT],
        }
    }

    /// Get a register value
    #[must_use]
    pub fn get(&self, addr: u8) -> u16 {
        self.words.get(usize::from(addr)).copied().unwrap_or(0)
    }

    /// Set a register value (local mirror only)
    pub fn set(&mut self, addr: u8, value: u16) {
        if let Some(word) = self.words.get_mut(usize::from(addr)) {
            *word = value;
        }
    }

    /// All registers in logical address order
    #[must_use]
    pub const fn words(&self) -> &[u16; REGISTER_COUNT] {
        &self.words
    }

    /// Decode a register through its typed view
    #[must_use]
    pub fn view<R: Register>(&self) -> R {
        R::from_raw(self.get(R::ADDRESS))
    }

    /// Store a typed view back into its register
    pub fn store<R: Register>(&mut self, register: R) {
        self.set(R::ADDRESS, register.raw());
    }

    /// Read-modify-write one register through its typed view
    pub fn modify<R: Register>(&mut self, f: impl FnOnce(&mut R)) {
        let mut register = self.view::<R>();
        f(&mut register);
        self.store(register);
    }
}

impl Default for ShadowRegisters {
    fn default() -> Self {
        Self::new()
    }
}
