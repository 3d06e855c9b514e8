//! I2C Bus Abstractions
//!
//! Thin wrapper over a blocking `embedded-hal` I2C peripheral. The Si470x
//! has no register pointer byte: every read starts at 0x0A and every write
//! starts at 0x02, so only raw addressed reads and writes are needed.

use embedded_hal::i2c::I2c;

/// I2C device address wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Si4702/Si4703 tuner address
    pub const SI470X: Self = Self(0x10);

    /// First non-reserved 7-bit address
    pub const FIRST_USABLE: u8 = 0x08;

    /// One past the last non-reserved 7-bit address
    pub const END_USABLE: u8 = 0x78;

    /// Create from 7-bit address
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Get the 7-bit address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self.0
    }
}

impl Default for I2cAddress {
    fn default() -> Self {
        Self::SI470X
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for I2cAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:02X}", self.0);
    }
}

/// Owned I2C bus handle
pub struct I2cBus<I2C> {
    i2c: I2C,
}

impl<I2C: I2c> I2cBus<I2C> {
    /// Wrap a bus peripheral
    #[must_use]
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Write bytes to a device
    ///
    /// # Errors
    /// Propagates the peripheral's bus error.
    pub fn write(&mut self, addr: I2cAddress, data: &[u8]) -> Result<(), I2C::Error> {
        self.i2c.write(addr.addr(), data)
    }

    /// Read bytes from a device
    ///
    /// # Errors
    /// Propagates the peripheral's bus error.
    pub fn read(&mut self, addr: I2cAddress, buffer: &mut [u8]) -> Result<(), I2C::Error> {
        self.i2c.read(addr.addr(), buffer)
    }

    /// Try every non-reserved address with a one byte read
    ///
    /// Returns the addresses that acknowledged, up to 16 of them.
    pub fn scan(&mut self) -> heapless::Vec<I2cAddress, 16> {
        let mut devices = heapless::Vec::new();

        for addr in I2cAddress::FIRST_USABLE..I2cAddress::END_USABLE {
            let mut buf = [0u8; 1];
            if self.i2c.read(addr, &mut buf).is_ok() {
                trace!("i2c: device at {=u8:#x}", addr);
                if devices.push(I2cAddress::new(addr)).is_err() {
                    break;
                }
            }
        }

        devices
    }

    /// Give the peripheral back
    pub fn release(self) -> I2C {
        self.i2c
    }
}
