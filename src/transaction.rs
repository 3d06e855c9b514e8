//! Wire-order register transfers
//!
//! The chip's address counter is not programmable. A read always begins at
//! register 0x0A and wraps from 0x0F to 0x00; a write always begins at 0x02.
//! Every register travels high byte first.
//!
//! ```text
//! read  wire: 0A 0B 0C 0D 0E 0F 00 01 02 03 04 05 06 07 08 09
//! write wire: 02 03 04 05 06 07
//! ```

use embedded_hal::i2c::I2c;

use crate::hal::i2c::{I2cAddress, I2cBus};
use crate::registers::{reg, ShadowRegisters, REGISTER_COUNT};

/// Registers in a status-only read (0x0A)
pub const STATUS_READ: usize = 1;

/// Registers in an RDS window read (0x0A..=0x0F)
pub const RDS_READ: usize = 6;

/// Registers in a full read
pub const FULL_READ: usize = REGISTER_COUNT;

/// Largest write payload: 0x02..=0x07
pub const MAX_WRITE_BYTES: usize = ((reg::WRITE_END - reg::WRITE_START) as usize + 1) * 2;

/// Logical address of the `index`-th register on the read wire
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn wire_address(index: usize) -> u8 {
    ((reg::READ_START as usize + index) % REGISTER_COUNT) as u8
}

/// Store big-endian wire-order words into the shadow bank
///
/// A trailing odd byte and anything past sixteen registers are ignored.
pub fn deinterleave(shadow: &mut ShadowRegisters, wire: &[u8]) {
    for (index, pair) in wire.chunks_exact(2).take(REGISTER_COUNT).enumerate() {
        shadow.set(wire_address(index), u16::from_be_bytes([pair[0], pair[1]]));
    }
}

/// Encode registers 0x02 through `upper` for a write
///
/// `upper` is clamped to 0x07. Returns the number of bytes placed in `out`,
/// zero when `upper` is below 0x02.
pub fn encode_range(shadow: &ShadowRegisters, upper: u8, out: &mut [u8; MAX_WRITE_BYTES]) -> usize {
    let upper = upper.min(reg::WRITE_END);
    if upper < reg::WRITE_START {
        return 0;
    }

    let mut len = 0;
    for addr in reg::WRITE_START..=upper {
        let [hi, lo] = shadow.get(addr).to_be_bytes();
        out[len] = hi;
        out[len + 1] = lo;
        len += 2;
    }
    len
}

/// Register-level transport bound to one device address
pub struct RegisterTransport<I2C> {
    bus: I2cBus<I2C>,
    address: I2cAddress,
}

impl<I2C: I2c> RegisterTransport<I2C> {
    /// Bind a bus to a device address
    #[must_use]
    pub fn new(i2c: I2C, address: I2cAddress) -> Self {
        Self {
            bus: I2cBus::new(i2c),
            address,
        }
    }

    /// Device address in use
    #[must_use]
    pub const fn address(&self) -> I2cAddress {
        self.address
    }

    /// Read the first `count` registers of the wire sequence into `shadow`
    ///
    /// `count` is clamped to 16; zero issues no transaction.
    ///
    /// # Errors
    /// Propagates the bus error. The shadow bank is left untouched on failure.
    pub fn read_registers(
        &mut self,
        shadow: &mut ShadowRegisters,
        count: usize,
    ) -> Result<(), I2C::Error> {
        let count = count.min(REGISTER_COUNT);
        if count == 0 {
            return Ok(());
        }

        let mut wire = [0u8; REGISTER_COUNT * 2];
        let wire = &mut wire[..count * 2];
        self.bus.read(self.address, wire)?;
        deinterleave(shadow, wire);
        Ok(())
    }

    /// Read all sixteen registers
    ///
    /// # Errors
    /// Propagates the bus error.
    pub fn read_all(&mut self, shadow: &mut ShadowRegisters) -> Result<(), I2C::Error> {
        self.read_registers(shadow, FULL_READ)
    }

    /// Read only the status register (two bytes)
    ///
    /// # Errors
    /// Propagates the bus error.
    pub fn read_status(&mut self, shadow: &mut ShadowRegisters) -> Result<(), I2C::Error> {
        self.read_registers(shadow, STATUS_READ)
    }

    /// Read status, read channel and the four RDS blocks
    ///
    /// # Errors
    /// Propagates the bus error.
    pub fn read_rds_window(&mut self, shadow: &mut ShadowRegisters) -> Result<(), I2C::Error> {
        self.read_registers(shadow, RDS_READ)
    }

    /// Write registers 0x02 through `upper` in one transaction
    ///
    /// # Errors
    /// Propagates the bus error.
    pub fn write_registers(&mut self, shadow: &ShadowRegisters, upper: u8) -> Result<(), I2C::Error> {
        let mut wire = [0u8; MAX_WRITE_BYTES];
        let len = encode_range(shadow, upper, &mut wire);
        if len == 0 {
            return Ok(());
        }
        self.bus.write(self.address, &wire[..len])
    }

    /// Scan the bus for responding addresses
    pub fn scan(&mut self) -> heapless::Vec<I2cAddress, 16> {
        self.bus.scan()
    }

    /// Give the peripheral back
    pub fn release(self) -> I2C {
        self.bus.release()
    }
}
