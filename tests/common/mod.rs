//! Scripted embedded-hal doubles shared by the integration tests
//!
//! Each double hands out a cloneable handle so a test can inspect traffic
//! while the driver still owns the peripheral.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use si470x_fm::config::Si470xConfig;
use si470x_fm::Si470x;

// ============================================================================
// I2C
// ============================================================================

/// One recorded bus operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    /// Read of `len` bytes
    Read { addr: u8, len: usize },
    /// Write of `bytes`
    Write { addr: u8, bytes: Vec<u8> },
}

impl Op {
    pub fn is_read(&self, len: usize) -> bool {
        matches!(self, Op::Read { len: l, .. } if *l == len)
    }

    pub fn is_write(&self, len: usize) -> bool {
        matches!(self, Op::Write { bytes, .. } if bytes.len() == len)
    }
}

#[derive(Default)]
struct BusState {
    ops: Vec<Op>,
    reads: VecDeque<Vec<u8>>,
    device: Option<u8>,
    fail: bool,
    fail_after: Option<usize>,
}

/// I2C double: records operations, replays queued read payloads
///
/// An empty queue reads back zeros.
#[derive(Clone, Default)]
pub struct MockI2c {
    state: Rc<RefCell<BusState>>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only `addr` acknowledges
    pub fn with_device(addr: u8) -> Self {
        let mock = Self::new();
        mock.state.borrow_mut().device = Some(addr);
        mock
    }

    /// Queue the payload of the next read
    pub fn queue_read(&self, bytes: Vec<u8>) {
        self.state.borrow_mut().reads.push_back(bytes);
    }

    /// Make every following transaction fail
    pub fn fail(&self) {
        self.state.borrow_mut().fail = true;
    }

    /// Make every transaction fail once `ops` operations have been recorded
    pub fn fail_after(&self, ops: usize) {
        self.state.borrow_mut().fail_after = Some(ops);
    }

    /// Let transactions succeed again
    pub fn recover(&self) {
        let mut state = self.state.borrow_mut();
        state.fail = false;
        state.fail_after = None;
    }

    pub fn ops(&self) -> Vec<Op> {
        self.state.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.borrow_mut().ops.clear();
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Write { bytes, .. } => Some(bytes.clone()),
                Op::Read { .. } => None,
            })
            .collect()
    }

    pub fn last_write(&self) -> Option<Vec<u8>> {
        self.writes().pop()
    }
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.fail || state.fail_after.is_some_and(|n| state.ops.len() >= n) {
            return Err(ErrorKind::Bus);
        }
        if state.device.is_some_and(|dev| dev != address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Read(buf) => {
                    state.ops.push(Op::Read {
                        addr: address,
                        len: buf.len(),
                    });
                    let data = state.reads.pop_front().unwrap_or_default();
                    for (dst, src) in buf.iter_mut().zip(data.iter().chain(std::iter::repeat(&0))) {
                        *dst = *src;
                    }
                }
                Operation::Write(bytes) => state.ops.push(Op::Write {
                    addr: address,
                    bytes: bytes.to_vec(),
                }),
            }
        }
        Ok(())
    }
}

// ============================================================================
// Delay
// ============================================================================

/// Delay double: adds up the requested time
#[derive(Clone, Default)]
pub struct MockDelay {
    total_ns: Rc<Cell<u64>>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns.get() / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ns));
    }
}

// ============================================================================
// Output pin
// ============================================================================

/// Pin double: records every level written (true = high)
#[derive(Clone, Default)]
pub struct MockPin {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }
}

impl PinErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}

// ============================================================================
// Wire images
// ============================================================================

/// Full 32-byte read image of a register bank (wire order from 0x0A)
pub fn wire_image(regs: &[u16; 16]) -> Vec<u8> {
    (0..16)
        .map(|i| regs[(0x0A + i) % 16])
        .flat_map(u16::to_be_bytes)
        .collect()
}

/// First `count` registers of the read sequence
pub fn wire_prefix(regs: &[u16; 16], count: usize) -> Vec<u8> {
    wire_image(regs)[..count * 2].to_vec()
}

/// Two-byte status read
pub fn status(word: u16) -> Vec<u8> {
    word.to_be_bytes().to_vec()
}

/// STC bit of the status register
pub const STC: u16 = 1 << 14;

/// RDSR bit of the status register
pub const RDSR: u16 = 1 << 15;

/// SF/BL bit of the status register
pub const SF_BL: u16 = 1 << 13;

// ============================================================================
// Driver fixture
// ============================================================================

pub type TestRadio = Si470x<MockI2c, MockDelay, MockPin>;

pub struct Fixture {
    pub radio: TestRadio,
    pub bus: MockI2c,
    pub delay: MockDelay,
    pub reset: MockPin,
}

pub fn fixture(config: Si470xConfig) -> Fixture {
    let bus = MockI2c::with_device(0x10);
    let delay = MockDelay::new();
    let reset = MockPin::new();
    let radio = Si470x::new(bus.clone(), delay.clone(), reset.clone(), config);
    Fixture {
        radio,
        bus,
        delay,
        reset,
    }
}

pub fn default_fixture() -> Fixture {
    fixture(Si470xConfig::default())
}
