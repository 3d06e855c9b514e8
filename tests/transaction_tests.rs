//! Tests for wire-order register transfers
//!
//! Run with: cargo test --no-default-features --features std --test transaction_tests

mod common;

use common::{wire_image, MockI2c, Op};
use embedded_hal::i2c::ErrorKind;
use si470x_fm::hal::i2c::I2cAddress;
use si470x_fm::registers::{reg, ShadowRegisters};
use si470x_fm::transaction::{
    deinterleave, encode_range, wire_address, RegisterTransport, MAX_WRITE_BYTES,
};

fn numbered_bank() -> [u16; 16] {
    let mut regs = [0u16; 16];
    for (addr, word) in regs.iter_mut().enumerate() {
        *word = 0x1100 * (addr as u16 % 16) + addr as u16;
    }
    regs
}

fn transport(bus: &MockI2c) -> RegisterTransport<MockI2c> {
    RegisterTransport::new(bus.clone(), I2cAddress::SI470X)
}

// ============================================================================
// Read Order Tests
// ============================================================================

#[test]
fn wire_order_starts_at_status_and_wraps() {
    let order: Vec<u8> = (0..16).map(wire_address).collect();
    assert_eq!(
        order,
        vec![0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09]
    );
}

#[test]
fn deinterleave_remaps_wrapped_stream() {
    let regs = numbered_bank();
    let mut shadow = ShadowRegisters::new();
    deinterleave(&mut shadow, &wire_image(&regs));
    assert_eq!(shadow.words(), &regs);
}

#[test]
fn deinterleave_is_big_endian() {
    let mut shadow = ShadowRegisters::new();
    deinterleave(&mut shadow, &[0x12, 0x34]);
    assert_eq!(shadow.get(reg::STATUS_RSSI), 0x1234);
}

#[test]
fn deinterleave_partial_leaves_rest() {
    let mut shadow = ShadowRegisters::new();
    shadow.set(reg::POWER_CONFIG, 0x4001);
    deinterleave(&mut shadow, &[0xAA, 0xBB, 0xCC, 0xDD]);
    assert_eq!(shadow.get(reg::STATUS_RSSI), 0xAABB);
    assert_eq!(shadow.get(reg::READ_CHANNEL), 0xCCDD);
    assert_eq!(shadow.get(reg::POWER_CONFIG), 0x4001);
}

#[test]
fn deinterleave_ignores_odd_trailing_byte() {
    let mut shadow = ShadowRegisters::new();
    deinterleave(&mut shadow, &[0x01, 0x02, 0x03]);
    assert_eq!(shadow.get(reg::STATUS_RSSI), 0x0102);
    assert_eq!(shadow.get(reg::READ_CHANNEL), 0);
}

// ============================================================================
// Write Encoding Tests
// ============================================================================

#[test]
fn encode_full_configuration_range() {
    let mut shadow = ShadowRegisters::new();
    for (addr, word) in numbered_bank().iter().enumerate() {
        shadow.set(addr as u8, *word);
    }
    let mut out = [0u8; MAX_WRITE_BYTES];
    let len = encode_range(&shadow, 0x07, &mut out);
    assert_eq!(len, 12);
    for (i, addr) in (0x02..=0x07u16).enumerate() {
        let word = 0x1100 * addr + addr;
        assert_eq!(&out[i * 2..i * 2 + 2], &word.to_be_bytes());
    }
}

#[test]
fn encode_bound_limits_pairs() {
    let shadow = ShadowRegisters::new();
    let mut out = [0u8; MAX_WRITE_BYTES];
    assert_eq!(encode_range(&shadow, 0x04, &mut out), 6);
    assert_eq!(encode_range(&shadow, 0x02, &mut out), 2);
}

#[test]
fn encode_bound_clamps_to_configuration_range() {
    let shadow = ShadowRegisters::new();
    let mut out = [0u8; MAX_WRITE_BYTES];
    assert_eq!(encode_range(&shadow, 0x0F, &mut out), 12);
    assert_eq!(encode_range(&shadow, 0x09, &mut out), 12);
}

#[test]
fn encode_bound_below_start_is_empty() {
    let shadow = ShadowRegisters::new();
    let mut out = [0u8; MAX_WRITE_BYTES];
    assert_eq!(encode_range(&shadow, 0x01, &mut out), 0);
    assert_eq!(encode_range(&shadow, 0x00, &mut out), 0);
}

// ============================================================================
// Transport Tests
// ============================================================================

#[test]
fn bulk_read_fills_shadow() {
    let bus = MockI2c::new();
    let regs = numbered_bank();
    bus.queue_read(wire_image(&regs));

    let mut shadow = ShadowRegisters::new();
    transport(&bus).read_all(&mut shadow).unwrap();

    assert_eq!(shadow.words(), &regs);
    assert_eq!(bus.ops(), vec![Op::Read { addr: 0x10, len: 32 }]);
}

#[test]
fn status_read_is_two_bytes() {
    let bus = MockI2c::new();
    bus.queue_read(vec![0x40, 0x00]);

    let mut shadow = ShadowRegisters::new();
    transport(&bus).read_status(&mut shadow).unwrap();

    assert_eq!(shadow.get(reg::STATUS_RSSI), 0x4000);
    assert!(bus.ops()[0].is_read(2));
}

#[test]
fn rds_window_read_is_twelve_bytes() {
    let bus = MockI2c::new();
    let regs = numbered_bank();
    bus.queue_read(wire_image(&regs)[..12].to_vec());

    let mut shadow = ShadowRegisters::new();
    transport(&bus).read_rds_window(&mut shadow).unwrap();

    assert!(bus.ops()[0].is_read(12));
    for addr in 0x0A..=0x0F {
        assert_eq!(shadow.get(addr), regs[usize::from(addr)]);
    }
    assert_eq!(shadow.get(reg::DEVICE_ID), 0);
}

#[test]
fn zero_count_read_issues_nothing() {
    let bus = MockI2c::new();
    let mut shadow = ShadowRegisters::new();
    transport(&bus).read_registers(&mut shadow, 0).unwrap();
    assert!(bus.ops().is_empty());
}

#[test]
fn bounded_write_through_0x07_sends_six_pairs() {
    let bus = MockI2c::new();
    let mut shadow = ShadowRegisters::new();
    shadow.set(reg::POWER_CONFIG, 0x4001);
    shadow.set(reg::TEST1, 0x8100);
    shadow.set(0x08, 0xDEAD);
    shadow.set(0x0A, 0xBEEF);

    transport(&bus).write_registers(&shadow, 0x07).unwrap();

    let writes = bus.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].len(), 12);
    assert_eq!(&writes[0][..2], &[0x40, 0x01]);
    assert_eq!(&writes[0][10..], &[0x81, 0x00]);
}

#[test]
fn bounded_write_through_0x04_sends_three_pairs() {
    let bus = MockI2c::new();
    let mut shadow = ShadowRegisters::new();
    shadow.set(reg::SYS_CONFIG1, 0x1000);
    shadow.set(reg::SYS_CONFIG2, 0xFFFF);
    shadow.set(0x08, 0xDEAD);

    transport(&bus).write_registers(&shadow, 0x04).unwrap();

    let write = bus.last_write().unwrap();
    assert_eq!(write, vec![0x00, 0x00, 0x00, 0x00, 0x10, 0x00]);
}

#[test]
fn write_below_start_issues_nothing() {
    let bus = MockI2c::new();
    let shadow = ShadowRegisters::new();
    transport(&bus).write_registers(&shadow, 0x01).unwrap();
    assert!(bus.ops().is_empty());
}

#[test]
fn bus_error_propagates_and_keeps_shadow() {
    let bus = MockI2c::new();
    bus.fail();
    let mut shadow = ShadowRegisters::new();
    shadow.set(reg::STATUS_RSSI, 0x1234);

    let mut t = transport(&bus);
    assert_eq!(t.read_all(&mut shadow), Err(ErrorKind::Bus));
    assert_eq!(t.write_registers(&shadow, 0x07), Err(ErrorKind::Bus));
    assert_eq!(shadow.get(reg::STATUS_RSSI), 0x1234);
}

// ============================================================================
// Bus Scan Tests
// ============================================================================

#[test]
fn scan_finds_only_acknowledging_device() {
    let bus = MockI2c::with_device(0x10);
    let found = transport(&bus).scan();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0], I2cAddress::SI470X);
}

#[test]
fn scan_stops_at_sixteen_results() {
    let bus = MockI2c::new();
    let found = transport(&bus).scan();
    assert_eq!(found.len(), 16);
    assert_eq!(found[0].addr(), 0x08);
    assert_eq!(found[15].addr(), 0x17);
}
