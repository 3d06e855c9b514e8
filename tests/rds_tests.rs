//! Tests for RDS block decoding, text buffers and clock time
//!
//! Run with: cargo test --no-default-features --features std --test rds_tests

use si470x_fm::rds::decoder::{sanitize, PROGRAM_INFO_LEN, STATION_INFO_LEN, STATION_NAME_LEN};
use si470x_fm::rds::time::RdsDateTime;
use si470x_fm::rds::{
    BlockB, BlockBPayload, BlockErrors, GroupVersion, RdsBlocks, RdsDate, RdsDecoder,
    RdsGroupKind,
};
use si470x_fm::rds::block::block_errors;
use si470x_fm::registers::{reg, ShadowRegisters};

fn group(b: u16, c: u16, d: u16) -> RdsBlocks {
    RdsBlocks { a: 0x2204, b, c, d }
}

/// Group 4A blocks for the given fields
fn clock(mjd: u32, hour: u8, minute: u8, negative: bool, offset: u8) -> RdsBlocks {
    let raw = (u64::from(mjd) << 17)
        | (u64::from(hour) << 12)
        | (u64::from(minute) << 6)
        | (u64::from(negative) << 5)
        | u64::from(offset);
    group(
        0x4000 | (raw >> 32) as u16,
        (raw >> 16) as u16,
        raw as u16,
    )
}

// ============================================================================
// Block B Tests
// ============================================================================

#[test]
fn block_b_header_fields() {
    // 2B, TP set, PTY 10, segment 5, text A/B set
    let raw = (2 << 12) | (1 << 11) | (1 << 10) | (10 << 5) | 0x10 | 5;
    let b = BlockB::decode(raw);
    assert_eq!(b.group_type, 2);
    assert_eq!(b.version, GroupVersion::B);
    assert!(b.traffic_program);
    assert_eq!(b.pty, 10);
    assert_eq!(
        b.payload,
        BlockBPayload::RadioText {
            segment: 5,
            text_ab: true
        }
    );
    assert!(b.text_ab());
}

#[test]
fn block_b_basic_payload() {
    let b = BlockB::decode(0x000F);
    assert_eq!(b.version, GroupVersion::A);
    assert_eq!(
        b.payload,
        BlockBPayload::Basic {
            segment: 3,
            decoder_id: true,
            music: true,
            traffic_announcement: false,
        }
    );
}

#[test]
fn block_b_other_payload_keeps_raw_bits() {
    let b = BlockB::decode(0x8015);
    assert_eq!(b.group_type, 8);
    assert_eq!(b.payload, BlockBPayload::Other { content: 0x15 });
    assert!(b.text_ab());
}

#[test]
fn block_byte_order() {
    let blocks = group(0, 0x4142, 0x4344);
    assert_eq!(blocks.cd_bytes(), *b"ABCD");
    assert_eq!(blocks.d_bytes(), *b"CD");
}

#[test]
fn blocks_snapshot_rds_registers() {
    let mut shadow = ShadowRegisters::new();
    shadow.set(reg::RDS_A, 1);
    shadow.set(reg::RDS_B, 2);
    shadow.set(reg::RDS_C, 3);
    shadow.set(reg::RDS_D, 4);
    assert_eq!(
        RdsBlocks::from_shadow(&shadow),
        RdsBlocks {
            a: 1,
            b: 2,
            c: 3,
            d: 4
        }
    );
}

#[test]
fn block_error_levels() {
    let mut shadow = ShadowRegisters::new();
    shadow.set(reg::STATUS_RSSI, 0b11 << 9);
    shadow.set(reg::READ_CHANNEL, 0b10_01_00 << 10);
    assert_eq!(
        block_errors(&shadow),
        [
            BlockErrors::Uncorrectable,
            BlockErrors::Corrected3to5,
            BlockErrors::Corrected1to2,
            BlockErrors::None,
        ]
    );
}

// ============================================================================
// Station Name Tests
// ============================================================================

#[test]
fn station_name_segment_placement() {
    let mut rds = RdsDecoder::new();
    assert!(rds.decode_station_name(&group(0x0002, 0, 0x4142)));
    let raw = rds.raw_station_name();
    assert_eq!(&raw[4..6], b"AB");
    assert_eq!(raw[STATION_NAME_LEN], 0);
    assert!(raw[..4].iter().all(|&b| b == 0));
}

#[test]
fn station_name_assembles_all_segments() {
    let mut rds = RdsDecoder::new();
    for (segment, pair) in [*b"RA", *b"DI", *b"O ", *b"1 "].iter().enumerate() {
        let d = u16::from_be_bytes(*pair);
        rds.process(&group(0x0800 | segment as u16, 0, d));
    }
    assert_eq!(rds.station_name(), b"RADIO 1 ");
}

#[test]
fn station_name_rejects_other_groups() {
    let mut rds = RdsDecoder::new();
    assert!(!rds.decode_station_name(&group(0x2000, 0x4142, 0x4344)));
    assert!(rds.raw_station_name().iter().all(|&b| b == 0));
}

// ============================================================================
// Radio Text Tests
// ============================================================================

#[test]
fn program_info_takes_four_bytes_per_segment() {
    let mut rds = RdsDecoder::new();
    assert!(rds.decode_program_info(&group(0x200F, 0x5758, 0x595A)));
    let raw = rds.raw_program_info();
    assert_eq!(&raw[60..64], b"WXYZ");
    assert_eq!(raw[PROGRAM_INFO_LEN], 0);
}

#[test]
fn station_info_takes_two_bytes_per_segment() {
    let mut rds = RdsDecoder::new();
    assert!(rds.decode_station_info(&group(0x2803, 0x1234, 0x4849)));
    let raw = rds.raw_station_info();
    assert_eq!(&raw[6..8], b"HI");
    assert_eq!(raw[STATION_INFO_LEN], 0);
}

#[test]
fn radio_text_versions_do_not_mix() {
    let mut rds = RdsDecoder::new();
    assert!(!rds.decode_program_info(&group(0x2800, 0x4142, 0x4344)));
    assert!(!rds.decode_station_info(&group(0x2000, 0x4142, 0x4344)));
    assert!(rds.raw_program_info().iter().all(|&b| b == 0));
    assert!(rds.raw_station_info().iter().all(|&b| b == 0));
}

#[test]
fn text_accessors_replace_control_characters() {
    let mut rds = RdsDecoder::new();
    rds.decode_program_info(&group(0x2000, 0x480D, 0x690A));
    let text = rds.program_info();
    assert_eq!(text.len(), PROGRAM_INFO_LEN);
    assert_eq!(&text[..4], b"H i ");
    assert!(text[4..].iter().all(|&b| b == b' '));
}

#[test]
fn sanitize_terminates_last_byte() {
    let mut text = *b"A\x01B\x1fC\x7f!";
    sanitize(&mut text);
    assert_eq!(&text, b"A B C\x7f\0");

    let mut empty: [u8; 0] = [];
    sanitize(&mut empty);
}

// ============================================================================
// Clock Time Tests
// ============================================================================

#[test]
fn clock_time_field_layout() {
    let blocks = clock(60_000, 23, 59, false, 1);
    assert_eq!((blocks.b, blocks.c, blocks.d), (0x4001, 0xD4C1, 0x7EC1));

    let time = RdsDateTime::from_blocks(&blocks);
    assert_eq!(time.mjd, 60_000);
    assert_eq!(time.hour, 23);
    assert_eq!(time.minute, 59);
    assert_eq!(time.offset, 1);
    assert!(!time.negative);
}

#[test]
fn clock_time_text() {
    let mut rds = RdsDecoder::new();
    assert_eq!(rds.decode_time(&clock(60_000, 23, 59, false, 1)), Some("23:59 +00:30"));
    assert_eq!(rds.time(), Some("23:59 +00:30"));
    let time = rds.date_time().unwrap();
    assert_eq!(time.local_text().as_str(), "00:29");
}

#[test]
fn negative_offset_wraps_to_previous_day() {
    let time = RdsDateTime::from_blocks(&clock(45_218, 1, 15, true, 4));
    assert_eq!(time.utc_text().as_str(), "01:15 -02:00");
    assert_eq!(time.local_text().as_str(), "23:15");
    assert_eq!(time.offset_total_minutes(), -120);
}

#[test]
fn out_of_range_time_is_rejected() {
    let mut rds = RdsDecoder::new();
    rds.decode_time(&clock(60_000, 12, 0, false, 0));

    assert_eq!(rds.decode_time(&clock(60_000, 25, 0, false, 0)), None);
    assert_eq!(rds.decode_time(&clock(60_000, 10, 61, false, 0)), None);
    assert_eq!(rds.decode_time(&clock(60_000, 10, 0, false, 26)), None);
    // Previous valid time is kept
    assert_eq!(rds.time(), Some("12:00 +00:00"));
}

#[test]
fn range_bounds_are_inclusive() {
    assert!(RdsDateTime::from_blocks(&clock(0, 24, 60, false, 25)).is_valid());
}

#[test]
fn clock_time_needs_group_4a() {
    let mut rds = RdsDecoder::new();
    let mut blocks = clock(60_000, 23, 59, false, 1);
    blocks.b |= 1 << 11;
    assert_eq!(rds.decode_time(&blocks), None);
    assert_eq!(rds.time(), None);
}

#[test]
fn mjd_to_calendar_date() {
    let date = |mjd| RdsDateTime::from_blocks(&clock(mjd, 0, 0, false, 0)).date();
    assert_eq!(
        date(60_000),
        RdsDate {
            year: 2023,
            month: 2,
            day: 25
        }
    );
    assert_eq!(
        date(45_218),
        RdsDate {
            year: 1982,
            month: 9,
            day: 6
        }
    );
    assert_eq!(
        date(51_544),
        RdsDate {
            year: 2000,
            month: 1,
            day: 1
        }
    );
}

// ============================================================================
// Dispatch Tests
// ============================================================================

#[test]
fn process_reports_group_kind() {
    let mut rds = RdsDecoder::new();
    assert_eq!(rds.process(&group(0x0000, 0, 0)), RdsGroupKind::StationName);
    assert_eq!(rds.process(&group(0x0800, 0, 0)), RdsGroupKind::StationName);
    assert_eq!(rds.process(&group(0x2000, 0, 0)), RdsGroupKind::ProgramInformation);
    assert_eq!(rds.process(&group(0x2800, 0, 0)), RdsGroupKind::StationInformation);
    assert_eq!(
        rds.process(&clock(60_000, 23, 59, false, 1)),
        RdsGroupKind::ClockTime
    );
    assert_eq!(
        rds.process(&clock(60_000, 30, 0, false, 0)),
        RdsGroupKind::Invalid
    );
    assert_eq!(
        rds.process(&group(0x4800, 0, 0)),
        RdsGroupKind::Other(4, GroupVersion::B)
    );
    assert_eq!(
        rds.process(&group(0xA000, 0, 0)),
        RdsGroupKind::Other(10, GroupVersion::A)
    );
}

#[test]
fn clear_empties_every_buffer() {
    let mut rds = RdsDecoder::default();
    rds.process(&group(0x0000, 0, 0x4142));
    rds.process(&group(0x2000, 0x4142, 0x4344));
    rds.process(&group(0x2800, 0, 0x4142));
    rds.process(&clock(60_000, 23, 59, false, 1));

    rds.clear();

    assert!(rds.raw_station_name().iter().all(|&b| b == 0));
    assert!(rds.raw_program_info().iter().all(|&b| b == 0));
    assert!(rds.raw_station_info().iter().all(|&b| b == 0));
    assert_eq!(rds.time(), None);
    assert_eq!(rds.date_time(), None);
}
