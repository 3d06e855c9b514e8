//! Si470x FM Receiver Demo Firmware
//!
//! Entry point for the STM32G474 demo board. Brings the tuner up over I2C1,
//! seeks to the first station and logs RDS data over defmt.

#![no_std]
#![no_main]

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use si470x_fm::hal::gpio::select_two_wire;
use si470x_fm::prelude::*;
use si470x_fm::rds::RdsGroupKind;

/// Delay between RDS polls
const RDS_POLL: Duration = Duration::from_millis(40);

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Si470x FM demo v{}", env!("CARGO_PKG_VERSION"));

    let mut p = embassy_stm32::init(embassy_stm32::Config::default());

    // RST on PB7, SDIO (PB9) held low across reset selects two-wire mode
    let mut rst = Output::new(p.PB7, Level::High, Speed::Low);
    {
        let mut sdio = Output::new(&mut p.PB9, Level::Low, Speed::Low);
        if let Err(line) = select_two_wire(&mut rst, &mut sdio, &mut Delay) {
            warn!("bus mode selection failed on {}", line);
        }
    }

    // PB8 = SCL, PB9 = SDA
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PB8,
        p.PB9,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );

    let config = Si470xConfig::new()
        .with_band(Band::UsaEurope)
        .with_space(Space::Khz100)
        .with_de_emphasis(DeEmphasis::Us50);
    let mut radio = Si470x::new(i2c, Delay, rst, config);

    for addr in radio.scan_bus() {
        info!("I2C device at {}", addr);
    }

    if let Err(e) = radio.power_up() {
        warn!("power-up failed: {}", e);
        return;
    }
    if let Ok(chip) = radio.chip_info() {
        info!("chip: {}", chip);
    }

    let setup = radio
        .set_volume(8)
        .and_then(|()| radio.set_mute(false))
        .and_then(|()| radio.set_rds(true));
    if let Err(e) = setup {
        warn!("audio setup failed: {}", e);
    }

    match radio.seek_with_progress(SeekMode::Wrap, SeekDirection::Up, |f| info!("seek {}", f)) {
        Ok(freq) => info!("station at {} (band limit: {})", freq, radio.seek_failed()),
        Err(e) => warn!("seek failed: {}", e),
    }

    loop {
        match radio.poll_rds() {
            Ok(Some(RdsGroupKind::StationName)) => {
                let name = radio.rds_decoder().station_name();
                info!("PS: {=[u8]:a}", name);
            }
            Ok(Some(RdsGroupKind::ProgramInformation)) => {
                let text = radio.rds_decoder().program_info();
                info!("RT: {=[u8]:a}", text);
            }
            Ok(Some(RdsGroupKind::StationInformation)) => {
                let text = radio.rds_decoder().station_info();
                info!("RT(B): {=[u8]:a}", text);
            }
            Ok(Some(RdsGroupKind::ClockTime)) => {
                if let Some(time) = radio.rds_time() {
                    info!("CT: {=str}", time);
                }
                if let Some(date) = radio.rds_date() {
                    info!("date: {=u16}-{=u8:02}-{=u8:02}", date.year, date.month, date.day);
                }
            }
            Ok(_) => {}
            Err(e) => warn!("RDS poll failed: {}", e),
        }
        Timer::after(RDS_POLL).await;
    }
}
