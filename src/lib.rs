//! Si4702/Si4703 FM Receiver Driver Library
//!
//! This library drives the Silicon Labs Si470x single-chip FM broadcast
//! receiver over its two-wire (I2C) interface. The chip exposes sixteen
//! 16-bit registers; the driver mirrors all of them in a local shadow bank,
//! mutates typed bitfields on the shadow copy and flushes the configuration
//! range back to the device in a single bus transaction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Si470x driver: power, tuning, seek, audio, RDS accessors   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      CORE LOGIC                              │
//! │  Tune/Seek state machine  │  RDS decoder  │  Tuning state    │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 REGISTER / TRANSACTION LAYER                 │
//! │  Shadow registers + bitfield views  │  Wire-order transfers  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                         HAL                                  │
//! │  embedded-hal I2c  │  DelayNs  │  OutputPin (reset line)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Shadow first**: every operation mutates the local mirror, then flushes
//! - **Type-driven design**: bands, spacings and volumes are validated types
//! - **No unsafe code**: register fields go through `bitfield` accessors
//! - **Functional core, imperative shell**: the tune sequencer and the RDS
//!   decoder are pure and unit-testable without a bus
//! - **Explicit error handling**: bus failures and poll timeouts are reported

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Logging shims, must come first so the macros are visible everywhere
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Bus and reset-line wrappers over the `embedded-hal` traits.
pub mod hal;

/// Register map
///
/// Shadow register bank and typed bitfield views of each register.
pub mod registers;

/// Transaction Engine
///
/// Wire-order bulk reads and bounded bulk writes of the register bank.
pub mod transaction;

/// Peripheral Drivers
///
/// The Si470x tuner driver built on top of the register layer.
pub mod drivers;

/// Radio Control Logic
///
/// Tuning state and the tune/seek completion state machine.
pub mod radio;

/// Radio Data System
///
/// Block decoding, text buffers and clock-time decoding.
pub mod rds;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

pub use config::Si470xConfig;
pub use drivers::si470x::Si470x;
pub use types::Error;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::drivers::si470x::{ChipInfo, Si470x};
    pub use crate::radio::tune::TuneState;
    pub use crate::rds::{BlockErrors, GroupVersion, RdsGroupKind};
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::OutputPin;
    pub use embedded_hal::i2c::I2c;

    // Error handling
    pub use core::result::Result;

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}
