//! Hardware Abstraction Layer
//!
//! Wrappers over the blocking `embedded-hal` 1.0 traits. The driver never
//! names a concrete MCU peripheral; any `I2c`, `DelayNs` and `OutputPin`
//! implementation works, including the host test doubles.

pub mod gpio;
pub mod i2c;
