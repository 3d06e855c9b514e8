//! Radio Control Logic
//!
//! Host-side tuning state and the tune/seek completion handshake. Both are
//! pure and can be exercised without a bus.

pub mod state;
pub mod tune;
