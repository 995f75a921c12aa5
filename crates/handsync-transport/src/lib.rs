//! handsync transport - reference UDP adapter
//!
//! The core only needs an ordered per-peer stream of snapshot bytes and a
//! disconnect signal. This crate provides both over plain UDP:
//! - Datagram framing: kind byte + sender peer id + payload
//! - Async socket wrapper and a background receive loop

pub mod datagram;
pub mod udp;

pub use datagram::*;
pub use udp::*;
