//! handsync test harness
//!
//! This crate provides:
//! - A seeded lossy link (latency, jitter, random and burst loss)
//! - Scripted hand and head sources
//! - A multi-peer session simulator wiring nodes through lossy links
//! - A UDP loopback session for end-to-end runs

pub mod lossy;
pub mod scripted;
pub mod session;
pub mod udp_session;

pub use lossy::*;
pub use scripted::*;
pub use session::*;
pub use udp_session::*;
