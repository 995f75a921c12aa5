//! handsync Core - Fundamental types and primitives
//!
//! This crate defines the types shared by every handsync component:
//! - Peer identity (PeerId)
//! - Spatial primitives (Vec3, Quat, Transform)
//! - Hand vocabulary (HandSide, FingerTip, TrackedJoint, HandPose)
//! - The per-tick local frame state
//! - Errors and configuration

pub mod config;
pub mod error;
pub mod frame;
pub mod hand;
pub mod id;
pub mod math;

pub use config::*;
pub use error::*;
pub use frame::*;
pub use hand::*;
pub use id::*;
pub use math::*;
