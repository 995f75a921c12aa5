//! handsync Tracking - From raw joints to a publishable frame
//!
//! Per tick, for the local peer:
//! 1. Sample up to six joints per hand from the tracking source
//! 2. Classify each hand into a discrete pose
//! 3. Assemble the outgoing frame state
//!
//! Joints that fail to resolve keep their last value. Partial tracking is
//! routine, so nothing in this crate returns an error.

pub mod builder;
pub mod classifier;
pub mod sampler;
pub mod source;

pub use builder::*;
pub use classifier::*;
pub use sampler::*;
pub use source::*;
