//! handsync runtime - the per-tick node pipeline
//!
//! Each call to [`Node::tick`] runs, in order:
//! 1. Sample both hands (hold-last-value on misses)
//! 2. Sample the head (fall back to the last known transform)
//! 3. Classify poses and build the local frame state
//! 4. Encode the outgoing snapshot
//! 5. Drain inbound snapshots and disconnects, in arrival order
//! 6. Smooth every remote head

pub mod logging;
pub mod menu;
pub mod node;

pub use logging::*;
pub use menu::*;
pub use node::*;
