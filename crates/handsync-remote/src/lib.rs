//! Remote avatar reconstruction for handsync
//!
//! Snapshots from each remote peer set a target. Every local tick the
//! displayed head moves toward that target with bounded exponential
//! smoothing, or snaps when the target jumped too far. Pose labels and
//! hand transforms are applied as soon as they arrive.

pub mod display;
pub mod reconstructor;
pub mod shared;
pub mod state;

pub use display::*;
pub use reconstructor::*;
pub use shared::*;
pub use state::*;
