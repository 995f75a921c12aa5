//! handsync Wire - Snapshot wire format
//!
//! One snapshot per tick per peer, positional and fixed-size:
//!
//! ```text
//! [Vec3 headPos][Quat headRot][bool isTracking]
//! [Vec3 lWristPos][Quat lWristRot][Vec3 rWristPos][Quat rWristRot]
//! [i32 leftPoseIdx][i32 rightPoseIdx]
//! ```
//!
//! All scalars are little-endian. There is no version tag, checksum or
//! length prefix; framing belongs to the transport.

pub mod snapshot;

pub use snapshot::*;
