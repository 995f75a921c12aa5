//! Local frame state - what this peer publishes each tick

use crate::{HandPose, HandSide, SidedPose, Transform};

/// The local peer's outgoing per-tick state
///
/// Rebuilt every tick and consumed immediately by the snapshot codec.
/// `is_tracking` is true iff at least one wrist was sampled this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalFrameState {
    pub head: Transform,
    pub is_tracking: bool,
    pub left_wrist: Transform,
    pub right_wrist: Transform,
    pub left_pose: HandPose,
    pub right_pose: HandPose,
}

impl LocalFrameState {
    pub fn wrist(&self, side: HandSide) -> &Transform {
        match side {
            HandSide::Left => &self.left_wrist,
            HandSide::Right => &self.right_wrist,
        }
    }

    pub fn pose(&self, side: HandSide) -> HandPose {
        match side {
            HandSide::Left => self.left_pose,
            HandSide::Right => self.right_pose,
        }
    }

    /// Both poses tagged with their side, left first
    pub fn sided_poses(&self) -> [SidedPose; 2] {
        [
            SidedPose::new(HandSide::Left, self.left_pose),
            SidedPose::new(HandSide::Right, self.right_pose),
        ]
    }
}
