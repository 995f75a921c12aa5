//! Joint sampling with hold-last-value semantics

use handsync_core::{FingerTip, HandSide, TrackedJoint, Transform, Vec3};

use crate::HandTrackingSource;

/// Best-effort joint state for one hand
///
/// Slots that did not resolve this tick keep the value from the last tick
/// they did. A slot that has never resolved holds the zero position /
/// identity rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointSnapshot {
    /// Fingertip positions, thumb to pinky
    pub fingertips: [Vec3; FingerTip::COUNT],
    /// Wrist position and rotation
    pub wrist: Transform,
    /// Did the wrist resolve on the most recent sample?
    pub wrist_sampled: bool,
}

impl JointSnapshot {
    pub fn fingertip(&self, tip: FingerTip) -> Vec3 {
        self.fingertips[tip.slot()]
    }
}

/// Retains one snapshot per hand and refreshes it from the tracking source
#[derive(Debug, Clone, Default)]
pub struct JointSampler {
    left: JointSnapshot,
    right: JointSnapshot,
}

impl JointSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query all six joints of one hand and return the updated snapshot
    pub fn sample<S: HandTrackingSource>(&mut self, source: &S, side: HandSide) -> JointSnapshot {
        let snapshot = match side {
            HandSide::Left => &mut self.left,
            HandSide::Right => &mut self.right,
        };
        let was_sampled = snapshot.wrist_sampled;
        snapshot.wrist_sampled = false;

        for joint in TrackedJoint::all() {
            let Some(pose) = source.try_get_joint_pose(joint, side) else {
                continue;
            };
            match joint {
                TrackedJoint::Tip(tip) => snapshot.fingertips[tip.slot()] = pose.position,
                TrackedJoint::Wrist => {
                    snapshot.wrist = Transform::new(pose.position, pose.rotation);
                    snapshot.wrist_sampled = true;
                }
            }
        }

        if was_sampled != snapshot.wrist_sampled {
            if snapshot.wrist_sampled {
                tracing::debug!(hand = side.label(), "wrist tracking acquired");
            } else {
                tracing::debug!(hand = side.label(), "wrist tracking lost, holding last pose");
            }
        }

        *snapshot
    }

    /// Sample both hands, left first
    pub fn sample_both<S: HandTrackingSource>(&mut self, source: &S) -> (JointSnapshot, JointSnapshot) {
        let left = self.sample(source, HandSide::Left);
        let right = self.sample(source, HandSide::Right);
        (left, right)
    }

    /// The retained snapshot without querying the source
    pub fn snapshot(&self, side: HandSide) -> &JointSnapshot {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }
}
