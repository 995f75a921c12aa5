//! Collaborator seams - where joint and head poses come from

use handsync_core::{HandSide, Quat, TrackedJoint, Transform, Vec3};

/// One resolved joint
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JointPose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl JointPose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::identity(),
        }
    }
}

/// Hand-tracking input
///
/// Returns `None` when the joint is not tracked this tick.
pub trait HandTrackingSource {
    fn try_get_joint_pose(&self, joint: TrackedJoint, side: HandSide) -> Option<JointPose>;
}

/// Head pose input (the headset camera)
///
/// Returns `None` while the camera rig is not available.
pub trait HeadSource {
    fn head_transform(&self) -> Option<Transform>;
}

impl<T: HandTrackingSource + ?Sized> HandTrackingSource for &T {
    fn try_get_joint_pose(&self, joint: TrackedJoint, side: HandSide) -> Option<JointPose> {
        (**self).try_get_joint_pose(joint, side)
    }
}

impl<T: HeadSource + ?Sized> HeadSource for &T {
    fn head_transform(&self) -> Option<Transform> {
        (**self).head_transform()
    }
}

/// Source that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct Untracked;

impl HandTrackingSource for Untracked {
    fn try_get_joint_pose(&self, _joint: TrackedJoint, _side: HandSide) -> Option<JointPose> {
        None
    }
}

impl HeadSource for Untracked {
    fn head_transform(&self) -> Option<Transform> {
        None
    }
}

/// Head pose with fallback to the last value seen
#[derive(Debug, Clone, Default)]
pub struct HeadTracker {
    last: Transform,
    ever_seen: bool,
}

impl HeadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query the head source, reusing the last known transform on a miss
    pub fn sample<H: HeadSource>(&mut self, source: &H) -> Transform {
        match source.head_transform() {
            Some(transform) => {
                if !self.ever_seen {
                    tracing::debug!("head pose acquired");
                }
                self.last = transform;
                self.ever_seen = true;
            }
            None if self.ever_seen => {
                tracing::trace!("head pose unavailable, reusing last transform");
            }
            None => {}
        }
        self.last
    }

    pub fn last(&self) -> Transform {
        self.last
    }

    pub fn ever_seen(&self) -> bool {
        self.ever_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FlakyHead {
        value: Cell<Option<Transform>>,
    }

    impl HeadSource for FlakyHead {
        fn head_transform(&self) -> Option<Transform> {
            self.value.get()
        }
    }

    #[test]
    fn test_head_tracker_falls_back() {
        let head = FlakyHead {
            value: Cell::new(None),
        };
        let mut tracker = HeadTracker::new();

        assert_eq!(tracker.sample(&head), Transform::default());
        assert!(!tracker.ever_seen());

        let seen = Transform::at(Vec3::new(0.0, 1.7, 0.0));
        head.value.set(Some(seen));
        assert_eq!(tracker.sample(&head), seen);

        head.value.set(None);
        assert_eq!(tracker.sample(&head), seen);
        assert!(tracker.ever_seen());
    }

    #[test]
    fn test_untracked_resolves_nothing() {
        assert!(Untracked
            .try_get_joint_pose(TrackedJoint::Wrist, HandSide::Left)
            .is_none());
        assert!(Untracked.head_transform().is_none());
    }
}
