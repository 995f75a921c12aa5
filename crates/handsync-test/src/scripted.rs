//! Scripted tracking sources

use std::collections::HashSet;

use handsync_core::{FingerTip, HandSide, TrackedJoint, Transform, Vec3};
use handsync_tracking::{HandTrackingSource, HeadSource, JointPose};

/// Reach of an extended finger
pub const EXTENDED_REACH: f32 = 0.12;
/// Reach of a curled finger
pub const CURLED_REACH: f32 = 0.03;

/// Joint layout of one hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandShape {
    pub wrist: Transform,
    /// Fingertip positions, thumb to pinky
    pub fingertips: [Vec3; FingerTip::COUNT],
}

impl HandShape {
    /// Fingertips at the given reach above the wrist
    pub fn with_reach(wrist: Vec3, reach: [f32; FingerTip::COUNT]) -> Self {
        HandShape {
            wrist: Transform::at(wrist),
            fingertips: reach.map(|r| wrist + Vec3::new(0.0, r, 0.0)),
        }
    }

    pub fn open(wrist: Vec3) -> Self {
        Self::with_reach(wrist, [EXTENDED_REACH; FingerTip::COUNT])
    }

    pub fn point(wrist: Vec3) -> Self {
        let mut reach = [CURLED_REACH; FingerTip::COUNT];
        reach[FingerTip::Index.slot()] = EXTENDED_REACH;
        Self::with_reach(wrist, reach)
    }

    pub fn thumb_up(wrist: Vec3) -> Self {
        let mut reach = [CURLED_REACH; FingerTip::COUNT];
        reach[FingerTip::Thumb.slot()] = EXTENDED_REACH;
        Self::with_reach(wrist, reach)
    }

    /// Same shape moved by `offset`
    pub fn moved(&self, offset: Vec3) -> Self {
        HandShape {
            wrist: Transform::new(self.wrist.position + offset, self.wrist.rotation),
            fingertips: self.fingertips.map(|tip| tip + offset),
        }
    }
}

/// Hand source driven by test code
#[derive(Debug, Clone, Default)]
pub struct ScriptedHands {
    left: Option<HandShape>,
    right: Option<HandShape>,
    /// Joints reported as untracked even when their hand is set
    missing: HashSet<(TrackedJoint, HandSide)>,
}

impl ScriptedHands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn both(left: HandShape, right: HandShape) -> Self {
        ScriptedHands {
            left: Some(left),
            right: Some(right),
            missing: HashSet::new(),
        }
    }

    /// Set or clear one hand
    pub fn set(&mut self, side: HandSide, shape: Option<HandShape>) {
        match side {
            HandSide::Left => self.left = shape,
            HandSide::Right => self.right = shape,
        }
    }

    pub fn hide_joint(&mut self, joint: TrackedJoint, side: HandSide) {
        self.missing.insert((joint, side));
    }

    pub fn show_all_joints(&mut self) {
        self.missing.clear();
    }

    pub fn shape(&self, side: HandSide) -> Option<&HandShape> {
        match side {
            HandSide::Left => self.left.as_ref(),
            HandSide::Right => self.right.as_ref(),
        }
    }
}

impl HandTrackingSource for ScriptedHands {
    fn try_get_joint_pose(&self, joint: TrackedJoint, side: HandSide) -> Option<JointPose> {
        if self.missing.contains(&(joint, side)) {
            return None;
        }
        let shape = self.shape(side)?;
        Some(match joint {
            TrackedJoint::Wrist => JointPose::new(shape.wrist.position, shape.wrist.rotation),
            TrackedJoint::Tip(tip) => JointPose::at(shape.fingertips[tip.slot()]),
        })
    }
}

/// Head source with a settable transform
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedHead {
    pub transform: Option<Transform>,
}

impl ScriptedHead {
    pub fn at(position: Vec3) -> Self {
        ScriptedHead {
            transform: Some(Transform::at(position)),
        }
    }
}

impl HeadSource for ScriptedHead {
    fn head_transform(&self) -> Option<Transform> {
        self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handsync_core::HandPose;
    use handsync_tracking::{JointSampler, PoseClassifier};

    #[test]
    fn test_shapes_classify_as_named() {
        let classifier = PoseClassifier::default();
        let wrist = Vec3::new(0.2, 1.1, 0.4);
        let cases = [
            (HandShape::open(wrist), HandPose::Normal),
            (HandShape::point(wrist), HandPose::Point),
            (HandShape::thumb_up(wrist), HandPose::ThumbUp),
        ];
        for (shape, expected) in cases {
            assert_eq!(
                classifier.classify(shape.wrist.position, &shape.fingertips),
                expected
            );
        }
    }

    #[test]
    fn test_hidden_joint_holds_in_sampler() {
        let mut hands = ScriptedHands::both(
            HandShape::open(Vec3::new(-0.2, 1.0, 0.0)),
            HandShape::open(Vec3::new(0.2, 1.0, 0.0)),
        );
        let mut sampler = JointSampler::new();
        let first = sampler.sample(&hands, HandSide::Left);

        hands.set(HandSide::Left, Some(HandShape::thumb_up(Vec3::new(-0.2, 1.0, 0.0))));
        hands.hide_joint(TrackedJoint::Tip(FingerTip::Middle), HandSide::Left);
        let second = sampler.sample(&hands, HandSide::Left);

        assert_eq!(
            second.fingertip(FingerTip::Middle),
            first.fingertip(FingerTip::Middle)
        );
        assert_ne!(second.fingertip(FingerTip::Index), first.fingertip(FingerTip::Index));
    }

    #[test]
    fn test_untracked_hand_resolves_nothing() {
        let hands = ScriptedHands::new();
        assert!(hands
            .try_get_joint_pose(TrackedJoint::Wrist, HandSide::Right)
            .is_none());
        assert!(ScriptedHead::default().head_transform().is_none());
    }
}
