//! Local frame assembly
//!
//! The outgoing frame and the classifier always see raw joint positions.
//! The fingertip extension only affects what is drawn locally.

use handsync_core::{
    ClassifierConfig, DisplayConfig, FingerTip, HandSide, LocalFrameState, Transform, Vec3,
};

use crate::{JointSnapshot, PoseClassifier};

/// Where to draw one local hand
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandView {
    pub fingertips: [Vec3; FingerTip::COUNT],
    pub wrist: Transform,
    /// Wrist resolved this tick
    pub tracked: bool,
}

/// Where to draw both local hands
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalHandsView {
    pub left: HandView,
    pub right: HandView,
}

impl LocalHandsView {
    pub fn hand(&self, side: HandSide) -> &HandView {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }
}

/// Push each fingertip along the wrist-to-tip direction by `extension`
pub fn extend_fingertips(
    snapshot: &JointSnapshot,
    extension: f32,
) -> [Vec3; FingerTip::COUNT] {
    let wrist = snapshot.wrist.position;
    snapshot
        .fingertips
        .map(|raw| raw + (raw - wrist) * extension)
}

/// Builds the local peer's per-tick frame state
#[derive(Debug, Clone, Default)]
pub struct LocalStateBuilder {
    classifier: PoseClassifier,
    fingertip_extension: f32,
}

impl LocalStateBuilder {
    pub fn new(classifier: &ClassifierConfig, display: &DisplayConfig) -> Self {
        Self {
            classifier: PoseClassifier::new(classifier),
            fingertip_extension: display.fingertip_extension,
        }
    }

    pub fn classifier(&self) -> &PoseClassifier {
        &self.classifier
    }

    /// Assemble the frame state from this tick's samples
    pub fn build(
        &self,
        head: Transform,
        left: &JointSnapshot,
        right: &JointSnapshot,
    ) -> LocalFrameState {
        LocalFrameState {
            head,
            is_tracking: left.wrist_sampled || right.wrist_sampled,
            left_wrist: left.wrist,
            right_wrist: right.wrist,
            left_pose: self.classifier.classify_snapshot(left),
            right_pose: self.classifier.classify_snapshot(right),
        }
    }

    /// Display positions for the local hand meshes
    pub fn hands_view(&self, left: &JointSnapshot, right: &JointSnapshot) -> LocalHandsView {
        let view = |snapshot: &JointSnapshot| HandView {
            fingertips: extend_fingertips(snapshot, self.fingertip_extension),
            wrist: snapshot.wrist,
            tracked: snapshot.wrist_sampled,
        };
        LocalHandsView {
            left: view(left),
            right: view(right),
        }
    }
}
