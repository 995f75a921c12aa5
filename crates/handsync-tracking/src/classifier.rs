//! Pose classifier - fixed geometric thresholds over fingertip distances
//!
//! A fist curls the middle finger in before anything else, so the middle
//! fingertip decides NORMAL. With the middle curled, an extended index
//! finger means POINT; otherwise the hand is a closed THUMB_UP fist.

use handsync_core::{ClassifierConfig, FingerTip, HandPose, Vec3};

use crate::JointSnapshot;

/// Deterministic, side-effect-free pose classifier
#[derive(Debug, Clone, PartialEq)]
pub struct PoseClassifier {
    extended_threshold: f32,
}

impl Default for PoseClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

impl PoseClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            extended_threshold: config.extended_threshold,
        }
    }

    pub fn extended_threshold(&self) -> f32 {
        self.extended_threshold
    }

    /// Classify one hand from its wrist and fingertip positions
    pub fn classify(&self, wrist: Vec3, fingertips: &[Vec3; FingerTip::COUNT]) -> HandPose {
        let reach = |tip: FingerTip| fingertips[tip.slot()].distance(&wrist);

        if reach(FingerTip::Middle) >= self.extended_threshold {
            HandPose::Normal
        } else if reach(FingerTip::Index) >= self.extended_threshold {
            HandPose::Point
        } else {
            HandPose::ThumbUp
        }
    }

    pub fn classify_snapshot(&self, snapshot: &JointSnapshot) -> HandPose {
        self.classify(snapshot.wrist.position, &snapshot.fingertips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Hand at the origin with the given middle and index reach along +x
    fn hand(middle: f32, index: f32) -> (Vec3, [Vec3; 5]) {
        let mut tips = [Vec3::new(0.03, 0.0, 0.0); 5];
        tips[FingerTip::Middle.slot()] = Vec3::new(middle, 0.0, 0.0);
        tips[FingerTip::Index.slot()] = Vec3::new(index, 0.0, 0.0);
        (Vec3::ZERO, tips)
    }

    #[test]
    fn test_normal_when_middle_extended() {
        let (wrist, tips) = hand(0.09, 0.01);
        assert_eq!(PoseClassifier::default().classify(wrist, &tips), HandPose::Normal);
    }

    #[test]
    fn test_point_when_only_index_extended() {
        let (wrist, tips) = hand(0.05, 0.09);
        assert_eq!(PoseClassifier::default().classify(wrist, &tips), HandPose::Point);
    }

    #[test]
    fn test_thumb_up_when_curled() {
        let (wrist, tips) = hand(0.03, 0.03);
        assert_eq!(PoseClassifier::default().classify(wrist, &tips), HandPose::ThumbUp);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let classifier = PoseClassifier::default();

        let (wrist, tips) = hand(0.08, 0.0);
        assert_eq!(classifier.classify(wrist, &tips), HandPose::Normal);

        let (wrist, tips) = hand(0.079_99, 0.08);
        assert_eq!(classifier.classify(wrist, &tips), HandPose::Point);

        let (wrist, tips) = hand(0.079_99, 0.079_99);
        assert_eq!(classifier.classify(wrist, &tips), HandPose::ThumbUp);
    }

    #[test]
    fn test_distance_is_relative_to_wrist() {
        let classifier = PoseClassifier::default();
        let wrist = Vec3::new(5.0, 1.0, -2.0);
        let mut tips = [wrist; 5];
        tips[FingerTip::Middle.slot()] = wrist + Vec3::new(0.0, 0.0, 0.09);

        assert_eq!(classifier.classify(wrist, &tips), HandPose::Normal);
    }

    #[test]
    fn test_configured_threshold() {
        let classifier = PoseClassifier::new(&ClassifierConfig {
            extended_threshold: 0.1,
        });
        let (wrist, tips) = hand(0.09, 0.12);
        assert_eq!(classifier.classify(wrist, &tips), HandPose::Point);
    }

    fn arb_vec3() -> impl Strategy<Value = Vec3> {
        (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_classify_is_pure(wrist in arb_vec3(), tips in prop::array::uniform5(arb_vec3())) {
            let classifier = PoseClassifier::default();
            let first = classifier.classify(wrist, &tips);
            prop_assert_eq!(first, classifier.classify(wrist, &tips));
            prop_assert_eq!(first, PoseClassifier::default().classify(wrist, &tips));
        }

        #[test]
        fn prop_only_middle_and_index_matter(
            wrist in arb_vec3(),
            tips in prop::array::uniform5(arb_vec3()),
            others in prop::array::uniform3(arb_vec3()),
        ) {
            let classifier = PoseClassifier::default();
            let mut moved = tips;
            moved[FingerTip::Thumb.slot()] = others[0];
            moved[FingerTip::Ring.slot()] = others[1];
            moved[FingerTip::Pinky.slot()] = others[2];
            prop_assert_eq!(classifier.classify(wrist, &tips), classifier.classify(wrist, &moved));
        }
    }
}
