//! Hand vocabulary - sides, tracked joints and discrete poses

use std::fmt;

/// Which hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandSide {
    Left,
    Right,
}

impl HandSide {
    pub const BOTH: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    pub fn label(self) -> &'static str {
        match self {
            HandSide::Left => "LEFT",
            HandSide::Right => "RIGHT",
        }
    }
}

/// Fingertip joints, in thumb-to-pinky order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerTip {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

impl FingerTip {
    /// All fingertips in slot order
    pub const ALL: [FingerTip; 5] = [
        FingerTip::Thumb,
        FingerTip::Index,
        FingerTip::Middle,
        FingerTip::Ring,
        FingerTip::Pinky,
    ];

    pub const COUNT: usize = 5;

    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }
}

/// A joint the hand-tracking source is queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedJoint {
    Tip(FingerTip),
    Wrist,
}

impl TrackedJoint {
    /// The six joints sampled per hand each tick
    pub fn all() -> [TrackedJoint; 6] {
        [
            TrackedJoint::Tip(FingerTip::Thumb),
            TrackedJoint::Tip(FingerTip::Index),
            TrackedJoint::Tip(FingerTip::Middle),
            TrackedJoint::Tip(FingerTip::Ring),
            TrackedJoint::Tip(FingerTip::Pinky),
            TrackedJoint::Wrist,
        ]
    }
}

/// Discrete hand pose
///
/// The discriminant is the wire ordinal, shared by both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandPose {
    #[default]
    Normal = 0,
    Point = 1,
    ThumbUp = 2,
}

impl HandPose {
    pub const ALL: [HandPose; 3] = [HandPose::Normal, HandPose::Point, HandPose::ThumbUp];

    #[inline]
    pub fn index(self) -> i32 {
        self as i32
    }

    pub fn from_index(index: i32) -> Option<HandPose> {
        match index {
            0 => Some(HandPose::Normal),
            1 => Some(HandPose::Point),
            2 => Some(HandPose::ThumbUp),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HandPose::Normal => "NORMAL",
            HandPose::Point => "POINT",
            HandPose::ThumbUp => "THUMB_UP",
        }
    }
}

/// A pose attributed to a specific hand, e.g. LEFT_POINT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SidedPose {
    pub side: HandSide,
    pub pose: HandPose,
}

impl SidedPose {
    pub fn new(side: HandSide, pose: HandPose) -> Self {
        Self { side, pose }
    }
}

impl fmt::Display for SidedPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.side.label(), self.pose.label())
    }
}
