//! Per-hand mesh selection

use handsync_core::HandPose;

/// Which pose mesh a remote hand shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandDisplay {
    #[default]
    Hidden,
    Normal,
    Point,
    ThumbUp,
}

/// Mesh enable flags handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoseMeshMask {
    pub normal: bool,
    pub point: bool,
    pub thumb_up: bool,
}

impl PoseMeshMask {
    pub const NONE: PoseMeshMask = PoseMeshMask {
        normal: false,
        point: false,
        thumb_up: false,
    };

    pub fn any(&self) -> bool {
        self.normal || self.point || self.thumb_up
    }
}

impl HandDisplay {
    /// Display state from the latest pose label and tracking flag
    ///
    /// Untracked hands are hidden whatever label was last received.
    pub fn from_label(pose: HandPose, hands_tracked: bool) -> Self {
        if !hands_tracked {
            return HandDisplay::Hidden;
        }
        match pose {
            HandPose::Normal => HandDisplay::Normal,
            HandPose::Point => HandDisplay::Point,
            HandPose::ThumbUp => HandDisplay::ThumbUp,
        }
    }

    pub fn is_visible(self) -> bool {
        self != HandDisplay::Hidden
    }

    pub fn mesh_mask(self) -> PoseMeshMask {
        match self {
            HandDisplay::Hidden => PoseMeshMask::NONE,
            HandDisplay::Normal => PoseMeshMask {
                normal: true,
                ..PoseMeshMask::NONE
            },
            HandDisplay::Point => PoseMeshMask {
                point: true,
                ..PoseMeshMask::NONE
            },
            HandDisplay::ThumbUp => PoseMeshMask {
                thumb_up: true,
                ..PoseMeshMask::NONE
            },
        }
    }
}
