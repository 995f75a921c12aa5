//! Per-peer remote state and head smoothing

use handsync_core::{HandPose, HandSide, SmoothingConfig, Transform};
use handsync_wire::RemoteUpdate;

use crate::{HandDisplay, PoseMeshMask};

/// What one smoothing step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothStep {
    /// Nothing moved (zero time step or zero blend)
    Idle,
    /// Displayed head blended toward the target
    Smoothed,
    /// Displayed head jumped onto the target
    Snapped,
}

/// Render data for one remote hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteHandView {
    pub transform: Transform,
    pub display: HandDisplay,
    pub meshes: PoseMeshMask,
}

/// Render data for one remote avatar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarView {
    pub head: Transform,
    pub left: RemoteHandView,
    pub right: RemoteHandView,
}

impl AvatarView {
    pub fn hand(&self, side: HandSide) -> &RemoteHandView {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }
}

/// Reconstructed state of one remote peer
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFrameState {
    /// Head transform from the latest snapshot
    pub target_head: Transform,
    pub hands_tracked: bool,
    pub left_hand: Transform,
    pub right_hand: Transform,
    pub left_pose: HandPose,
    pub right_pose: HandPose,
    /// Head transform currently shown
    pub displayed_head: Transform,
    /// Snapshots applied since creation
    pub snapshots_applied: u64,
}

impl RemoteFrameState {
    /// State for a newly seen peer; the head starts on its target
    pub fn from_update(update: &RemoteUpdate) -> Self {
        RemoteFrameState {
            target_head: update.head,
            hands_tracked: update.hands_tracked,
            left_hand: update.left_hand,
            right_hand: update.right_hand,
            left_pose: update.left_pose,
            right_pose: update.right_pose,
            displayed_head: update.head,
            snapshots_applied: 1,
        }
    }

    /// Take a new snapshot as the target
    ///
    /// Poses, the tracking flag and hand transforms take effect at once;
    /// only the displayed head is left for `smooth`.
    pub fn apply(&mut self, update: &RemoteUpdate) {
        self.target_head = update.head;
        self.hands_tracked = update.hands_tracked;
        self.left_hand = update.left_hand;
        self.right_hand = update.right_hand;
        self.left_pose = update.left_pose;
        self.right_pose = update.right_pose;
        self.snapshots_applied += 1;
    }

    /// Distance between the displayed and target head positions
    pub fn head_error(&self) -> f32 {
        self.displayed_head
            .position
            .distance(&self.target_head.position)
    }

    /// Advance the displayed head by `dt` seconds
    pub fn smooth(&mut self, dt: f32, config: &SmoothingConfig) -> SmoothStep {
        if dt.is_nan() || dt <= 0.0 {
            return SmoothStep::Idle;
        }

        // A non-finite error would never compare past the threshold
        let error = self.head_error();
        if !error.is_finite() || error >= config.applied_distance {
            self.displayed_head = self.target_head;
            return SmoothStep::Snapped;
        }

        let t = (config.smoothing_factor * dt).clamp(0.0, 1.0);
        if t.is_nan() || t <= 0.0 {
            return SmoothStep::Idle;
        }

        let displayed = &mut self.displayed_head;
        displayed.position = displayed.position.lerp(&self.target_head.position, t);
        displayed.rotation = displayed.rotation.slerp(&self.target_head.rotation, t);
        SmoothStep::Smoothed
    }

    pub fn hand(&self, side: HandSide) -> &Transform {
        match side {
            HandSide::Left => &self.left_hand,
            HandSide::Right => &self.right_hand,
        }
    }

    pub fn pose(&self, side: HandSide) -> HandPose {
        match side {
            HandSide::Left => self.left_pose,
            HandSide::Right => self.right_pose,
        }
    }

    pub fn hand_display(&self, side: HandSide) -> HandDisplay {
        HandDisplay::from_label(self.pose(side), self.hands_tracked)
    }

    pub fn render_view(&self) -> AvatarView {
        let hand = |side| {
            let display = self.hand_display(side);
            RemoteHandView {
                transform: *self.hand(side),
                display,
                meshes: display.mesh_mask(),
            }
        };
        AvatarView {
            head: self.displayed_head,
            left: hand(HandSide::Left),
            right: hand(HandSide::Right),
        }
    }
}
