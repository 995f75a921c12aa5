//! handsync Node - one local peer's tick loop

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use bytes::Bytes;

use handsync_core::{HandsyncConfig, HandsyncResult, LocalFrameState, PeerId};
use handsync_remote::{Applied, AvatarView, RemoteFrameState, RemoteStateReconstructor, SmoothStep};
use handsync_tracking::{
    HandTrackingSource, HeadSource, HeadTracker, JointSampler, LocalHandsView, LocalStateBuilder,
};
use handsync_transport::Datagram;
use handsync_wire::SnapshotCodec;

/// Something the transport delivered for the next tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Snapshot { peer: PeerId, payload: Bytes },
    Disconnect { peer: PeerId },
}

impl From<Datagram> for InboundEvent {
    fn from(datagram: Datagram) -> Self {
        match datagram {
            Datagram::Snapshot { peer, payload } => InboundEvent::Snapshot { peer, payload },
            Datagram::Leave { peer } => InboundEvent::Disconnect { peer },
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RuntimeStats {
    pub ticks: u64,
    pub inbound_queued: u64,
    /// Inbound events evicted because the inbox was full
    pub inbound_dropped: u64,
    pub snapshots_applied: u64,
    /// Malformed snapshots discarded
    pub snapshots_rejected: u64,
    /// Snapshots that echoed the local peer id
    pub snapshots_ignored: u64,
    pub peers_joined: u64,
    pub peers_left: u64,
    pub heads_snapped: u64,
    pub outgoing_built: u64,
    /// Outgoing snapshots evicted before the transport collected them
    pub outgoing_dropped: u64,
    pub outgoing_popped: u64,
    pub last_tick_duration: Duration,
}

/// One local peer: tracking in, snapshots out, remote avatars reconstructed
pub struct Node {
    config: HandsyncConfig,
    sampler: JointSampler,
    head: HeadTracker,
    builder: LocalStateBuilder,
    remote: RemoteStateReconstructor,
    /// Inbound events awaiting the next tick
    inbox: VecDeque<InboundEvent>,
    /// Encoded snapshots awaiting the transport
    outbox: VecDeque<Bytes>,
    last_local: Option<LocalFrameState>,
    last_hands: LocalHandsView,
    stats: RuntimeStats,
}

impl Node {
    /// Node with default configuration
    pub fn new() -> Self {
        Self::build(HandsyncConfig::default())
    }

    /// Node with a validated configuration
    pub fn with_config(config: HandsyncConfig) -> HandsyncResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: HandsyncConfig) -> Self {
        let remote = RemoteStateReconstructor::new(config.smoothing.clone())
            .with_local_peer(config.node.local_peer);
        Node {
            sampler: JointSampler::new(),
            head: HeadTracker::new(),
            builder: LocalStateBuilder::new(&config.classifier, &config.display),
            remote,
            inbox: VecDeque::new(),
            outbox: VecDeque::new(),
            last_local: None,
            last_hands: LocalHandsView::default(),
            stats: RuntimeStats::default(),
            config,
        }
    }

    pub fn local_peer(&self) -> PeerId {
        self.config.node.local_peer
    }

    pub fn config(&self) -> &HandsyncConfig {
        &self.config
    }

    /// Interval between ticks at the configured rate
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.config.node.tick_rate_hz.max(1)
    }

    /// Queue an inbound event
    ///
    /// A full inbox gives up its oldest snapshot. Disconnects are never
    /// evicted, so peer state cannot outlive a delivered leave.
    fn push_inbound(&mut self, event: InboundEvent) {
        if matches!(event, InboundEvent::Snapshot { .. }) {
            while self.inbox.len() >= self.config.node.inbox_capacity {
                let oldest = self
                    .inbox
                    .iter()
                    .position(|queued| matches!(queued, InboundEvent::Snapshot { .. }));
                self.stats.inbound_dropped += 1;
                match oldest {
                    Some(index) => {
                        self.inbox.remove(index);
                    }
                    // Only disconnects queued; the new snapshot goes
                    None => return,
                }
            }
        }
        self.inbox.push_back(event);
        self.stats.inbound_queued += 1;
    }

    /// Queue raw snapshot bytes from a remote peer
    pub fn queue_incoming(&mut self, peer: PeerId, payload: Bytes) {
        self.push_inbound(InboundEvent::Snapshot { peer, payload });
    }

    /// Queue a peer disconnect, applied after earlier snapshots
    pub fn queue_disconnect(&mut self, peer: PeerId) {
        self.push_inbound(InboundEvent::Disconnect { peer });
    }

    /// Queue whatever the transport decoded
    pub fn queue_datagram(&mut self, datagram: Datagram) {
        self.push_inbound(datagram.into());
    }

    /// Get next outgoing snapshot (if any)
    pub fn pop_outgoing(&mut self) -> Option<Bytes> {
        let snapshot = self.outbox.pop_front();
        if snapshot.is_some() {
            self.stats.outgoing_popped += 1;
        }
        snapshot
    }

    /// Run one tick of `dt` seconds and return the local frame state
    pub fn tick<S, H>(&mut self, dt: f32, tracking: &S, head: &H) -> LocalFrameState
    where
        S: HandTrackingSource,
        H: HeadSource,
    {
        let start = Instant::now();
        self.stats.ticks += 1;

        // Local side
        let (left, right) = self.sampler.sample_both(tracking);
        let head = self.head.sample(head);
        let local = self.builder.build(head, &left, &right);
        self.last_hands = self.builder.hands_view(&left, &right);
        self.last_local = Some(local);
        self.push_outgoing(SnapshotCodec::encode(&local));

        // Remote side
        self.apply_inbound();
        self.smooth_remote(dt);

        self.stats.last_tick_duration = start.elapsed();
        local
    }

    fn push_outgoing(&mut self, snapshot: Bytes) {
        self.stats.outgoing_built += 1;
        if self.config.node.outbox_capacity == 0 {
            self.stats.outgoing_dropped += 1;
            return;
        }
        while self.outbox.len() >= self.config.node.outbox_capacity {
            self.outbox.pop_front();
            self.stats.outgoing_dropped += 1;
        }
        self.outbox.push_back(snapshot);
    }

    fn apply_inbound(&mut self) {
        while let Some(event) = self.inbox.pop_front() {
            match event {
                InboundEvent::Snapshot { peer, payload } => {
                    match self.remote.on_bytes_received(peer, &payload) {
                        Ok(Applied::Created) => {
                            self.stats.peers_joined += 1;
                            self.stats.snapshots_applied += 1;
                        }
                        Ok(Applied::Updated) => self.stats.snapshots_applied += 1,
                        Ok(Applied::IgnoredSelf) => self.stats.snapshots_ignored += 1,
                        Err(_) => self.stats.snapshots_rejected += 1,
                    }
                }
                InboundEvent::Disconnect { peer } => {
                    if self.remote.on_peer_disconnected(peer).is_some() {
                        self.stats.peers_left += 1;
                    }
                }
            }
        }
    }

    fn smooth_remote(&mut self, dt: f32) {
        let peers: Vec<PeerId> = self.remote.peer_ids().collect();
        for peer in peers {
            if self.remote.tick(peer, dt) == Some(SmoothStep::Snapped) {
                self.stats.heads_snapped += 1;
            }
        }
    }

    /// Frame state from the last tick
    pub fn local_state(&self) -> Option<&LocalFrameState> {
        self.last_local.as_ref()
    }

    /// Local hand display positions from the last tick
    pub fn local_hands(&self) -> &LocalHandsView {
        &self.last_hands
    }

    pub fn remote_state(&self, peer: PeerId) -> Option<&RemoteFrameState> {
        self.remote.peer(peer)
    }

    pub fn remote_view(&self, peer: PeerId) -> Option<AvatarView> {
        self.remote.view(peer)
    }

    pub fn remote_views(&self) -> Vec<(PeerId, AvatarView)> {
        self.remote.views()
    }

    pub fn remote_peer_count(&self) -> usize {
        self.remote.len()
    }

    pub fn pending_inbound(&self) -> usize {
        self.inbox.len()
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handsync_core::{
        FingerTip, HandPose, HandSide, NodeConfig, SmoothingConfig, TrackedJoint, Transform, Vec3,
    };
    use handsync_remote::HandDisplay;
    use handsync_tracking::{JointPose, Untracked};
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Both hands open at fixed wrists
    struct OpenHands;

    impl HandTrackingSource for OpenHands {
        fn try_get_joint_pose(&self, joint: TrackedJoint, side: HandSide) -> Option<JointPose> {
            let wrist = match side {
                HandSide::Left => Vec3::new(-0.2, 1.2, 0.3),
                HandSide::Right => Vec3::new(0.2, 1.2, 0.3),
            };
            let position = match joint {
                TrackedJoint::Wrist => wrist,
                TrackedJoint::Tip(FingerTip::Thumb) => wrist + Vec3::new(0.05, 0.05, 0.0),
                TrackedJoint::Tip(_) => wrist + Vec3::new(0.0, 0.12, 0.0),
            };
            Some(JointPose::at(position))
        }
    }

    struct FixedHead(Transform);

    impl HeadSource for FixedHead {
        fn head_transform(&self) -> Option<Transform> {
            Some(self.0)
        }
    }

    fn node(local: u64) -> Node {
        Node::with_config(HandsyncConfig {
            node: NodeConfig {
                local_peer: PeerId::new(local),
                ..NodeConfig::default()
            },
            ..HandsyncConfig::default()
        })
        .unwrap()
    }

    fn remote_snapshot(head: Vec3, pose: HandPose) -> Bytes {
        SnapshotCodec::encode(&LocalFrameState {
            head: Transform::at(head),
            is_tracking: true,
            left_pose: pose,
            right_pose: pose,
            ..LocalFrameState::default()
        })
    }

    #[test]
    fn test_tick_produces_snapshot() {
        let mut node = node(1);
        let head = FixedHead(Transform::at(Vec3::new(0.0, 1.7, 0.0)));

        let local = node.tick(0.016, &OpenHands, &head);
        assert!(local.is_tracking);
        assert_eq!(local.left_pose, HandPose::Normal);
        assert_eq!(local.head.position, Vec3::new(0.0, 1.7, 0.0));

        let bytes = node.pop_outgoing().unwrap();
        let decoded = SnapshotCodec::decode(&bytes).unwrap();
        assert_eq!(decoded.left_pose, HandPose::Normal);
        assert!(node.pop_outgoing().is_none());
        assert_eq!(node.stats().outgoing_popped, 1);
    }

    #[test]
    fn test_untracked_tick() {
        let mut node = Node::new();
        let local = node.tick(0.016, &Untracked, &Untracked);
        assert!(!local.is_tracking);
        assert_eq!(local.head, Transform::default());
        assert!(!node.local_hands().left.tracked);
    }

    #[test]
    fn test_inbound_snapshots_build_remote_avatars() {
        let mut node = node(1);
        let peer = PeerId::new(2);

        node.queue_incoming(peer, remote_snapshot(Vec3::ZERO, HandPose::Point));
        assert_eq!(node.pending_inbound(), 1);
        node.tick(0.016, &Untracked, &Untracked);

        assert_eq!(node.pending_inbound(), 0);
        assert_eq!(node.remote_peer_count(), 1);
        let view = node.remote_view(peer).unwrap();
        assert_eq!(view.left.display, HandDisplay::Point);
        assert_eq!(node.stats().peers_joined, 1);
    }

    #[test]
    fn test_remote_head_smoothed_across_ticks() {
        let mut node = node(1);
        let peer = PeerId::new(2);
        node.queue_incoming(peer, remote_snapshot(Vec3::ZERO, HandPose::Normal));
        node.tick(0.016, &Untracked, &Untracked);

        node.queue_incoming(peer, remote_snapshot(Vec3::new(0.4, 0.0, 0.0), HandPose::Normal));
        node.tick(0.1, &Untracked, &Untracked);
        let first = node.remote_view(peer).unwrap().head.position.x;
        assert!(first > 0.0 && first < 0.4);

        // No new snapshot; smoothing continues toward the held target
        node.tick(0.1, &Untracked, &Untracked);
        let second = node.remote_view(peer).unwrap().head.position.x;
        assert!(second > first && second < 0.4);
    }

    #[test]
    fn test_malformed_snapshot_counted_and_ignored() {
        let mut node = node(1);
        let peer = PeerId::new(2);
        node.queue_incoming(peer, remote_snapshot(Vec3::new(0.1, 0.0, 0.0), HandPose::Normal));
        node.tick(0.016, &Untracked, &Untracked);
        let before = node.remote_state(peer).cloned();

        node.queue_incoming(peer, Bytes::new());
        node.tick(0.0, &Untracked, &Untracked);

        assert_eq!(node.stats().snapshots_rejected, 1);
        assert_eq!(node.remote_state(peer).cloned(), before);
    }

    #[test]
    fn test_own_snapshots_never_become_avatars() {
        let mut node = node(7);
        node.tick(0.016, &OpenHands, &Untracked);
        let own = node.pop_outgoing().unwrap();

        node.queue_incoming(PeerId::new(7), own);
        node.tick(0.016, &OpenHands, &Untracked);

        assert_eq!(node.remote_peer_count(), 0);
        assert_eq!(node.stats().snapshots_ignored, 1);
    }

    #[test]
    fn test_disconnect_after_snapshot_in_same_tick() {
        let mut node = node(1);
        let peer = PeerId::new(2);
        node.queue_incoming(peer, remote_snapshot(Vec3::ZERO, HandPose::Normal));
        node.queue_datagram(Datagram::Leave { peer });
        node.tick(0.016, &Untracked, &Untracked);

        assert_eq!(node.remote_peer_count(), 0);
        assert_eq!(node.stats().peers_left, 1);
    }

    #[test]
    fn test_inbox_drops_oldest_when_full() {
        let mut node = Node::with_config(HandsyncConfig {
            node: NodeConfig {
                inbox_capacity: 2,
                ..NodeConfig::default()
            },
            ..HandsyncConfig::default()
        })
        .unwrap();
        let peer = PeerId::new(3);

        node.queue_incoming(peer, remote_snapshot(Vec3::ZERO, HandPose::Normal));
        node.queue_incoming(peer, remote_snapshot(Vec3::ZERO, HandPose::Point));
        node.queue_incoming(peer, remote_snapshot(Vec3::ZERO, HandPose::ThumbUp));
        assert_eq!(node.pending_inbound(), 2);
        assert_eq!(node.stats().inbound_dropped, 1);

        node.tick(0.016, &Untracked, &Untracked);
        assert_eq!(node.remote_state(peer).unwrap().left_pose, HandPose::ThumbUp);
        assert_eq!(node.stats().snapshots_applied, 2);
    }

    fn small_inbox_node(capacity: usize) -> Node {
        Node::with_config(HandsyncConfig {
            node: NodeConfig {
                local_peer: PeerId::new(1),
                inbox_capacity: capacity,
                ..NodeConfig::default()
            },
            ..HandsyncConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_full_inbox_keeps_disconnect() {
        let mut node = small_inbox_node(2);
        let leaving = PeerId::new(2);
        let other = PeerId::new(3);
        node.queue_incoming(leaving, remote_snapshot(Vec3::ZERO, HandPose::Normal));
        node.tick(0.016, &Untracked, &Untracked);
        assert!(node.remote_state(leaving).is_some());

        node.queue_disconnect(leaving);
        node.queue_incoming(other, remote_snapshot(Vec3::ZERO, HandPose::Normal));
        node.queue_incoming(other, remote_snapshot(Vec3::ZERO, HandPose::Point));
        assert_eq!(node.pending_inbound(), 2);
        assert_eq!(node.stats().inbound_dropped, 1);

        for _ in 0..10 {
            node.tick(0.016, &Untracked, &Untracked);
        }
        assert!(node.remote_state(leaving).is_none());
        assert_eq!(node.stats().peers_left, 1);
        assert_eq!(node.remote_state(other).unwrap().left_pose, HandPose::Point);
    }

    #[test]
    fn test_inbox_of_disconnects_drops_new_snapshots() {
        let mut node = small_inbox_node(1);
        for id in [2, 3] {
            node.queue_incoming(PeerId::new(id), remote_snapshot(Vec3::ZERO, HandPose::Normal));
            node.tick(0.016, &Untracked, &Untracked);
        }
        assert_eq!(node.remote_peer_count(), 2);

        node.queue_disconnect(PeerId::new(2));
        node.queue_disconnect(PeerId::new(3));
        node.queue_incoming(PeerId::new(4), remote_snapshot(Vec3::ZERO, HandPose::Normal));
        assert_eq!(node.pending_inbound(), 2);

        node.tick(0.016, &Untracked, &Untracked);
        assert_eq!(node.remote_peer_count(), 0);
        assert_eq!(node.stats().peers_left, 2);
    }

    #[test]
    fn test_outbox_keeps_newest() {
        let mut node = Node::with_config(HandsyncConfig {
            node: NodeConfig {
                outbox_capacity: 1,
                ..NodeConfig::default()
            },
            ..HandsyncConfig::default()
        })
        .unwrap();

        node.tick(0.016, &Untracked, &Untracked);
        node.tick(0.016, &OpenHands, &Untracked);

        let latest = SnapshotCodec::decode(&node.pop_outgoing().unwrap()).unwrap();
        assert!(latest.hands_tracked);
        assert!(node.pop_outgoing().is_none());
        assert_eq!(node.stats().outgoing_dropped, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = HandsyncConfig {
            smoothing: SmoothingConfig {
                smoothing_factor: -1.0,
                ..SmoothingConfig::default()
            },
            ..HandsyncConfig::default()
        };
        assert!(Node::with_config(config).is_err());
    }

    #[test]
    fn test_tick_interval() {
        assert_eq!(Node::new().tick_interval(), Duration::from_secs(1) / 60);
    }

    fn arb_event() -> impl Strategy<Value = (u64, Option<HandPose>)> {
        (
            2u64..6,
            prop::option::of(prop::sample::select(HandPose::ALL.to_vec())),
        )
    }

    proptest! {
        #[test]
        fn prop_inbound_applied_in_arrival_order(
            events in prop::collection::vec(arb_event(), 0..40),
        ) {
            let mut node = node(1);
            let mut expected: HashMap<PeerId, HandPose> = HashMap::new();

            for (id, pose) in &events {
                let peer = PeerId::new(*id);
                match pose {
                    Some(pose) => {
                        node.queue_incoming(peer, remote_snapshot(Vec3::ZERO, *pose));
                        expected.insert(peer, *pose);
                    }
                    None => {
                        node.queue_disconnect(peer);
                        expected.remove(&peer);
                    }
                }
            }
            node.tick(0.016, &Untracked, &Untracked);

            prop_assert_eq!(node.remote_peer_count(), expected.len());
            for (peer, pose) in &expected {
                prop_assert_eq!(node.remote_state(*peer).map(|s| s.left_pose), Some(*pose));
            }
            prop_assert_eq!(node.stats().inbound_dropped, 0);
        }
    }
}
