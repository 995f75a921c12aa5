//! Single-threaded reconstructor keyed by peer

use std::collections::HashMap;

use handsync_core::{HandsyncResult, PeerId, SmoothingConfig};
use handsync_wire::{RemoteUpdate, SnapshotCodec};

use crate::{AvatarView, RemoteFrameState, SmoothStep};

/// Outcome of offering a snapshot to the reconstructor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// First snapshot from this peer; state created
    Created,
    /// Existing peer state updated
    Updated,
    /// Snapshot carried the local peer id and was dropped
    IgnoredSelf,
}

/// Remote state for every connected peer, driven from the tick thread
#[derive(Debug, Default)]
pub struct RemoteStateReconstructor {
    peers: HashMap<PeerId, RemoteFrameState>,
    config: SmoothingConfig,
    local_peer: Option<PeerId>,
}

impl RemoteStateReconstructor {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            peers: HashMap::new(),
            config,
            local_peer: None,
        }
    }

    /// Never build an avatar for `peer`
    pub fn with_local_peer(mut self, peer: PeerId) -> Self {
        self.local_peer = Some(peer);
        self
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Apply a decoded snapshot, creating the peer on first contact
    pub fn on_snapshot_received(&mut self, peer: PeerId, update: &RemoteUpdate) -> Applied {
        if self.local_peer == Some(peer) {
            tracing::trace!(peer = %peer, "ignoring snapshot from local peer");
            return Applied::IgnoredSelf;
        }

        match self.peers.get_mut(&peer) {
            Some(state) => {
                state.apply(update);
                Applied::Updated
            }
            None => {
                tracing::info!(peer = %peer, "remote peer joined");
                self.peers.insert(peer, RemoteFrameState::from_update(update));
                Applied::Created
            }
        }
    }

    /// Decode and apply raw snapshot bytes
    ///
    /// A malformed snapshot is returned as an error and leaves the peer's
    /// state exactly as it was.
    pub fn on_bytes_received(&mut self, peer: PeerId, bytes: &[u8]) -> HandsyncResult<Applied> {
        let update = SnapshotCodec::decode(bytes).map_err(|err| {
            tracing::warn!(peer = %peer, error = %err, "discarding malformed snapshot");
            err
        })?;
        Ok(self.on_snapshot_received(peer, &update))
    }

    /// Smooth one peer; `None` if the peer is unknown
    pub fn tick(&mut self, peer: PeerId, dt: f32) -> Option<SmoothStep> {
        let state = self.peers.get_mut(&peer)?;
        let step = state.smooth(dt, &self.config);
        if step == SmoothStep::Snapped {
            tracing::trace!(peer = %peer, "head snapped to target");
        }
        Some(step)
    }

    /// Smooth every known peer
    pub fn tick_all(&mut self, dt: f32) {
        for (peer, state) in self.peers.iter_mut() {
            if state.smooth(dt, &self.config) == SmoothStep::Snapped {
                tracing::trace!(peer = %peer, "head snapped to target");
            }
        }
    }

    /// Drop a peer's state; returns what was removed
    pub fn on_peer_disconnected(&mut self, peer: PeerId) -> Option<RemoteFrameState> {
        let removed = self.peers.remove(&peer);
        if removed.is_some() {
            tracing::info!(peer = %peer, "remote peer left");
        }
        removed
    }

    pub fn peer(&self, peer: PeerId) -> Option<&RemoteFrameState> {
        self.peers.get(&peer)
    }

    pub fn view(&self, peer: PeerId) -> Option<AvatarView> {
        self.peers.get(&peer).map(RemoteFrameState::render_view)
    }

    /// Render data for every peer, ordered by peer id
    pub fn views(&self) -> Vec<(PeerId, AvatarView)> {
        let mut views: Vec<_> = self
            .peers
            .iter()
            .map(|(peer, state)| (*peer, state.render_view()))
            .collect();
        views.sort_by_key(|(peer, _)| *peer);
        views
    }

    pub fn peer_ids(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.peers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
