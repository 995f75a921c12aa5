//! Thread-safe reconstructor for transports that deliver off the tick thread
//!
//! The peer map sits behind a `RwLock` and each peer behind its own
//! `Mutex`, so a receive thread applying a snapshot for one peer only
//! serialises against that peer's smoothing step.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use handsync_core::{HandsyncResult, PeerId, SmoothingConfig};
use handsync_wire::{RemoteUpdate, SnapshotCodec};

use crate::{Applied, AvatarView, RemoteFrameState, SmoothStep};

type PeerSlot = Arc<Mutex<RemoteFrameState>>;

/// Shared remote state, safe to drive from several threads
#[derive(Debug, Default)]
pub struct SharedReconstructor {
    peers: RwLock<HashMap<PeerId, PeerSlot>>,
    config: SmoothingConfig,
    local_peer: Option<PeerId>,
}

impl SharedReconstructor {
    pub fn new(config: SmoothingConfig) -> Self {
        Self {
            peers: RwLock::new(HashMap::new()),
            config,
            local_peer: None,
        }
    }

    pub fn with_local_peer(mut self, peer: PeerId) -> Self {
        self.local_peer = Some(peer);
        self
    }

    fn slot(&self, peer: PeerId) -> Option<PeerSlot> {
        self.peers.read().get(&peer).cloned()
    }

    pub fn on_snapshot_received(&self, peer: PeerId, update: &RemoteUpdate) -> Applied {
        if self.local_peer == Some(peer) {
            return Applied::IgnoredSelf;
        }

        // Apply under the read guard so a disconnect cannot orphan the slot
        {
            let peers = self.peers.read();
            if let Some(slot) = peers.get(&peer) {
                slot.lock().apply(update);
                return Applied::Updated;
            }
        }

        // Re-check under the write lock; another thread may have won
        let mut peers = self.peers.write();
        match peers.get(&peer) {
            Some(slot) => {
                slot.lock().apply(update);
                Applied::Updated
            }
            None => {
                tracing::info!(peer = %peer, "remote peer joined");
                peers.insert(
                    peer,
                    Arc::new(Mutex::new(RemoteFrameState::from_update(update))),
                );
                Applied::Created
            }
        }
    }

    pub fn on_bytes_received(&self, peer: PeerId, bytes: &[u8]) -> HandsyncResult<Applied> {
        let update = SnapshotCodec::decode(bytes).map_err(|err| {
            tracing::warn!(peer = %peer, error = %err, "discarding malformed snapshot");
            err
        })?;
        Ok(self.on_snapshot_received(peer, &update))
    }

    pub fn tick(&self, peer: PeerId, dt: f32) -> Option<SmoothStep> {
        let slot = self.slot(peer)?;
        let step = slot.lock().smooth(dt, &self.config);
        Some(step)
    }

    pub fn tick_all(&self, dt: f32) {
        let slots: Vec<PeerSlot> = self.peers.read().values().cloned().collect();
        for slot in slots {
            slot.lock().smooth(dt, &self.config);
        }
    }

    pub fn on_peer_disconnected(&self, peer: PeerId) -> Option<RemoteFrameState> {
        let slot = self.peers.write().remove(&peer)?;
        tracing::info!(peer = %peer, "remote peer left");
        let state = slot.lock().clone();
        Some(state)
    }

    /// Copy of one peer's state
    pub fn peer(&self, peer: PeerId) -> Option<RemoteFrameState> {
        self.slot(peer).map(|slot| slot.lock().clone())
    }

    pub fn view(&self, peer: PeerId) -> Option<AvatarView> {
        self.slot(peer).map(|slot| slot.lock().render_view())
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}
