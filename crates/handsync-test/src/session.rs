//! Multi-peer session simulation
//!
//! Every peer runs a real [`Node`]. Each directed pair of peers is joined
//! by its own [`LossyLink`], so loss and latency are independent per
//! direction while per-sender ordering holds.

use std::collections::BTreeMap;
use std::time::Duration;

use handsync_core::{HandsyncConfig, HandsyncResult, LocalFrameState, NodeConfig, PeerId};
use handsync_runtime::Node;

use crate::{LossyConfig, LossyLink, ScriptedHands, ScriptedHead};

/// One simulated participant
pub struct SimulatedPeer {
    pub node: Node,
    pub hands: ScriptedHands,
    pub head: ScriptedHead,
}

/// A set of peers exchanging snapshots over lossy links
pub struct SimulatedSession {
    peers: BTreeMap<PeerId, SimulatedPeer>,
    links: BTreeMap<(PeerId, PeerId), LossyLink>,
    link_config: LossyConfig,
    base_config: HandsyncConfig,
    seed: u64,
    elapsed: Duration,
}

impl SimulatedSession {
    pub fn new(link_config: LossyConfig, seed: u64) -> Self {
        Self::with_config(HandsyncConfig::default(), link_config, seed)
    }

    /// Session whose nodes share `base_config` apart from their peer id
    pub fn with_config(base_config: HandsyncConfig, link_config: LossyConfig, seed: u64) -> Self {
        SimulatedSession {
            peers: BTreeMap::new(),
            links: BTreeMap::new(),
            link_config,
            base_config,
            seed,
            elapsed: Duration::ZERO,
        }
    }

    /// Add a peer and connect it both ways to everyone present
    pub fn join(&mut self, id: PeerId) -> HandsyncResult<()> {
        let config = HandsyncConfig {
            node: NodeConfig {
                local_peer: id,
                ..self.base_config.node.clone()
            },
            ..self.base_config.clone()
        };
        let node = Node::with_config(config)?;

        let others: Vec<PeerId> = self.peers.keys().copied().collect();
        for other in others {
            for (from, to) in [(id, other), (other, id)] {
                let seed = self.seed ^ from.0.wrapping_mul(31) ^ to.0.wrapping_mul(1_000_003);
                self.links
                    .insert((from, to), LossyLink::new(self.link_config.clone(), seed));
            }
        }

        self.peers.insert(
            id,
            SimulatedPeer {
                node,
                hands: ScriptedHands::new(),
                head: ScriptedHead::default(),
            },
        );
        Ok(())
    }

    /// Remove a peer; everyone else gets a disconnect after in-flight
    /// snapshots from it have landed
    pub fn leave(&mut self, id: PeerId) -> Option<SimulatedPeer> {
        let peer = self.peers.remove(&id)?;

        let pairs: Vec<(PeerId, PeerId)> = self
            .links
            .keys()
            .filter(|(from, to)| *from == id || *to == id)
            .copied()
            .collect();
        for pair in pairs {
            if let Some(mut link) = self.links.remove(&pair) {
                let (from, to) = pair;
                if from != id {
                    continue;
                }
                if let Some(receiver) = self.peers.get_mut(&to) {
                    // Flush whatever was still travelling, then disconnect
                    for payload in link.tick(Duration::from_secs(3600)) {
                        receiver.node.queue_incoming(from, payload);
                    }
                    receiver.node.queue_disconnect(from);
                }
            }
        }
        Some(peer)
    }

    pub fn peer(&self, id: PeerId) -> Option<&SimulatedPeer> {
        self.peers.get(&id)
    }

    pub fn peer_mut(&mut self, id: PeerId) -> Option<&mut SimulatedPeer> {
        self.peers.get_mut(&id)
    }

    /// Advance the whole session by one tick of `dt`
    ///
    /// Each peer ticks (consuming what arrived during the previous step),
    /// then its snapshots are pushed into its outgoing links, then every
    /// link advances and deposits arrivals into the receivers' inboxes.
    pub fn step(&mut self, dt: Duration) -> BTreeMap<PeerId, LocalFrameState> {
        let dt_secs = dt.as_secs_f32();
        let mut frames = BTreeMap::new();

        for (id, peer) in self.peers.iter_mut() {
            let frame = peer.node.tick(dt_secs, &peer.hands, &peer.head);
            frames.insert(*id, frame);

            while let Some(snapshot) = peer.node.pop_outgoing() {
                for ((from, _), link) in self.links.iter_mut() {
                    if from == id {
                        link.send(snapshot.clone());
                    }
                }
            }
        }

        for ((from, to), link) in self.links.iter_mut() {
            let arrivals = link.tick(dt);
            if let Some(receiver) = self.peers.get_mut(to) {
                for payload in arrivals {
                    receiver.node.queue_incoming(*from, payload);
                }
            }
        }

        self.elapsed += dt;
        frames
    }

    /// Step `count` times at a fixed `dt`
    pub fn run(&mut self, count: usize, dt: Duration) {
        for _ in 0..count {
            self.step(dt);
        }
    }

    pub fn link(&self, from: PeerId, to: PeerId) -> Option<&LossyLink> {
        self.links.get(&(from, to))
    }

    pub fn peer_ids(&self) -> impl Iterator<Item = PeerId> + '_ {
        self.peers.keys().copied()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
