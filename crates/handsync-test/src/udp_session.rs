//! End-to-end peer over real UDP sockets

use std::net::SocketAddr;

use handsync_core::{HandsyncConfig, HandsyncResult, LocalFrameState, NodeConfig, PeerId};
use handsync_runtime::Node;
use handsync_tracking::{HandTrackingSource, HeadSource};
use handsync_transport::{start_receive_loop, InboundReceiver, UdpTransport};

/// A node bound to a loopback socket
pub struct UdpPeer {
    pub node: Node,
    transport: UdpTransport,
    inbox: InboundReceiver,
    remotes: Vec<SocketAddr>,
}

impl UdpPeer {
    /// Bind on an ephemeral localhost port
    pub async fn bind(id: PeerId) -> HandsyncResult<Self> {
        let config = HandsyncConfig {
            node: NodeConfig {
                local_peer: id,
                ..NodeConfig::default()
            },
            ..HandsyncConfig::default()
        };
        let node = Node::with_config(config)?;
        let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
        let transport = UdpTransport::bind(addr, id).await?;
        let inbox = start_receive_loop(transport.socket(), 256);
        Ok(UdpPeer {
            node,
            transport,
            inbox,
            remotes: Vec::new(),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.transport.local_addr()
    }

    pub fn connect(&mut self, remote: SocketAddr) {
        if !self.remotes.contains(&remote) {
            self.remotes.push(remote);
        }
    }

    /// Queue arrivals, tick, and send this tick's snapshot to every remote
    pub async fn step<S, H>(&mut self, dt: f32, hands: &S, head: &H) -> HandsyncResult<LocalFrameState>
    where
        S: HandTrackingSource,
        H: HeadSource,
    {
        while let Ok(inbound) = self.inbox.try_recv() {
            self.node.queue_datagram(inbound.datagram);
        }

        let frame = self.node.tick(dt, hands, head);

        while let Some(snapshot) = self.node.pop_outgoing() {
            self.transport
                .broadcast_snapshot(snapshot, &self.remotes)
                .await?;
        }
        Ok(frame)
    }

    /// Tell every remote this peer is leaving
    pub async fn leave(&self) -> HandsyncResult<()> {
        for remote in &self.remotes {
            self.transport.send_leave(*remote).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandShape, ScriptedHands, ScriptedHead};
    use handsync_core::Vec3;
    use handsync_remote::HandDisplay;
    use handsync_tracking::Untracked;
    use std::time::Duration;

    async fn pair() -> (UdpPeer, UdpPeer) {
        let mut a = UdpPeer::bind(PeerId::new(1)).await.unwrap();
        let mut b = UdpPeer::bind(PeerId::new(2)).await.unwrap();
        a.connect(b.local_addr());
        b.connect(a.local_addr());
        (a, b)
    }

    #[tokio::test]
    async fn test_udp_peers_exchange_avatars() {
        let (mut a, mut b) = pair().await;
        let hands = ScriptedHands::both(
            HandShape::point(Vec3::new(-0.2, 1.1, 0.3)),
            HandShape::open(Vec3::new(0.2, 1.1, 0.3)),
        );
        let head = ScriptedHead::at(Vec3::new(0.0, 1.7, 0.0));

        for _ in 0..200 {
            a.step(0.016, &hands, &head).await.unwrap();
            b.step(0.016, &Untracked, &Untracked).await.unwrap();
            if b.node.remote_view(PeerId::new(1)).is_some()
                && a.node.remote_view(PeerId::new(2)).is_some()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let view = b.node.remote_view(PeerId::new(1)).unwrap();
        assert_eq!(view.left.display, HandDisplay::Point);
        assert_eq!(view.right.display, HandDisplay::Normal);
        assert_eq!(view.head.position, Vec3::new(0.0, 1.7, 0.0));

        let seen_by_a = a.node.remote_view(PeerId::new(2)).unwrap();
        assert_eq!(seen_by_a.left.display, HandDisplay::Hidden);
    }

    #[tokio::test]
    async fn test_udp_leave_removes_avatar() {
        let (mut a, mut b) = pair().await;

        for _ in 0..200 {
            a.step(0.016, &Untracked, &Untracked).await.unwrap();
            b.step(0.016, &Untracked, &Untracked).await.unwrap();
            if b.node.remote_peer_count() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(b.node.remote_peer_count(), 1);

        a.leave().await.unwrap();
        for _ in 0..200 {
            b.step(0.016, &Untracked, &Untracked).await.unwrap();
            if b.node.remote_peer_count() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(b.node.remote_peer_count(), 0);
    }
}
