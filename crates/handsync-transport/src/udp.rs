//! UDP transport implementation

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

use handsync_core::{HandsyncError, HandsyncResult, PeerId};

use crate::{Datagram, MAX_DATAGRAM_SIZE};

/// Receive buffer size; larger than any valid datagram so oversized
/// input is seen whole and rejected instead of silently truncated
const RECV_BUFFER_SIZE: usize = 2048;

/// A datagram received from the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub datagram: Datagram,
    pub from: SocketAddr,
}

/// UDP transport for snapshot exchange
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    local_addr: SocketAddr,
    local_peer: PeerId,
}

impl UdpTransport {
    /// Bind to a local address, publishing as `local_peer`
    pub async fn bind(addr: SocketAddr, local_peer: PeerId) -> HandsyncResult<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| HandsyncError::Transport(e.to_string()))?;

        let local_addr = socket
            .local_addr()
            .map_err(|e| HandsyncError::Transport(e.to_string()))?;

        tracing::debug!(addr = %local_addr, peer = %local_peer, "udp transport bound");

        Ok(UdpTransport {
            socket: Arc::new(socket),
            local_addr,
            local_peer,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn local_peer(&self) -> PeerId {
        self.local_peer
    }

    /// Send one encoded snapshot to a destination
    pub async fn send_snapshot(&self, snapshot: Bytes, dest: SocketAddr) -> HandsyncResult<()> {
        let datagram = Datagram::Snapshot {
            peer: self.local_peer,
            payload: snapshot,
        };
        self.send_datagram(&datagram, dest).await
    }

    /// Send one encoded snapshot to every destination
    ///
    /// Delivery is best effort; the first failure is returned after all
    /// sends were attempted.
    pub async fn broadcast_snapshot(
        &self,
        snapshot: Bytes,
        dests: &[SocketAddr],
    ) -> HandsyncResult<()> {
        let bytes = Datagram::Snapshot {
            peer: self.local_peer,
            payload: snapshot,
        }
        .encode();

        let mut first_err = None;
        for dest in dests {
            if let Err(err) = self.send_bytes_to(&bytes, *dest).await {
                tracing::warn!(dest = %dest, error = %err, "snapshot send failed");
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Tell a destination this peer is leaving
    pub async fn send_leave(&self, dest: SocketAddr) -> HandsyncResult<()> {
        let datagram = Datagram::Leave {
            peer: self.local_peer,
        };
        self.send_datagram(&datagram, dest).await
    }

    pub async fn send_datagram(&self, datagram: &Datagram, dest: SocketAddr) -> HandsyncResult<()> {
        self.send_bytes_to(&datagram.encode(), dest).await
    }

    /// Send raw bytes to a destination
    pub async fn send_bytes_to(&self, bytes: &[u8], dest: SocketAddr) -> HandsyncResult<()> {
        self.socket
            .send_to(bytes, dest)
            .await
            .map_err(|e| HandsyncError::Transport(e.to_string()))?;
        Ok(())
    }

    /// Receive one datagram
    pub async fn recv(&self) -> HandsyncResult<Inbound> {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let (len, from) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(|e| HandsyncError::Transport(e.to_string()))?;

        let datagram = Datagram::decode(&buf[..len])?;
        Ok(Inbound { datagram, from })
    }

    /// Get a clone of the socket for concurrent operations
    pub fn socket(&self) -> Arc<UdpSocket> {
        Arc::clone(&self.socket)
    }
}

/// Inbound datagram channel
pub type InboundReceiver = mpsc::Receiver<Inbound>;

/// Start a background receive loop
///
/// Datagrams that fail framing or exceed the largest valid size are
/// logged and dropped. The loop ends when the receiver is dropped.
pub fn start_receive_loop(socket: Arc<UdpSocket>, buffer_size: usize) -> InboundReceiver {
    let (tx, rx) = mpsc::channel(buffer_size);

    tokio::spawn(async move {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            match socket.recv_from(&mut buf).await {
                Ok((len, from)) => {
                    if len > MAX_DATAGRAM_SIZE {
                        tracing::warn!(from = %from, len, "dropping oversized datagram");
                        continue;
                    }
                    let datagram = match Datagram::decode(&buf[..len]) {
                        Ok(datagram) => datagram,
                        Err(e) => {
                            tracing::warn!(from = %from, error = %e, "dropping bad datagram");
                            continue;
                        }
                    };
                    if tx.send(Inbound { datagram, from }).await.is_err() {
                        break; // Receiver dropped
                    }
                }
                Err(e) => {
                    tracing::warn!("UDP receive error: {}", e);
                }
            }
        }
    });

    rx
}
