//! Datagram framing
//!
//! ```text
//! [u8 kind][u64 peer LE][payload]
//! ```
//!
//! A snapshot datagram carries exactly one encoded snapshot. A leave
//! datagram has no payload.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use handsync_core::{HandsyncError, HandsyncResult, PeerId};
use handsync_wire::SNAPSHOT_SIZE;

/// Datagram header size
pub const HEADER_SIZE: usize = 1 + 8;

/// Largest datagram this transport produces
pub const MAX_DATAGRAM_SIZE: usize = HEADER_SIZE + SNAPSHOT_SIZE;

const KIND_SNAPSHOT: u8 = 0x01;
const KIND_LEAVE: u8 = 0x02;

/// One transport message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datagram {
    /// Snapshot bytes from `peer`, not yet decoded
    Snapshot { peer: PeerId, payload: Bytes },
    /// `peer` is leaving the session
    Leave { peer: PeerId },
}

impl Datagram {
    pub fn peer(&self) -> PeerId {
        match self {
            Datagram::Snapshot { peer, .. } | Datagram::Leave { peer } => *peer,
        }
    }

    pub fn encode(&self) -> Bytes {
        match self {
            Datagram::Snapshot { peer, payload } => {
                let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len());
                buf.put_u8(KIND_SNAPSHOT);
                buf.put_u64_le(peer.0);
                buf.put_slice(payload);
                buf.freeze()
            }
            Datagram::Leave { peer } => {
                let mut buf = BytesMut::with_capacity(HEADER_SIZE);
                buf.put_u8(KIND_LEAVE);
                buf.put_u64_le(peer.0);
                buf.freeze()
            }
        }
    }

    /// Split a received datagram; the snapshot payload is left to the codec
    pub fn decode(data: &[u8]) -> HandsyncResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(HandsyncError::Transport(format!(
                "datagram too short: {} bytes",
                data.len()
            )));
        }

        let mut buf = data;
        let kind = buf.get_u8();
        let peer = PeerId::new(buf.get_u64_le());

        match kind {
            KIND_SNAPSHOT => Ok(Datagram::Snapshot {
                peer,
                payload: Bytes::copy_from_slice(buf),
            }),
            KIND_LEAVE if buf.is_empty() => Ok(Datagram::Leave { peer }),
            KIND_LEAVE => Err(HandsyncError::Transport(format!(
                "leave datagram with {} payload bytes",
                buf.len()
            ))),
            other => Err(HandsyncError::Transport(format!(
                "unknown datagram kind {:#04x}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_datagram_layout() {
        let payload = Bytes::from_static(&[0xAA; SNAPSHOT_SIZE]);
        let datagram = Datagram::Snapshot {
            peer: PeerId::new(0x0102),
            payload: payload.clone(),
        };
        let encoded = datagram.encode();

        assert_eq!(encoded.len(), MAX_DATAGRAM_SIZE);
        assert_eq!(encoded[0], KIND_SNAPSHOT);
        assert_eq!(&encoded[1..9], &PeerId::new(0x0102).to_bytes());
        assert_eq!(&encoded[HEADER_SIZE..], &payload[..]);
        assert_eq!(Datagram::decode(&encoded).unwrap(), datagram);
    }

    #[test]
    fn test_leave_datagram() {
        let datagram = Datagram::Leave {
            peer: PeerId::new(42),
        };
        let encoded = datagram.encode();
        assert_eq!(encoded.len(), HEADER_SIZE);
        assert_eq!(Datagram::decode(&encoded).unwrap(), datagram);
        assert_eq!(datagram.peer(), PeerId::new(42));
    }

    #[test]
    fn test_rejects_bad_datagrams() {
        assert!(Datagram::decode(&[]).is_err());
        assert!(Datagram::decode(&[KIND_SNAPSHOT, 1, 2]).is_err());

        let mut unknown = vec![0x7F];
        unknown.extend_from_slice(&PeerId::new(1).to_bytes());
        assert!(Datagram::decode(&unknown).is_err());

        let mut padded_leave = Datagram::Leave { peer: PeerId::new(1) }.encode().to_vec();
        padded_leave.push(0);
        assert!(Datagram::decode(&padded_leave).is_err());
    }

    #[test]
    fn test_short_snapshot_payload_passes_through() {
        // Payload validation belongs to the snapshot codec
        let datagram = Datagram::Snapshot {
            peer: PeerId::new(5),
            payload: Bytes::from_static(&[1, 2, 3]),
        };
        let decoded = Datagram::decode(&datagram.encode()).unwrap();
        assert_eq!(decoded, datagram);
    }
}
