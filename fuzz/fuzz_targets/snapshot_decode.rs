#![no_main]

use libfuzzer_sys::fuzz_target;

use handsync_core::PeerId;
use handsync_remote::RemoteStateReconstructor;
use handsync_wire::{SnapshotCodec, SNAPSHOT_SIZE};

fuzz_target!(|data: &[u8]| {
    let decoded = SnapshotCodec::decode(data);
    if data.len() != SNAPSHOT_SIZE {
        assert!(decoded.is_err());
    }

    // A rejected snapshot must leave existing state untouched
    let mut recon = RemoteStateReconstructor::default();
    let peer = PeerId::new(1);
    recon.on_snapshot_received(peer, &Default::default());
    let before = recon.peer(peer).cloned();
    if recon.on_bytes_received(peer, data).is_err() {
        assert_eq!(recon.peer(peer).cloned(), before);
    }
    recon.tick(peer, 0.016);
});
