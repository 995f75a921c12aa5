//! Benchmarks for the snapshot codec and datagram framing

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use handsync_core::{HandPose, LocalFrameState, PeerId, Quat, Transform, Vec3};
use handsync_transport::Datagram;
use handsync_wire::SnapshotCodec;

fn sample_state() -> LocalFrameState {
    LocalFrameState {
        head: Transform::new(Vec3::new(0.1, 1.7, -0.4), Quat::new(0.0, 0.3827, 0.0, 0.9239)),
        is_tracking: true,
        left_wrist: Transform::new(Vec3::new(-0.2, 1.2, 0.1), Quat::new(0.1, 0.2, 0.3, 0.9)),
        right_wrist: Transform::at(Vec3::new(0.2, 1.25, 0.1)),
        left_pose: HandPose::Point,
        right_pose: HandPose::ThumbUp,
    }
}

fn bench_snapshot_encode(c: &mut Criterion) {
    let state = sample_state();

    c.bench_function("snapshot_encode", |b| {
        b.iter(|| SnapshotCodec::encode(black_box(&state)))
    });
}

fn bench_snapshot_decode(c: &mut Criterion) {
    let bytes = SnapshotCodec::encode(&sample_state());

    c.bench_function("snapshot_decode", |b| {
        b.iter(|| SnapshotCodec::decode(black_box(&bytes)))
    });
}

fn bench_datagram_roundtrip(c: &mut Criterion) {
    let datagram = Datagram::Snapshot {
        peer: PeerId::new(0xDEADBEEF_CAFEBABE),
        payload: SnapshotCodec::encode(&sample_state()),
    };
    let bytes = datagram.encode();

    c.bench_function("datagram_roundtrip", |b| {
        b.iter(|| {
            let parsed = Datagram::decode(black_box(&bytes));
            black_box(parsed)
        })
    });
}

criterion_group!(
    benches,
    bench_snapshot_encode,
    bench_snapshot_decode,
    bench_datagram_roundtrip
);
criterion_main!(benches);
