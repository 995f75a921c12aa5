//! Snapshot codec - LocalFrameState out, RemoteUpdate in

use bytes::{Buf, BufMut, Bytes, BytesMut};

use handsync_core::{
    HandPose, HandSide, HandsyncError, HandsyncResult, LocalFrameState, Quat, Transform, Vec3,
};

/// Encoded Vec3 size (3 x f32)
pub const VEC3_SIZE: usize = 12;

/// Encoded Quat size (4 x f32)
pub const QUAT_SIZE: usize = 16;

/// Encoded transform size
pub const TRANSFORM_SIZE: usize = VEC3_SIZE + QUAT_SIZE;

/// Total snapshot size: head + flag + two wrists + two pose indices
pub const SNAPSHOT_SIZE: usize = TRANSFORM_SIZE + 1 + TRANSFORM_SIZE * 2 + 4 * 2;

/// A decoded snapshot from a remote peer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RemoteUpdate {
    pub head: Transform,
    pub hands_tracked: bool,
    pub left_hand: Transform,
    pub right_hand: Transform,
    pub left_pose: HandPose,
    pub right_pose: HandPose,
}

impl RemoteUpdate {
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
}

impl From<&LocalFrameState> for RemoteUpdate {
    fn from(state: &LocalFrameState) -> Self {
        RemoteUpdate {
            head: state.head,
            hands_tracked: state.is_tracking,
            left_hand: state.left_wrist,
            right_hand: state.right_wrist,
            left_pose: state.left_pose,
            right_pose: state.right_pose,
        }
    }
}

/// Snapshot encoder/decoder
pub struct SnapshotCodec;

impl SnapshotCodec {
    /// Encode a frame state; the result is always `SNAPSHOT_SIZE` bytes
    pub fn encode(state: &LocalFrameState) -> Bytes {
        let mut buf = BytesMut::with_capacity(SNAPSHOT_SIZE);
        Self::encode_into(state, &mut buf);
        buf.freeze()
    }

    /// Append an encoded frame state to `buf`
    pub fn encode_into<B: BufMut>(state: &LocalFrameState, buf: &mut B) {
        put_transform(buf, &state.head);
        buf.put_u8(u8::from(state.is_tracking));
        put_transform(buf, &state.left_wrist);
        put_transform(buf, &state.right_wrist);
        buf.put_i32_le(state.left_pose.index());
        buf.put_i32_le(state.right_pose.index());
    }

    /// Decode a snapshot
    ///
    /// Fails without partial results if the input is not exactly one
    /// well-formed snapshot.
    pub fn decode(data: &[u8]) -> HandsyncResult<RemoteUpdate> {
        if data.len() < SNAPSHOT_SIZE {
            return Err(HandsyncError::MalformedSnapshot {
                expected: SNAPSHOT_SIZE,
                actual: data.len(),
            });
        }
        if data.len() > SNAPSHOT_SIZE {
            return Err(HandsyncError::TrailingBytes {
                expected: SNAPSHOT_SIZE,
                actual: data.len(),
            });
        }

        let mut buf = data;

        let head = get_transform(&mut buf, "head")?;
        let hands_tracked = match buf.get_u8() {
            0 => false,
            1 => true,
            other => return Err(HandsyncError::InvalidFlag(other)),
        };
        let left_hand = get_transform(&mut buf, "left hand")?;
        let right_hand = get_transform(&mut buf, "right hand")?;
        let left_pose = get_pose(&mut buf)?;
        let right_pose = get_pose(&mut buf)?;

        Ok(RemoteUpdate {
            head,
            hands_tracked,
            left_hand,
            right_hand,
            left_pose,
            right_pose,
        })
    }
}

fn put_vec3<B: BufMut>(buf: &mut B, v: &Vec3) {
    buf.put_f32_le(v.x);
    buf.put_f32_le(v.y);
    buf.put_f32_le(v.z);
}

fn put_quat<B: BufMut>(buf: &mut B, q: &Quat) {
    buf.put_f32_le(q.x);
    buf.put_f32_le(q.y);
    buf.put_f32_le(q.z);
    buf.put_f32_le(q.w);
}

fn put_transform<B: BufMut>(buf: &mut B, t: &Transform) {
    put_vec3(buf, &t.position);
    put_quat(buf, &t.rotation);
}

// Callers check the total length first, so the getters below cannot run short.

fn get_vec3(buf: &mut &[u8]) -> Vec3 {
    Vec3::new(buf.get_f32_le(), buf.get_f32_le(), buf.get_f32_le())
}

fn get_quat(buf: &mut &[u8]) -> Quat {
    Quat::new(
        buf.get_f32_le(),
        buf.get_f32_le(),
        buf.get_f32_le(),
        buf.get_f32_le(),
    )
}

fn get_transform(buf: &mut &[u8], field: &'static str) -> HandsyncResult<Transform> {
    let position = get_vec3(buf);
    let rotation = get_quat(buf);
    let transform = Transform::new(position, rotation);
    if !transform.is_finite() {
        return Err(HandsyncError::NonFiniteTransform(field));
    }
    Ok(transform)
}

fn get_pose(buf: &mut &[u8]) -> HandsyncResult<HandPose> {
    let index = buf.get_i32_le();
    HandPose::from_index(index).ok_or(HandsyncError::InvalidPoseIndex(index))
}
