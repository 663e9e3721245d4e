//! Static frame registry.
//!
//! One entry per frame type, in tag order. Decoding resolves a tag to its
//! entry, builds a zero-initialized frame and lets the frame read its own
//! fields.

use vrlink_stream::ValueKind;

use crate::error::{FrameError, Result};
use crate::frame::{Frame, MapToolState, RigPose};
use crate::frame_type::FrameType;

/// Registration of one frame type.
#[derive(Debug)]
pub struct FrameEntry {
    /// The frame type this entry constructs.
    pub frame_type: FrameType,
    /// Value kinds of the payload, in wire order.
    pub shape: &'static [ValueKind],
    /// Build a zero-initialized frame of this type.
    pub create: fn() -> Frame,
}

/// Every registered frame type, in tag order.
pub static ENTRIES: [FrameEntry; 5] = [
    FrameEntry {
        frame_type: FrameType::Announcement,
        shape: &[],
        create: zero_announcement,
    },
    FrameEntry {
        frame_type: FrameType::Rig,
        shape: &[
            ValueKind::Vector3,
            ValueKind::Quaternion,
            ValueKind::Vector3,
            ValueKind::Quaternion,
        ],
        create: zero_rig,
    },
    FrameEntry {
        frame_type: FrameType::MapTool,
        shape: &[ValueKind::Bool, ValueKind::Bool],
        create: zero_map_tool,
    },
    FrameEntry {
        frame_type: FrameType::Headlamp,
        shape: &[ValueKind::Bool],
        create: zero_headlamp,
    },
    FrameEntry {
        frame_type: FrameType::DominantHand,
        shape: &[ValueKind::Bool],
        create: zero_dominant_hand,
    },
];

/// Look up the registration for a wire tag.
pub fn entry(tag: i32) -> Result<&'static FrameEntry> {
    ENTRIES
        .iter()
        .find(|entry| entry.frame_type.tag() == tag)
        .ok_or(FrameError::UnknownFrameType(tag))
}

/// Create a zero-initialized frame for a wire tag.
pub fn create(tag: i32) -> Result<Frame> {
    entry(tag).map(|entry| (entry.create)())
}

/// The wire tag of a frame.
pub fn tag_of(frame: &Frame) -> i32 {
    frame.frame_type().tag()
}

fn zero_announcement() -> Frame {
    Frame::Announcement
}

fn zero_rig() -> Frame {
    Frame::Rig(RigPose::default())
}

fn zero_map_tool() -> Frame {
    Frame::MapTool(MapToolState::default())
}

fn zero_headlamp() -> Frame {
    Frame::Headlamp { enabled: false }
}

fn zero_dominant_hand() -> Frame {
    Frame::DominantHand { left_handed: false }
}
