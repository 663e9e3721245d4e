use serde::Serialize;
use vrlink_stream::{Quaternion, StreamReader, StreamWriter, Value, Vector3};

use crate::frame_type::FrameType;

/// Tracked hand pose of a VR peer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RigPose {
    pub left_position: Vector3,
    pub right_position: Vector3,
    pub left_rotation: Quaternion,
    pub right_rotation: Quaternion,
}

/// Map tool presentation state of a VR peer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MapToolState {
    pub hide_flashlight: bool,
    pub left_handed: bool,
}

/// One typed protocol message.
///
/// The variant is the frame type; [`Frame::frame_type`] is an exhaustive
/// match, so every constructible frame has exactly one tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Announcement,
    Rig(RigPose),
    MapTool(MapToolState),
    Headlamp { enabled: bool },
    DominantHand { left_handed: bool },
}

impl Frame {
    /// The type (and therefore wire tag) of this frame.
    pub fn frame_type(&self) -> FrameType {
        match self {
            Frame::Announcement => FrameType::Announcement,
            Frame::Rig(_) => FrameType::Rig,
            Frame::MapTool(_) => FrameType::MapTool,
            Frame::Headlamp { .. } => FrameType::Headlamp,
            Frame::DominantHand { .. } => FrameType::DominantHand,
        }
    }

    /// The wire tag of this frame.
    pub fn tag(&self) -> i32 {
        self.frame_type().tag()
    }

    /// Write the variant's fields in wire order.
    pub fn write_fields<W>(&self, stream: &mut W) -> vrlink_stream::Result<()>
    where
        W: StreamWriter + ?Sized,
    {
        match self {
            Frame::Announcement => Ok(()),
            Frame::Rig(pose) => {
                stream.write_next(Value::Vector3(pose.left_position))?;
                stream.write_next(Value::Quaternion(pose.left_rotation))?;
                stream.write_next(Value::Vector3(pose.right_position))?;
                stream.write_next(Value::Quaternion(pose.right_rotation))
            }
            Frame::MapTool(state) => {
                stream.write_next(Value::Bool(state.hide_flashlight))?;
                stream.write_next(Value::Bool(state.left_handed))
            }
            Frame::Headlamp { enabled } => stream.write_next(Value::Bool(*enabled)),
            Frame::DominantHand { left_handed } => stream.write_next(Value::Bool(*left_handed)),
        }
    }

    /// Overwrite the variant's fields from the stream, in wire order.
    pub fn read_fields<R>(&mut self, stream: &mut R) -> vrlink_stream::Result<()>
    where
        R: StreamReader + ?Sized,
    {
        match self {
            Frame::Announcement => {}
            Frame::Rig(pose) => {
                pose.left_position = stream.read_vector3()?;
                pose.left_rotation = stream.read_quaternion()?;
                pose.right_position = stream.read_vector3()?;
                pose.right_rotation = stream.read_quaternion()?;
            }
            Frame::MapTool(state) => {
                state.hide_flashlight = stream.read_bool()?;
                state.left_handed = stream.read_bool()?;
            }
            Frame::Headlamp { enabled } => *enabled = stream.read_bool()?,
            Frame::DominantHand { left_handed } => *left_handed = stream.read_bool()?,
        }
        Ok(())
    }
}
