//! Frame type tags.
//!
//! Tags are part of the wire format. New types are appended with the next
//! free tag; existing tags are never renumbered.

use std::fmt;

use crate::error::FrameError;

/// Marker frame: the sender is a VR peer.
pub const ANNOUNCEMENT: i32 = 1;

/// Hand positions and rotations.
pub const RIG: i32 = 2;

/// Map tool flashlight and handedness state.
pub const MAP_TOOL: i32 = 3;

/// Headlamp toggle.
pub const HEADLAMP: i32 = 4;

/// Dominant hand preference.
pub const DOMINANT_HAND: i32 = 5;

/// The closed set of frame types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum FrameType {
    Announcement = ANNOUNCEMENT,
    Rig = RIG,
    MapTool = MAP_TOOL,
    Headlamp = HEADLAMP,
    DominantHand = DOMINANT_HAND,
}

impl FrameType {
    /// Every frame type in tag order.
    pub const ALL: [FrameType; 5] = [
        FrameType::Announcement,
        FrameType::Rig,
        FrameType::MapTool,
        FrameType::Headlamp,
        FrameType::DominantHand,
    ];

    /// The wire tag for this type.
    pub const fn tag(self) -> i32 {
        self as i32
    }

    /// Resolve a wire tag.
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            ANNOUNCEMENT => Some(FrameType::Announcement),
            RIG => Some(FrameType::Rig),
            MAP_TOOL => Some(FrameType::MapTool),
            HEADLAMP => Some(FrameType::Headlamp),
            DOMINANT_HAND => Some(FrameType::DominantHand),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            FrameType::Announcement => "ANNOUNCEMENT",
            FrameType::Rig => "RIG",
            FrameType::MapTool => "MAP_TOOL",
            FrameType::Headlamp => "HEADLAMP",
            FrameType::DominantHand => "DOMINANT_HAND",
        }
    }
}

impl TryFrom<i32> for FrameType {
    type Error = FrameError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        FrameType::from_tag(tag).ok_or(FrameError::UnknownFrameType(tag))
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.tag())
    }
}
