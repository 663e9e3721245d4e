//! Tagged frames and the magic-gated envelope that carries them.
//!
//! Frames ride on the tail of a foreign host stream. Every envelope is:
//! - An int64 magic sentinel (`0x5245504F5852`) for presence detection
//! - An int32 protocol version
//! - An int32 frame count
//! - `count` frames, each an int32 tag followed by the tag's fixed fields
//!
//! A stream that does not start with the magic is left untouched, so peers
//! that never write an envelope keep working.

pub mod envelope;
pub mod error;
pub mod frame;
pub mod frame_type;
pub mod registry;

pub use envelope::{
    decode_envelope, encode_envelope, open_envelope, peek_magic, Decoded, Envelope,
    EnvelopeConfig, FrameIter, SkipReason, DEFAULT_MAX_FRAMES, MAGIC, PROTOCOL_VERSION,
};
pub use error::{FrameError, Result};
pub use frame::{Frame, MapToolState, RigPose};
pub use frame_type::FrameType;
pub use registry::{FrameEntry, ENTRIES};
