//! Tagged frame protocol riding on the tail of a host serialization stream.
//!
//! vrlink lets VR-enabled clients of a multiplayer game exchange extra state
//! (hand poses, headlamp, map tool, handedness) over the per-object stream the
//! game already replicates, without breaking clients that never read it.
//!
//! # Crate Structure
//!
//! - [`stream`]: host stream abstraction, in-memory stream, capture codec
//! - [`frame`]: frame types, registry and the magic-gated envelope
//! - [`peer`]: session, outbound queue and peer directory (behind `peer` feature)

/// Re-export stream types.
pub mod stream {
    pub use vrlink_stream::*;
}

/// Re-export frame types.
pub mod frame {
    pub use vrlink_frame::*;
}

/// Re-export session types (requires `peer` feature).
#[cfg(feature = "peer")]
pub mod peer {
    pub use vrlink_peer::*;
}
