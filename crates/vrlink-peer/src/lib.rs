//! Session-level state for the vrlink frame protocol.
//!
//! A [`Session`] is the one object the host's serialize callback talks to.
//! It owns the outbound queue (coalesced, drained once per write pass), the
//! directory of announced VR peers, and the dispatcher that applies decoded
//! frames to that directory. Nothing reachable from the serialize callback
//! returns an error to the host.

pub mod config;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod queue;
pub mod session;

pub use config::SessionConfig;
pub use directory::{PeerDirectory, PeerId, PeerState};
pub use dispatch::{dispatch, DispatchOutcome, FrameObserver, NoopObserver};
pub use error::{HandlerError, PeerError, Result};
pub use queue::OutboundQueue;
pub use session::{ReadOutcome, ReadReport, Session, TickReport};
