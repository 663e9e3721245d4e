//! Host serialization stream abstraction.
//!
//! The frame protocol never owns its transport. It rides on the tail of a
//! per-object value stream that the multiplayer host drives once per network
//! tick. This crate models that stream:
//! - [`Value`] is one sequential entry (`write_next` / `read_next`)
//! - [`StreamReader`], [`StreamWriter`] and [`HostStream`] are the capabilities
//!   the protocol consumes
//! - [`ValueStream`] is an in-memory implementation used by tests and tooling
//! - [`wire`] is a compact binary encoding for captured value streams
//!
//! This is the lowest layer of vrlink. Everything else builds on top of the
//! traits defined here.

pub mod error;
pub mod memory;
pub mod traits;
pub mod value;
pub mod wire;

pub use error::{Result, StreamError};
pub use memory::ValueStream;
pub use traits::{HostStream, StreamMode, StreamReader, StreamWriter};
pub use value::{Quaternion, Value, ValueKind, Vector3};
