use std::fmt;

use crate::error::{Result, StreamError};
use crate::value::{Quaternion, Value, ValueKind, Vector3};

/// Direction of a serialization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamMode {
    /// The local owner is serializing its state for remote peers.
    Writing,
    /// A remote owner's state is being deserialized locally.
    Reading,
}

impl fmt::Display for StreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamMode::Writing => f.write_str("writing"),
            StreamMode::Reading => f.write_str("reading"),
        }
    }
}

/// Sequential read access to a host serialization stream.
///
/// `peek_next` must never advance the stream. Every other protocol guarantee
/// (non-participating peers are unaffected) depends on that.
pub trait StreamReader {
    /// Look at the next value without consuming it.
    fn peek_next(&self) -> Option<&Value>;

    /// Consume and return the next value.
    fn read_next(&mut self) -> Result<Value>;

    /// Number of values consumed so far.
    fn position(&self) -> usize;

    /// Consume the next value as a boolean.
    fn read_bool(&mut self) -> Result<bool> {
        match self.read_next()? {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch(ValueKind::Bool, &other)),
        }
    }

    /// Consume the next value as a 32-bit integer.
    fn read_i32(&mut self) -> Result<i32> {
        match self.read_next()? {
            Value::Int(v) => Ok(v),
            other => Err(mismatch(ValueKind::Int, &other)),
        }
    }

    /// Consume the next value as a 64-bit integer.
    fn read_i64(&mut self) -> Result<i64> {
        match self.read_next()? {
            Value::Long(v) => Ok(v),
            other => Err(mismatch(ValueKind::Long, &other)),
        }
    }

    /// Consume the next value as a vector.
    fn read_vector3(&mut self) -> Result<Vector3> {
        match self.read_next()? {
            Value::Vector3(v) => Ok(v),
            other => Err(mismatch(ValueKind::Vector3, &other)),
        }
    }

    /// Consume the next value as a quaternion.
    fn read_quaternion(&mut self) -> Result<Quaternion> {
        match self.read_next()? {
            Value::Quaternion(v) => Ok(v),
            other => Err(mismatch(ValueKind::Quaternion, &other)),
        }
    }
}

/// Sequential write access to a host serialization stream.
pub trait StreamWriter {
    /// Append a value to the stream.
    fn write_next(&mut self, value: Value) -> Result<()>;
}

/// The per-object stream handed to the serialize callback.
///
/// One pass is either a write pass or a read pass, never both.
pub trait HostStream: StreamReader + StreamWriter {
    /// Direction of the current pass.
    fn mode(&self) -> StreamMode;

    /// Returns true on the owner's write pass.
    fn is_writing(&self) -> bool {
        self.mode() == StreamMode::Writing
    }
}

fn mismatch(expected: ValueKind, found: &Value) -> StreamError {
    StreamError::TypeMismatch {
        expected,
        found: found.kind(),
    }
}
