use std::fmt;

use bytes::Bytes;
use serde::Serialize;

/// A three-component vector (positions in tracking space).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// A rotation quaternion in `(x, y, z, w)` component order.
///
/// The zero quaternion is the `Default` so that freshly created frames are
/// zero-initialized, matching what a peer sees before the first update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

/// One sequential entry of a host serialization stream.
///
/// The host transport serializes heterogeneous values one after another; the
/// frame protocol only produces the integer, boolean, vector and quaternion
/// kinds, but a stream may carry anything the game itself writes ahead of it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Byte(u8),
    Int(i32),
    Long(i64),
    Float(f32),
    Vector3(Vector3),
    Quaternion(Quaternion),
    String(String),
    Bytes(Bytes),
}

impl Value {
    /// The kind tag for this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Byte(_) => ValueKind::Byte,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Vector3(_) => ValueKind::Vector3,
            Value::Quaternion(_) => ValueKind::Quaternion,
            Value::String(_) => ValueKind::String,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }
}

/// Discriminant of a [`Value`], used in error reporting and the binary codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Byte,
    Int,
    Long,
    Float,
    Vector3,
    Quaternion,
    String,
    Bytes,
}

impl ValueKind {
    /// Human-readable name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Byte => "byte",
            ValueKind::Int => "int32",
            ValueKind::Long => "int64",
            ValueKind::Float => "float32",
            ValueKind::Vector3 => "vector3",
            ValueKind::Quaternion => "quaternion",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Byte(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<Vector3> for Value {
    fn from(value: Vector3) -> Self {
        Value::Vector3(value)
    }
}

impl From<Quaternion> for Value {
    fn from(value: Quaternion) -> Self {
        Value::Quaternion(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Bytes> for Value {
    fn from(value: Bytes) -> Self {
        Value::Bytes(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(Value::from(true).kind(), ValueKind::Bool);
        assert_eq!(Value::from(7i32).kind(), ValueKind::Int);
        assert_eq!(Value::from(7i64).kind(), ValueKind::Long);
        assert_eq!(Value::from(Vector3::ZERO).kind(), ValueKind::Vector3);
        assert_eq!(
            Value::from(Quaternion::IDENTITY).kind(),
            ValueKind::Quaternion
        );
        assert_eq!(Value::from("hello").kind(), ValueKind::String);
    }

    #[test]
    fn defaults_are_zeroed() {
        assert_eq!(Vector3::default(), Vector3::ZERO);
        assert_eq!(Quaternion::default(), Quaternion::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(ValueKind::Long.to_string(), "int64");
        assert_eq!(ValueKind::Quaternion.to_string(), "quaternion");
    }
}
