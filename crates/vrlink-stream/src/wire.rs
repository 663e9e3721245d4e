//! Binary encoding for captured value streams.
//!
//! Each value is written as a one-byte type code followed by a little-endian
//! body:
//!
//! ```text
//! ┌───────────┬──────────────────────────────────────────────┐
//! │ Code (1B) │ Body                                         │
//! ├───────────┼──────────────────────────────────────────────┤
//! │ 0x01 bool │ 1B (0 or 1)                                  │
//! │ 0x02 byte │ 1B                                           │
//! │ 0x03 i32  │ 4B LE                                        │
//! │ 0x04 i64  │ 8B LE                                        │
//! │ 0x05 f32  │ 4B LE                                        │
//! │ 0x06 vec3 │ 3 x f32 LE (x, y, z)                         │
//! │ 0x07 quat │ 4 x f32 LE (x, y, z, w)                      │
//! │ 0x08 str  │ u32 LE length + UTF-8 bytes                  │
//! │ 0x09 blob │ u32 LE length + raw bytes                    │
//! └───────────┴──────────────────────────────────────────────┘
//! ```

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, StreamError};
use crate::value::{Quaternion, Value, ValueKind, Vector3};

const LEN_PREFIX: usize = 4;

impl ValueKind {
    /// Binary type code for this kind.
    pub fn type_code(self) -> u8 {
        match self {
            ValueKind::Bool => 0x01,
            ValueKind::Byte => 0x02,
            ValueKind::Int => 0x03,
            ValueKind::Long => 0x04,
            ValueKind::Float => 0x05,
            ValueKind::Vector3 => 0x06,
            ValueKind::Quaternion => 0x07,
            ValueKind::String => 0x08,
            ValueKind::Bytes => 0x09,
        }
    }

    /// Resolve a binary type code.
    pub fn from_type_code(code: u8) -> Result<Self> {
        match code {
            0x01 => Ok(ValueKind::Bool),
            0x02 => Ok(ValueKind::Byte),
            0x03 => Ok(ValueKind::Int),
            0x04 => Ok(ValueKind::Long),
            0x05 => Ok(ValueKind::Float),
            0x06 => Ok(ValueKind::Vector3),
            0x07 => Ok(ValueKind::Quaternion),
            0x08 => Ok(ValueKind::String),
            0x09 => Ok(ValueKind::Bytes),
            other => Err(StreamError::UnknownTypeCode(other)),
        }
    }

    /// Body size for fixed-width kinds, `None` for length-prefixed kinds.
    fn fixed_size(self) -> Option<usize> {
        match self {
            ValueKind::Bool | ValueKind::Byte => Some(1),
            ValueKind::Int | ValueKind::Float => Some(4),
            ValueKind::Long => Some(8),
            ValueKind::Vector3 => Some(12),
            ValueKind::Quaternion => Some(16),
            ValueKind::String | ValueKind::Bytes => None,
        }
    }
}

/// Encode a single value.
pub fn encode_value(value: &Value, dst: &mut BytesMut) {
    dst.put_u8(value.kind().type_code());
    match value {
        Value::Bool(v) => dst.put_u8(u8::from(*v)),
        Value::Byte(v) => dst.put_u8(*v),
        Value::Int(v) => dst.put_i32_le(*v),
        Value::Long(v) => dst.put_i64_le(*v),
        Value::Float(v) => dst.put_f32_le(*v),
        Value::Vector3(v) => {
            dst.put_f32_le(v.x);
            dst.put_f32_le(v.y);
            dst.put_f32_le(v.z);
        }
        Value::Quaternion(q) => {
            dst.put_f32_le(q.x);
            dst.put_f32_le(q.y);
            dst.put_f32_le(q.z);
            dst.put_f32_le(q.w);
        }
        Value::String(s) => {
            dst.put_u32_le(s.len() as u32);
            dst.put_slice(s.as_bytes());
        }
        Value::Bytes(b) => {
            dst.put_u32_le(b.len() as u32);
            dst.put_slice(b);
        }
    }
}

/// Encode a sequence of values.
pub fn encode_values(values: &[Value], dst: &mut BytesMut) {
    for value in values {
        encode_value(value, dst);
    }
}

/// Decode one value from the front of the buffer.
///
/// Returns `Ok(None)` when the buffer is empty. A value cut short by the end
/// of the buffer is an error; captured streams are always complete.
pub fn decode_value(src: &mut BytesMut) -> Result<Option<Value>> {
    if src.is_empty() {
        return Ok(None);
    }

    let kind = ValueKind::from_type_code(src[0])?;
    let body_len = match kind.fixed_size() {
        Some(size) => size,
        None => {
            ensure_available(src, 1 + LEN_PREFIX)?;
            let len = u32::from_le_bytes([src[1], src[2], src[3], src[4]]) as usize;
            LEN_PREFIX + len
        }
    };
    ensure_available(src, 1 + body_len)?;

    src.advance(1);
    let value = match kind {
        ValueKind::Bool => Value::Bool(src.get_u8() != 0),
        ValueKind::Byte => Value::Byte(src.get_u8()),
        ValueKind::Int => Value::Int(src.get_i32_le()),
        ValueKind::Long => Value::Long(src.get_i64_le()),
        ValueKind::Float => Value::Float(src.get_f32_le()),
        ValueKind::Vector3 => Value::Vector3(Vector3::new(
            src.get_f32_le(),
            src.get_f32_le(),
            src.get_f32_le(),
        )),
        ValueKind::Quaternion => Value::Quaternion(Quaternion::new(
            src.get_f32_le(),
            src.get_f32_le(),
            src.get_f32_le(),
            src.get_f32_le(),
        )),
        ValueKind::String => {
            let len = src.get_u32_le() as usize;
            let raw = src.split_to(len).to_vec();
            Value::String(String::from_utf8(raw)?)
        }
        ValueKind::Bytes => {
            let len = src.get_u32_le() as usize;
            Value::Bytes(src.split_to(len).freeze())
        }
    };

    Ok(Some(value))
}

/// Decode every value in the buffer.
pub fn decode_values(src: &mut BytesMut) -> Result<Vec<Value>> {
    let mut values = Vec::new();
    while let Some(value) = decode_value(src)? {
        values.push(value);
    }
    tracing::trace!(count = values.len(), "decoded captured value stream");
    Ok(values)
}

fn ensure_available(src: &BytesMut, needed: usize) -> Result<()> {
    if src.len() < needed {
        return Err(StreamError::Truncated {
            needed,
            available: src.len(),
        });
    }
    Ok(())
}
