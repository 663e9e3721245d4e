use crate::error::{Result, StreamError};
use crate::traits::{HostStream, StreamMode, StreamReader, StreamWriter};
use crate::value::Value;

/// In-memory host stream.
///
/// Mirrors how the host transport hands one stream object to every observed
/// component of a network object: the owner writes on its pass, the transport
/// ships the values, and each remote replica reads them back in order.
#[derive(Debug, Clone)]
pub struct ValueStream {
    mode: StreamMode,
    values: Vec<Value>,
    pos: usize,
}

impl ValueStream {
    /// Create an empty stream for a write pass.
    pub fn writer() -> Self {
        Self {
            mode: StreamMode::Writing,
            values: Vec::new(),
            pos: 0,
        }
    }

    /// Create a stream for a read pass over received values.
    pub fn reader(values: impl Into<Vec<Value>>) -> Self {
        Self {
            mode: StreamMode::Reading,
            values: values.into(),
            pos: 0,
        }
    }

    /// Turn a completed write pass into a read pass over the same values.
    pub fn into_reader(self) -> Self {
        Self::reader(self.values)
    }

    /// All values held by the stream, including consumed ones.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Values not yet consumed by a read pass.
    pub fn remaining(&self) -> &[Value] {
        match self.mode {
            StreamMode::Reading => &self.values[self.pos..],
            StreamMode::Writing => &[],
        }
    }

    /// Number of values held by the stream.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the stream holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the stream and return its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl StreamReader for ValueStream {
    fn peek_next(&self) -> Option<&Value> {
        match self.mode {
            StreamMode::Reading => self.values.get(self.pos),
            StreamMode::Writing => None,
        }
    }

    fn read_next(&mut self) -> Result<Value> {
        if self.mode != StreamMode::Reading {
            return Err(StreamError::WrongMode(self.mode));
        }
        let value = self
            .values
            .get(self.pos)
            .cloned()
            .ok_or(StreamError::EndOfStream)?;
        self.pos += 1;
        Ok(value)
    }

    fn position(&self) -> usize {
        self.pos
    }
}

impl StreamWriter for ValueStream {
    fn write_next(&mut self, value: Value) -> Result<()> {
        if self.mode != StreamMode::Writing {
            return Err(StreamError::WrongMode(self.mode));
        }
        self.values.push(value);
        Ok(())
    }
}

impl HostStream for ValueStream {
    fn mode(&self) -> StreamMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Quaternion, ValueKind, Vector3};

    #[test]
    fn write_then_read_in_order() {
        let mut stream = ValueStream::writer();
        stream.write_next(Value::Int(3)).unwrap();
        stream.write_next(Value::Bool(true)).unwrap();
        stream
            .write_next(Value::Vector3(Vector3::new(1.0, 2.0, 3.0)))
            .unwrap();

        let mut stream = stream.into_reader();
        assert_eq!(stream.read_i32().unwrap(), 3);
        assert!(stream.read_bool().unwrap());
        assert_eq!(stream.read_vector3().unwrap(), Vector3::new(1.0, 2.0, 3.0));
        assert!(matches!(stream.read_next(), Err(StreamError::EndOfStream)));
    }

    #[test]
    fn peek_does_not_advance() {
        let stream = ValueStream::reader(vec![Value::Long(42), Value::Int(1)]);
        assert_eq!(stream.peek_next(), Some(&Value::Long(42)));
        assert_eq!(stream.peek_next(), Some(&Value::Long(42)));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn typed_read_reports_mismatch() {
        let mut stream = ValueStream::reader(vec![Value::Bool(false)]);
        let err = stream.read_quaternion().unwrap_err();
        assert!(matches!(
            err,
            StreamError::TypeMismatch {
                expected: ValueKind::Quaternion,
                found: ValueKind::Bool
            }
        ));
    }

    #[test]
    fn mode_is_enforced() {
        let mut writer = ValueStream::writer();
        assert!(writer.is_writing());
        assert!(writer.peek_next().is_none());
        assert!(matches!(
            writer.read_next(),
            Err(StreamError::WrongMode(StreamMode::Writing))
        ));

        let mut reader = ValueStream::reader(Vec::new());
        assert!(!reader.is_writing());
        assert!(matches!(
            reader.write_next(Value::Int(1)),
            Err(StreamError::WrongMode(StreamMode::Reading))
        ));
    }

    #[test]
    fn remaining_tracks_position() {
        let mut stream = ValueStream::reader(vec![
            Value::Int(1),
            Value::Quaternion(Quaternion::IDENTITY),
        ]);
        stream.read_next().unwrap();
        assert_eq!(stream.remaining(), &[Value::Quaternion(Quaternion::IDENTITY)]);
        assert_eq!(stream.len(), 2);
        assert!(!stream.is_empty());
    }
}
