use crate::value::ValueKind;

/// Errors that can occur while reading from or writing to a host stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The stream has no more values to read.
    #[error("end of stream")]
    EndOfStream,

    /// The next value does not have the expected type.
    #[error("type mismatch (expected {expected}, found {found})")]
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    /// A write was attempted on a stream in read mode, or the reverse.
    #[error("stream is in {0} mode")]
    WrongMode(crate::traits::StreamMode),

    /// The binary encoding contains an unknown type code.
    #[error("unknown value type code 0x{0:02X}")]
    UnknownTypeCode(u8),

    /// The binary encoding ended in the middle of a value.
    #[error("truncated value (need {needed} bytes, have {available})")]
    Truncated { needed: usize, available: usize },

    /// A string value is not valid UTF-8.
    #[error("invalid UTF-8 in string value")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;
