use vrlink_stream::StreamError;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The tag does not belong to the closed set of frame types.
    #[error("unknown frame type {0}")]
    UnknownFrameType(i32),

    /// The envelope frame count is negative or exceeds the configured limit.
    #[error("invalid frame count {count} (max {max})")]
    InvalidFrameCount { count: i64, max: usize },

    /// The underlying host stream failed or held an unexpected value.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
