use vrlink_frame::FrameType;

/// Errors that can occur while processing peer frames.
#[derive(Debug, thiserror::Error)]
pub enum PeerError {
    /// Frame-level error (malformed envelope, unknown frame type).
    #[error("frame error: {0}")]
    Frame(#[from] vrlink_frame::FrameError),

    /// Stream-level error while writing the outbound envelope.
    #[error("stream error: {0}")]
    Stream(#[from] vrlink_stream::StreamError),

    /// A frame observer failed while handling a frame.
    #[error("handler failed for {frame_type}: {source}")]
    Handler {
        frame_type: FrameType,
        #[source]
        source: HandlerError,
    },
}

/// Failure reported by a [`crate::FrameObserver`].
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PeerError>;
