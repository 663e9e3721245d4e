use vrlink_frame::{Frame, FrameType, DEFAULT_MAX_FRAMES};

/// Outbound frames waiting for the next write pass.
///
/// Broadcast to every peer, so there is one queue per session. With
/// coalescing, at most one frame per [`FrameType`] is pending and a newer
/// frame replaces the pending one in place, keeping its position.
///
/// The queue never holds more than `limit` frames, the largest envelope a
/// peer accepts. A non-coalesced frame that would exceed it replaces the
/// pending frame of its type instead, or is dropped if there is none.
#[derive(Debug, Clone)]
pub struct OutboundQueue {
    pending: Vec<Frame>,
    limit: usize,
}

impl Default for OutboundQueue {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_FRAMES)
    }
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue holding at most `limit` frames.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            pending: Vec::new(),
            limit,
        }
    }

    /// Largest number of pending frames.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Queue a frame, replacing a pending frame of the same type.
    ///
    /// Returns true if a pending frame was replaced.
    pub fn enqueue(&mut self, frame: Frame) -> bool {
        self.enqueue_with(frame, true)
    }

    /// Queue a frame, optionally appending even if its type is pending.
    ///
    /// Returns true if a pending frame was replaced.
    pub fn enqueue_with(&mut self, frame: Frame, coalesce: bool) -> bool {
        let full = self.pending.len() >= self.limit;
        if coalesce || full {
            let frame_type = frame.frame_type();
            if let Some(slot) = self
                .pending
                .iter_mut()
                .rev()
                .find(|pending| pending.frame_type() == frame_type)
            {
                *slot = frame;
                return true;
            }
        }
        if full {
            tracing::warn!(frame = %frame.frame_type(), limit = self.limit, "outbound queue full, dropping frame");
            return false;
        }
        self.pending.push(frame);
        false
    }

    /// Take every pending frame in order, leaving the queue empty.
    pub fn drain_all(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.pending)
    }

    /// Pending frames in send order.
    pub fn pending(&self) -> &[Frame] {
        &self.pending
    }

    /// Returns true if a frame of this type is pending.
    pub fn contains(&self, frame_type: FrameType) -> bool {
        self.pending.iter().any(|f| f.frame_type() == frame_type)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending frame.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
