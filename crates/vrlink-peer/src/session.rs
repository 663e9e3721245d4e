use vrlink_frame::{
    encode_envelope, open_envelope, Envelope, Frame, FrameType, MapToolState, RigPose, SkipReason,
};
use vrlink_stream::{HostStream, Quaternion, StreamReader, StreamWriter, Vector3};

use crate::config::SessionConfig;
use crate::directory::{PeerDirectory, PeerId, PeerState};
use crate::dispatch::{dispatch, FrameObserver, NoopObserver};
use crate::error::PeerError;
use crate::queue::OutboundQueue;

/// How a read pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// No envelope was processed.
    Skipped(SkipReason),
    /// Every frame in the envelope was decoded.
    Complete,
    /// Decoding stopped early. Frames dispatched before the fault stay applied.
    Malformed,
}

/// Summary of one read pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadReport {
    pub outcome: ReadOutcome,
    /// Frames decoded and handed to the dispatcher.
    pub dispatched: usize,
    /// Frames whose observer failed.
    pub handler_failures: usize,
}

impl ReadReport {
    fn skipped(reason: SkipReason) -> Self {
        Self {
            outcome: ReadOutcome::Skipped(reason),
            dispatched: 0,
            handler_failures: 0,
        }
    }
}

/// Summary of one serialize callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReport {
    /// Write pass: number of frames written (zero if the write failed).
    Wrote { frames: usize },
    /// Read pass.
    Read(ReadReport),
}

/// Protocol state for one multiplayer session.
///
/// Owned by the component that receives the transport's serialize callback.
/// Lives as long as the multiplayer session. [`Session::on_scene_loaded`]
/// drops per-peer state on level changes; [`Session::reset`] clears
/// everything when returning to the main menu, because actor numbers are not
/// stable across rooms.
pub struct Session<O = NoopObserver> {
    config: SessionConfig,
    outbound: OutboundQueue,
    directory: PeerDirectory,
    observer: O,
}

impl Session<NoopObserver> {
    /// Create a session without a host observer.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_observer(config, NoopObserver)
    }
}

impl Default for Session<NoopObserver> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<O: FrameObserver> Session<O> {
    /// Create a session that notifies `observer` of peer state changes.
    pub fn with_observer(config: SessionConfig, observer: O) -> Self {
        Self {
            outbound: OutboundQueue::with_limit(config.envelope.max_frames),
            config,
            directory: PeerDirectory::new(),
            observer,
        }
    }

    // Sending

    /// Tell every peer that the local player is in VR.
    pub fn announce(&mut self) {
        let coalesce = self.config.coalesce_announcements;
        self.outbound.enqueue_with(Frame::Announcement, coalesce);
    }

    /// Publish the local hand pose.
    pub fn send_rig(
        &mut self,
        left_position: Vector3,
        right_position: Vector3,
        left_rotation: Quaternion,
        right_rotation: Quaternion,
    ) {
        self.outbound.enqueue(Frame::Rig(RigPose {
            left_position,
            right_position,
            left_rotation,
            right_rotation,
        }));
    }

    /// Publish the local map tool state.
    pub fn update_map_tool(&mut self, hide_flashlight: bool, left_handed: bool) {
        self.outbound.enqueue(Frame::MapTool(MapToolState {
            hide_flashlight,
            left_handed,
        }));
    }

    /// Publish the local headlamp state.
    pub fn update_headlamp(&mut self, enabled: bool) {
        self.outbound.enqueue(Frame::Headlamp { enabled });
    }

    /// Publish the local dominant hand.
    pub fn update_dominant_hand(&mut self, left_handed: bool) {
        self.outbound.enqueue(Frame::DominantHand { left_handed });
    }

    /// Queue an arbitrary frame with coalescing.
    pub fn enqueue(&mut self, frame: Frame) {
        self.outbound.enqueue(frame);
    }

    /// Queue an arbitrary frame, optionally without coalescing.
    pub fn enqueue_with(&mut self, frame: Frame, coalesce: bool) {
        self.outbound.enqueue_with(frame, coalesce);
    }

    // Serialization

    /// Transport serialize callback for the object owned by `owner`.
    ///
    /// On a write pass the pending frames are appended to the stream; on a
    /// read pass the envelope written by `owner` (if any) is decoded and
    /// dispatched. Never fails.
    pub fn on_serialize<S>(&mut self, owner: PeerId, stream: &mut S) -> TickReport
    where
        S: HostStream + ?Sized,
    {
        if stream.is_writing() {
            TickReport::Wrote {
                frames: self.write_tail(stream),
            }
        } else {
            TickReport::Read(self.read_tail(owner, stream))
        }
    }

    /// Drain the outbound queue onto the tail of a write pass.
    ///
    /// Returns the number of frames written. On failure the drained frames
    /// are dropped; live values are republished on later ticks.
    pub fn write_tail<W>(&mut self, stream: &mut W) -> usize
    where
        W: StreamWriter + ?Sized,
    {
        let frames = self.outbound.drain_all();
        match encode_envelope(stream, &frames, &self.config.envelope) {
            Ok(()) => {
                tracing::trace!(frames = frames.len(), "wrote envelope");
                frames.len()
            }
            Err(err) => {
                tracing::warn!(error = %err, dropped = frames.len(), "failed to write envelope");
                0
            }
        }
    }

    /// Decode and dispatch the envelope at the stream position, if present.
    ///
    /// Never fails: skipped and malformed envelopes are reported in the
    /// returned [`ReadReport`] and logged.
    pub fn read_tail<R>(&mut self, sender: PeerId, stream: &mut R) -> ReadReport
    where
        R: StreamReader + ?Sized,
    {
        match self.try_read_tail(sender, stream) {
            Ok(report) => report,
            Err((err, mut report)) => {
                tracing::warn!(
                    peer = %sender,
                    error = %err,
                    dispatched = report.dispatched,
                    "abandoning malformed envelope"
                );
                report.outcome = ReadOutcome::Malformed;
                report
            }
        }
    }

    fn try_read_tail<R>(
        &mut self,
        sender: PeerId,
        stream: &mut R,
    ) -> std::result::Result<ReadReport, (PeerError, ReadReport)>
    where
        R: StreamReader + ?Sized,
    {
        let mut report = ReadReport::skipped(SkipReason::NotProtocolData);

        let frames = match open_envelope(stream, &self.config.envelope) {
            Ok(Envelope::Open(frames)) => frames,
            Ok(Envelope::Skipped(reason)) => {
                if let SkipReason::UnsupportedVersion { version } = reason {
                    tracing::debug!(peer = %sender, version, "ignoring envelope with unsupported version");
                }
                return Ok(ReadReport::skipped(reason));
            }
            Err(err) => {
                report.outcome = ReadOutcome::Malformed;
                return Err((err.into(), report));
            }
        };

        report.outcome = ReadOutcome::Complete;
        for frame in frames {
            let frame = match frame {
                Ok(frame) => frame,
                Err(err) => return Err((err.into(), report)),
            };
            report.dispatched += 1;

            if let Err(err) = dispatch(&mut self.directory, &mut self.observer, sender, &frame) {
                report.handler_failures += 1;
                tracing::error!(peer = %sender, error = %err, "error while handling frame");
            }
        }

        Ok(report)
    }

    // Lifecycle

    /// A remote player joined the room. Re-announce so they learn about us.
    pub fn on_peer_joined(&mut self, peer: PeerId) {
        if self.config.local_vr {
            tracing::debug!(%peer, "peer joined, re-announcing");
            self.announce();
        }
    }

    /// A remote player left the room.
    pub fn on_peer_left(&mut self, peer: PeerId) {
        if self.directory.remove(peer).is_some() {
            tracing::debug!(%peer, "vr peer left");
            self.observer.peer_removed(peer);
        }
    }

    /// A new level finished loading.
    ///
    /// Per-peer state is tied to the old scene and is dropped, but peers stay
    /// known as VR players. Their state is rebuilt on their next
    /// announcement; updates before that are dropped.
    pub fn on_scene_loaded(&mut self) {
        for (peer, _) in self.directory.snapshot() {
            self.observer.peer_removed(peer);
        }
        self.directory.clear_states();
        tracing::debug!(known = self.directory.known_len(), "scene loaded, peer state dropped");
    }

    /// Back to the main menu. Forget everything.
    pub fn reset(&mut self) {
        for (peer, _) in self.directory.snapshot() {
            self.observer.peer_removed(peer);
        }
        self.directory.clear();
        self.outbound.clear();
        tracing::debug!("session reset");
    }

    // Queries

    /// Returns true if the peer has announced itself as a VR peer.
    pub fn is_known_peer(&self, peer: PeerId) -> bool {
        self.directory.is_known_peer(peer)
    }

    /// Returns true if the player is in VR: the local player when this
    /// session runs in VR, remote players once they have announced.
    pub fn is_vr_player(&self, peer: PeerId, is_local: bool) -> bool {
        if is_local {
            self.config.local_vr
        } else {
            self.is_known_peer(peer)
        }
    }

    /// Protocol state of an announced peer.
    pub fn peer(&self, peer: PeerId) -> Option<&PeerState> {
        self.directory.get(peer)
    }

    pub fn directory(&self) -> &PeerDirectory {
        &self.directory
    }

    pub fn outbound(&self) -> &OutboundQueue {
        &self.outbound
    }

    /// Frame types currently waiting for the next write pass.
    pub fn pending_types(&self) -> Vec<FrameType> {
        self.outbound.pending().iter().map(Frame::frame_type).collect()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

impl<O> std::fmt::Debug for Session<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("outbound", &self.outbound)
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}
