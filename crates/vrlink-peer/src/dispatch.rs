use vrlink_frame::{Frame, FrameType};

use crate::directory::{PeerDirectory, PeerId, PeerState};
use crate::error::{HandlerError, PeerError, Result};

/// Host-side reaction to peer state changes.
///
/// Implemented by whatever drives remote VR avatars (rig targets, headlamp
/// meshes). Every method defaults to doing nothing.
pub trait FrameObserver {
    /// A peer announced itself for the first time.
    fn peer_announced(&mut self, _peer: PeerId) -> std::result::Result<(), HandlerError> {
        Ok(())
    }

    /// A frame was applied to an announced peer's state.
    fn frame_applied(
        &mut self,
        _peer: PeerId,
        _frame: &Frame,
        _state: &PeerState,
    ) -> std::result::Result<(), HandlerError> {
        Ok(())
    }

    /// A peer left or the scene was reset.
    fn peer_removed(&mut self, _peer: PeerId) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FrameObserver for NoopObserver {}

/// What dispatching one frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A new directory entry was created.
    Announced,
    /// The peer was already announced; nothing changed.
    AlreadyAnnounced,
    /// The frame overwrote part of the peer's state.
    Applied(FrameType),
    /// The peer has not announced yet; the frame was dropped.
    Dropped(FrameType),
}

/// Apply one decoded frame from `peer` to the directory.
///
/// State updates are last-write-wins. Frames other than an announcement are
/// dropped until the peer has announced. An observer failure is returned
/// after the state change has been applied.
pub fn dispatch<O>(
    directory: &mut PeerDirectory,
    observer: &mut O,
    peer: PeerId,
    frame: &Frame,
) -> Result<DispatchOutcome>
where
    O: FrameObserver + ?Sized,
{
    let frame_type = frame.frame_type();

    if let Frame::Announcement = frame {
        if !directory.announce(peer) {
            return Ok(DispatchOutcome::AlreadyAnnounced);
        }
        tracing::debug!(%peer, "vr peer announced");
        observer
            .peer_announced(peer)
            .map_err(|source| PeerError::Handler { frame_type, source })?;
        return Ok(DispatchOutcome::Announced);
    }

    let Some(state) = directory.get_mut(peer) else {
        tracing::trace!(%peer, frame = %frame_type, "dropping frame from unannounced peer");
        return Ok(DispatchOutcome::Dropped(frame_type));
    };

    apply(state, frame);

    observer
        .frame_applied(peer, frame, state)
        .map_err(|source| PeerError::Handler { frame_type, source })?;
    Ok(DispatchOutcome::Applied(frame_type))
}

fn apply(state: &mut PeerState, frame: &Frame) {
    match frame {
        // Handled by `dispatch` before a state lookup.
        Frame::Announcement => {}
        Frame::Rig(pose) => state.rig = *pose,
        Frame::MapTool(map_tool) => state.map_tool = *map_tool,
        Frame::Headlamp { enabled } => state.headlamp_enabled = *enabled,
        Frame::DominantHand { left_handed } => state.left_handed = *left_handed,
    }
}
