use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use vrlink_frame::{MapToolState, RigPose};

/// Transport-owned actor number identifying a remote participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PeerId(pub i32);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor-{}", self.0)
    }
}

impl From<i32> for PeerId {
    fn from(actor: i32) -> Self {
        Self(actor)
    }
}

/// Last known protocol state of an announced VR peer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeerState {
    pub announced: bool,
    pub rig: RigPose,
    pub map_tool: MapToolState,
    pub headlamp_enabled: bool,
    pub left_handed: bool,
}

/// Announced VR peers.
///
/// Per-peer state belongs to the current scene. The id set of announced
/// peers outlives it: a scene load drops every state entry but keeps the
/// ids, so a peer stays known until it leaves or the session is reset. A
/// known peer without state gets its entry back on its next announcement.
/// Only the dispatcher and the session lifecycle hooks mutate the directory.
#[derive(Debug, Default)]
pub struct PeerDirectory {
    peers: HashMap<PeerId, PeerState>,
    known: HashSet<PeerId>,
}

impl PeerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the peer has announced itself as a VR peer.
    pub fn is_known_peer(&self, peer: PeerId) -> bool {
        self.known.contains(&peer)
    }

    /// State of an announced peer in the current scene.
    pub fn get(&self, peer: PeerId) -> Option<&PeerState> {
        self.peers.get(&peer)
    }

    /// Number of peers known as VR players, with or without state.
    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    /// Number of announced peers with state in the current scene.
    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Announced peers ordered by id.
    pub fn snapshot(&self) -> Vec<(PeerId, PeerState)> {
        let mut peers: Vec<(PeerId, PeerState)> = self
            .peers
            .iter()
            .map(|(id, state)| (*id, state.clone()))
            .collect();
        peers.sort_unstable_by_key(|(id, _)| *id);
        peers
    }

    /// Create an entry for a newly announced peer.
    ///
    /// Returns false (leaving existing state intact) if already announced.
    pub(crate) fn announce(&mut self, peer: PeerId) -> bool {
        if self.peers.contains_key(&peer) {
            return false;
        }
        self.peers.insert(
            peer,
            PeerState {
                announced: true,
                ..PeerState::default()
            },
        );
        self.known.insert(peer);
        true
    }

    pub(crate) fn get_mut(&mut self, peer: PeerId) -> Option<&mut PeerState> {
        self.peers.get_mut(&peer)
    }

    /// Forget a peer. Returns its last state if it was announced.
    pub(crate) fn remove(&mut self, peer: PeerId) -> Option<PeerState> {
        self.known.remove(&peer);
        self.peers.remove(&peer)
    }

    /// Drop every state entry, keeping the set of known peers.
    pub(crate) fn clear_states(&mut self) {
        self.peers.clear();
    }

    /// Forget every peer.
    pub(crate) fn clear(&mut self) {
        self.peers.clear();
        self.known.clear();
    }
}
