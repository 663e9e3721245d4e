use vrlink_frame::EnvelopeConfig;

/// Configuration for a protocol session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Envelope codec settings (protocol version, frame count limit).
    pub envelope: EnvelopeConfig,
    /// Whether the local player is in VR. Only VR players announce.
    pub local_vr: bool,
    /// Coalesce repeated announcements into one pending frame.
    pub coalesce_announcements: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            envelope: EnvelopeConfig::default(),
            local_vr: true,
            coalesce_announcements: true,
        }
    }
}
