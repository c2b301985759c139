//! Notifications emitted by the timeline on its event bus.

/// Apparent duration may have changed (clips or cuts added, removed or reloaded).
///
/// Carries no payload: listeners re-read what they need from the timeline.
/// Pan bounds are already recomputed when this fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DurationChangedEvent;
