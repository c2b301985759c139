//! Source clip in the edit sequence.

use serde::{Deserialize, Serialize};

/// One source clip. Sequence order is playback order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Opaque identifier, usually the recording's file name.
    pub name: String,
    /// Full (uncut) length in seconds.
    pub duration: f64,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}
