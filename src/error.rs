use thiserror::Error;

/// Contract violations and malformed project documents.
///
/// These abort the call; the timeline is left untouched.
#[derive(Error, Debug)]
pub enum TimelineError {
    #[error("clip index {index} out of range (clip count {len})")]
    ClipIndexOutOfRange { index: usize, len: usize },
    #[error("cut index {index} out of range (cut count {len})")]
    CutIndexOutOfRange { index: usize, len: usize },
    #[error("invalid project: {0}")]
    InvalidProject(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why `create_cut` refused to cut. The message is meant for the operator.
///
/// A rejected cut is a no-op: clips, cuts and selection are unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutRejected {
    #[error("Select a range on a clip before cutting")]
    NoSelection,
    #[error("Selection is too short to cut")]
    TooShort,
    #[error("Cannot cut through a cut")]
    ThroughCut,
}
