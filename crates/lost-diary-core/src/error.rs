//! Story engine error types.

use thiserror::Error;

/// Top-level error type for the story engine.
///
/// Every variant aborts the operation that produced it. Engine state is left
/// exactly as it was before the call.
#[derive(Debug, Error)]
pub enum StoryError {
    /// A referenced segment id is missing from the store.
    #[error("segment not found: {0}")]
    SegmentNotFound(String),

    /// A choice index was out of range, or the segment has no choices.
    #[error("invalid choice {index} on segment {segment_id}")]
    InvalidChoice {
        /// The segment the choice was made on.
        segment_id: String,
        /// The rejected index.
        index: usize,
    },

    /// The segment has no default successor to follow.
    #[error("segment {0} has no default successor")]
    NoSuccessor(String),

    /// The segment needs text input before it can be left.
    #[error("segment {0} requires input")]
    InputRequired(String),

    /// Input was submitted on a segment that does not request any.
    #[error("segment {0} does not request input")]
    InputNotRequested(String),

    /// A content function failed while resolving a segment.
    #[error("content resolution failed for segment {segment_id}: {message}")]
    Content {
        /// The segment whose content failed.
        segment_id: String,
        /// Why it failed.
        message: String,
    },

    /// The segment table violates a graph invariant.
    #[error("invalid story graph: {0}")]
    InvalidGraph(String),

    /// The debug hand-off store could not be read, written or decoded.
    #[error("hand-off error: {0}")]
    Handoff(String),

    /// A configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}
