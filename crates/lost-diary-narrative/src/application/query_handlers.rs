//! Query handlers for story sessions.
//!
//! These build read-only view DTOs for the host's renderer and for
//! authoring tools.

use lost_diary_core::error::StoryError;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::StorySession;
use crate::domain::resolver::ResolvedContent;
use crate::domain::segment::Segment;
use crate::domain::store::SegmentStore;
use crate::domain::transition::TransitionPhase;

/// The control the reader is offered below the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Controls {
    /// A single advance button.
    Advance {
        /// Button label.
        label: String,
    },
    /// One button per branch, in order.
    Choices {
        /// Button labels.
        labels: Vec<String>,
    },
    /// A free-text field.
    Input {
        /// Placeholder text.
        prompt: String,
        /// Key the answer is stored under.
        response_key: String,
    },
    /// Nothing to press.
    None,
}

/// Everything the renderer needs to draw the current segment.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentView {
    /// The session identifier.
    pub session_id: Uuid,
    /// The current segment.
    pub segment_id: String,
    /// Resolved text and presentation hints.
    pub content: ResolvedContent,
    /// Controls shown below the text.
    pub controls: Controls,
    /// Whether navigation is accepted.
    pub phase: TransitionPhase,
    /// Opacity to draw the text with.
    pub opacity: f32,
    /// Whether the back control is enabled.
    pub can_go_back: bool,
    /// Number of entries in the navigation history.
    pub history_len: usize,
}

/// Catalogue entry for authoring tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSummary {
    /// Segment id.
    pub id: String,
    /// Short text preview, or a marker for computed content.
    pub preview: String,
    /// Default successor.
    pub next_id: Option<String>,
    /// Whether the segment asks for input.
    pub requires_input: bool,
    /// Whether the segment branches.
    pub has_choices: bool,
}

impl From<&Segment> for SegmentSummary {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id.clone(),
            preview: segment.preview(),
            next_id: segment.next_id.clone(),
            requires_input: segment.input_request.is_some(),
            has_choices: segment.has_choices(),
        }
    }
}

fn controls_for(segment: &Segment, default_label: &str) -> Controls {
    if let Some(request) = &segment.input_request {
        return Controls::Input {
            prompt: request.prompt.clone(),
            response_key: request.response_key.clone(),
        };
    }
    if segment.has_choices() {
        return Controls::Choices {
            labels: segment
                .choices
                .iter()
                .map(|choice| choice.label.clone())
                .collect(),
        };
    }
    if segment.next_id.is_some() {
        return Controls::Advance {
            label: segment
                .advance_label
                .clone()
                .unwrap_or_else(|| default_label.to_owned()),
        };
    }
    Controls::None
}

/// Builds the view of the session's current segment.
///
/// # Errors
///
/// Returns `StoryError::Content` if the segment's content function fails.
pub fn current_view(session: &StorySession) -> Result<SegmentView, StoryError> {
    let segment = session.current_segment()?;
    let content = session.resolve_current()?;
    Ok(SegmentView {
        session_id: session.id,
        segment_id: segment.id.clone(),
        content,
        controls: controls_for(segment, &session.config().default_advance_label),
        phase: session.phase(),
        opacity: session.opacity(),
        can_go_back: session.can_go_back(),
        history_len: session.history().len(),
    })
}

/// Lists segments whose id or static text contains `term`, in authoring
/// order. An empty term lists everything.
#[must_use]
pub fn list_segments(store: &SegmentStore, term: &str) -> Vec<SegmentSummary> {
    store
        .search(term)
        .into_iter()
        .map(SegmentSummary::from)
        .collect()
}
