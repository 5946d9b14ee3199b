//! Domain events for story sessions.

use lost_diary_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// Emitted when a session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    /// Segment the session starts at.
    pub segment_id: String,
    /// Whether the start was seeded through the debug hand-off.
    pub seeded: bool,
}

/// Emitted when a transition begins fading out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionStarted {
    /// Segment being left.
    pub from_segment: String,
    /// Segment being entered.
    pub to_segment: String,
    /// Generation of the transition.
    pub token: u64,
}

/// Emitted when an in-flight transition is superseded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionCancelled {
    /// Target of the cancelled transition.
    pub to_segment: String,
    /// Generation of the cancelled transition.
    pub token: u64,
}

/// Emitted when the pointer swaps at full fade-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentEntered {
    /// The newly current segment.
    pub segment_id: String,
}

/// Emitted when a transition finishes fading in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionCompleted {
    /// The current segment.
    pub segment_id: String,
    /// Generation of the transition.
    pub token: u64,
}

/// Emitted when the reader's answer is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecorded {
    /// Segment that asked for the answer.
    pub segment_id: String,
    /// Key the answer is stored under.
    pub response_key: String,
}

/// Event payload variants for story sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StoryEventKind {
    /// A session started.
    SessionStarted(SessionStarted),
    /// A transition started.
    TransitionStarted(TransitionStarted),
    /// A transition was superseded.
    TransitionCancelled(TransitionCancelled),
    /// The pointer moved.
    SegmentEntered(SegmentEntered),
    /// A transition finished.
    TransitionCompleted(TransitionCompleted),
    /// An answer was stored.
    ResponseRecorded(ResponseRecorded),
}

impl StoryEventKind {
    /// Routing name of the variant.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => "story.session_started",
            Self::TransitionStarted(_) => "story.transition_started",
            Self::TransitionCancelled(_) => "story.transition_cancelled",
            Self::SegmentEntered(_) => "story.segment_entered",
            Self::TransitionCompleted(_) => "story.transition_completed",
            Self::ResponseRecorded(_) => "story.response_recorded",
        }
    }
}

/// Domain event envelope for story sessions.
#[derive(Debug, Clone)]
pub struct StoryEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: StoryEventKind,
}

impl DomainEvent for StoryEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("StoryEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_payload_is_tagged_by_variant() {
        // Arrange
        let event = StoryEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: "story.response_recorded".to_owned(),
                session_id: Uuid::new_v4(),
                sequence_number: 2,
                occurred_at: Utc.with_ymd_and_hms(2025, 4, 5, 10, 0, 0).unwrap(),
            },
            kind: StoryEventKind::ResponseRecorded(ResponseRecorded {
                segment_id: "segment2B".to_owned(),
                response_key: "userName".to_owned(),
            }),
        };

        // Act
        let payload = event.to_payload();

        // Assert
        assert_eq!(event.event_type(), "story.response_recorded");
        assert_eq!(
            payload,
            serde_json::json!({
                "ResponseRecorded": { "segment_id": "segment2B", "response_key": "userName" }
            })
        );
        assert_eq!(event.metadata().sequence_number, 2);
    }
}
