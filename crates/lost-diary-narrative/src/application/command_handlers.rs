//! Command handlers for story sessions.
//!
//! Session start is the only place the engine talks to the debug hand-off
//! store: the authoring tool writes a start segment and prepared answers,
//! the next session picks them up once and clears them.

use std::sync::Arc;

use lost_diary_core::clock::Clock;
use lost_diary_core::error::StoryError;
use lost_diary_core::handoff::{
    DEBUG_MODE_KEY, DEBUG_RESPONSES_KEY, HANDOFF_KEYS, HandoffStore, START_SEGMENT_KEY,
};
use tracing::{debug, info, instrument, warn};

use crate::domain::aggregates::StorySession;
use crate::domain::commands::{SeedDebugSession, StartSession};
use crate::domain::responses::ResponseMap;
use crate::domain::store::SegmentStore;

/// Seed read from the hand-off store.
#[derive(Debug)]
struct DebugSeed {
    start_segment: Option<String>,
    responses: ResponseMap,
}

/// Reads and clears the hand-off keys. Returns `None` unless the debug flag
/// holds exactly `"true"`.
async fn take_debug_seed(handoff: &dyn HandoffStore) -> Result<Option<DebugSeed>, StoryError> {
    let flag = handoff.get(DEBUG_MODE_KEY).await?;
    if flag.as_deref() != Some("true") {
        return Ok(None);
    }

    let start_segment = handoff.get(START_SEGMENT_KEY).await?;
    let raw_responses = handoff.get(DEBUG_RESPONSES_KEY).await?;
    for key in HANDOFF_KEYS {
        handoff.remove(key).await?;
    }
    debug!("debug hand-off keys cleared");

    let responses = match raw_responses.as_deref() {
        None | Some("") => ResponseMap::new(),
        Some(raw) => serde_json::from_str(raw).map_err(|e| {
            StoryError::Handoff(format!("malformed {DEBUG_RESPONSES_KEY}: {e}"))
        })?,
    };

    Ok(Some(DebugSeed {
        start_segment: start_segment.filter(|id| !id.trim().is_empty()),
        responses,
    }))
}

/// Handles the `StartSession` command: consumes any debug seed, creates the
/// session and derives its dates.
///
/// # Errors
///
/// Returns `StoryError::Handoff` if the hand-off store fails or holds
/// malformed answers, `StoryError::Config` if the fade timing is invalid,
/// and `StoryError::SegmentNotFound` if the entry or seeded segment is
/// unknown.
#[instrument(skip_all, fields(entry = %command.config.entry_segment))]
pub async fn start_session(
    command: &StartSession,
    store: Arc<SegmentStore>,
    clock: Arc<dyn Clock>,
    handoff: &dyn HandoffStore,
) -> Result<StorySession, StoryError> {
    let seed = take_debug_seed(handoff).await?;

    let mut session = match seed {
        Some(DebugSeed {
            start_segment: Some(start_segment),
            responses,
        }) => {
            info!(
                start_segment = %start_segment,
                responses = responses.len(),
                "starting seeded debug session"
            );
            StorySession::resume(
                store,
                clock,
                command.config.clone(),
                command.device.clone(),
                &start_segment,
                responses,
            )?
        }
        Some(DebugSeed {
            start_segment: None,
            ..
        }) => {
            warn!("debug mode set without a start segment, starting normally");
            StorySession::new(store, clock, command.config.clone(), command.device.clone())?
        }
        None => StorySession::new(store, clock, command.config.clone(), command.device.clone())?,
    };

    session.derive_dates();
    Ok(session)
}

/// Handles the `SeedDebugSession` command: writes the hand-off keys so the
/// next session starts at the chosen segment with the given answers.
///
/// # Errors
///
/// Returns `StoryError::SegmentNotFound` if the segment is unknown, and
/// `StoryError::Handoff` if the hand-off store fails.
#[instrument(skip_all, fields(start_segment = %command.start_segment))]
pub async fn seed_debug_session(
    command: &SeedDebugSession,
    store: &SegmentStore,
    handoff: &dyn HandoffStore,
) -> Result<(), StoryError> {
    store.get(&command.start_segment)?;

    let responses = serde_json::to_string(&command.responses)
        .map_err(|e| StoryError::Handoff(format!("cannot encode responses: {e}")))?;

    handoff.set(START_SEGMENT_KEY, &command.start_segment).await?;
    handoff.set(DEBUG_RESPONSES_KEY, &responses).await?;
    handoff.set(DEBUG_MODE_KEY, "true").await?;

    info!(responses = command.responses.len(), "debug session seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use lost_diary_core::clock::Clock;
    use lost_diary_core::error::StoryError;
    use lost_diary_core::handoff::{DEBUG_MODE_KEY, DEBUG_RESPONSES_KEY, START_SEGMENT_KEY};
    use lost_diary_test_support::{FailingHandoffStore, FixedClock, InMemoryHandoffStore};

    use crate::application::command_handlers::{seed_debug_session, start_session};
    use crate::domain::commands::{SeedDebugSession, StartSession};
    use crate::domain::responses::ResponseMap;
    use crate::domain::segment::Segment;
    use crate::domain::store::SegmentStore;

    fn store() -> Arc<SegmentStore> {
        Arc::new(
            SegmentStore::new(vec![
                Segment::literal("intro", "Open the Diary").next("ask"),
                Segment::literal("ask", "Where are you from?")
                    .input("Tell Lin where you're from...", "userLocation")
                    .next("intro"),
            ])
            .unwrap(),
        )
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2025, 4, 5, 10, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_start_session_without_seed_starts_at_entry() {
        // Arrange
        let handoff = InMemoryHandoffStore::new();

        // Act
        let session = start_session(&StartSession::default(), store(), clock(), &handoff)
            .await
            .unwrap();

        // Assert
        assert_eq!(session.current_id(), "intro");
        assert!(session.responses().is_empty());
        assert_eq!(session.dates().unwrap().today(), "April 5, 2025");
    }

    #[tokio::test]
    async fn test_start_session_consumes_debug_seed_once() {
        // Arrange
        let handoff = InMemoryHandoffStore::with_values(&[
            (DEBUG_MODE_KEY, "true"),
            (START_SEGMENT_KEY, "ask"),
            (DEBUG_RESPONSES_KEY, r#"{"userName":"Lin"}"#),
        ]);

        // Act
        let first = start_session(&StartSession::default(), store(), clock(), &handoff)
            .await
            .unwrap();
        let second = start_session(&StartSession::default(), store(), clock(), &handoff)
            .await
            .unwrap();

        // Assert
        assert_eq!(first.current_id(), "ask");
        assert_eq!(first.responses().get("userName"), Some("Lin"));
        assert!(handoff.is_empty());
        assert_eq!(second.current_id(), "intro");
        assert!(second.responses().is_empty());
    }

    #[tokio::test]
    async fn test_start_session_ignores_flag_other_than_true() {
        let handoff = InMemoryHandoffStore::with_values(&[
            (DEBUG_MODE_KEY, "yes"),
            (START_SEGMENT_KEY, "ask"),
        ]);

        let session = start_session(&StartSession::default(), store(), clock(), &handoff)
            .await
            .unwrap();

        assert_eq!(session.current_id(), "intro");
        assert_eq!(handoff.len(), 2);
    }

    #[tokio::test]
    async fn test_start_session_rejects_unknown_seeded_segment() {
        // Arrange
        let handoff = InMemoryHandoffStore::with_values(&[
            (DEBUG_MODE_KEY, "true"),
            (START_SEGMENT_KEY, "segment99"),
        ]);

        // Act
        let result = start_session(&StartSession::default(), store(), clock(), &handoff).await;

        // Assert
        match result {
            Err(StoryError::SegmentNotFound(id)) => assert_eq!(id, "segment99"),
            other => panic!("expected SegmentNotFound, got {other:?}"),
        }
        assert!(handoff.is_empty());
    }

    #[tokio::test]
    async fn test_start_session_rejects_malformed_responses() {
        let handoff = InMemoryHandoffStore::with_values(&[
            (DEBUG_MODE_KEY, "true"),
            (START_SEGMENT_KEY, "ask"),
            (DEBUG_RESPONSES_KEY, "{not json"),
        ]);

        let result = start_session(&StartSession::default(), store(), clock(), &handoff).await;

        assert!(matches!(result, Err(StoryError::Handoff(_))));
        assert!(handoff.is_empty());
    }

    #[tokio::test]
    async fn test_start_session_propagates_store_failure() {
        let result =
            start_session(&StartSession::default(), store(), clock(), &FailingHandoffStore).await;

        assert!(matches!(result, Err(StoryError::Handoff(_))));
    }

    #[tokio::test]
    async fn test_seed_then_start_round_trips_through_handoff() {
        // Arrange
        let handoff = InMemoryHandoffStore::new();
        let responses: ResponseMap = [("userName".to_owned(), "Lin".to_owned())]
            .into_iter()
            .collect();
        let command = SeedDebugSession {
            start_segment: "ask".to_owned(),
            responses,
        };

        // Act
        seed_debug_session(&command, &store(), &handoff).await.unwrap();
        let session = start_session(&StartSession::default(), store(), clock(), &handoff)
            .await
            .unwrap();

        // Assert
        assert_eq!(session.current_id(), "ask");
        assert_eq!(session.responses().get("userName"), Some("Lin"));
        assert!(handoff.is_empty());
    }

    #[tokio::test]
    async fn test_seed_rejects_unknown_segment_without_writing() {
        let handoff = InMemoryHandoffStore::new();
        let command = SeedDebugSession {
            start_segment: "nowhere".to_owned(),
            responses: ResponseMap::new(),
        };

        let result = seed_debug_session(&command, &store(), &handoff).await;

        assert!(matches!(result, Err(StoryError::SegmentNotFound(_))));
        assert!(handoff.is_empty());
    }
}
