//! Debug hand-off store abstraction.
//!
//! The authoring tool pre-seeds a session by writing a few values to a
//! transient key-value store. The engine reads them once at startup and
//! clears them so they never re-trigger.

use async_trait::async_trait;

use crate::error::StoryError;

/// Key holding the debug flag. Only the literal value `"true"` enables it.
pub const DEBUG_MODE_KEY: &str = "debugMode";

/// Key holding the segment id the debug session starts at.
pub const START_SEGMENT_KEY: &str = "startSegment";

/// Key holding the JSON-encoded response map.
pub const DEBUG_RESPONSES_KEY: &str = "debugUserResponses";

/// All keys owned by the hand-off channel.
pub const HANDOFF_KEYS: [&str; 3] = [DEBUG_MODE_KEY, START_SEGMENT_KEY, DEBUG_RESPONSES_KEY];

/// Transient string key-value store shared with the authoring tool.
#[async_trait]
pub trait HandoffStore: Send + Sync {
    /// Reads a value, returning `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoryError>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoryError>;

    /// Removes a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoryError>;
}
