//! Mock `HandoffStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lost_diary_core::error::StoryError;
use lost_diary_core::handoff::HandoffStore;

/// A hand-off store backed by a `HashMap`, standing in for browser session
/// storage.
#[derive(Debug, Default)]
pub struct InMemoryHandoffStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryHandoffStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given pairs.
    #[must_use]
    pub fn with_values(pairs: &[(&str, &str)]) -> Self {
        let values = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }

    /// Returns a snapshot of the stored value for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Returns the number of stored keys.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn len(&self) -> usize {
        self.values.lock().unwrap().len()
    }

    /// Returns `true` when no keys are stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HandoffStore for InMemoryHandoffStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoryError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoryError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoryError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A hand-off store that always returns an error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingHandoffStore;

#[async_trait]
impl HandoffStore for FailingHandoffStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoryError> {
        Err(StoryError::Handoff("storage unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StoryError> {
        Err(StoryError::Handoff("storage unavailable".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StoryError> {
        Err(StoryError::Handoff("storage unavailable".into()))
    }
}
