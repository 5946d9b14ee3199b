//! Shared test doubles for the Lost Diary story engine.

mod clock;
mod handoff;

pub use clock::FixedClock;
pub use handoff::{FailingHandoffStore, InMemoryHandoffStore};
