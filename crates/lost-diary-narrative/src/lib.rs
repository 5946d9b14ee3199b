//! Lost Diary — story graph traversal bounded context.
//!
//! Holds the segment graph, resolves dynamic segment text against the
//! reader's responses, device and derived dates, and drives navigation with
//! cancellable fade transitions.

pub mod application;
pub mod domain;
pub mod story;
