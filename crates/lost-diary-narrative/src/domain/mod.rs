//! Domain model for the story graph.

pub mod aggregates;
pub mod commands;
pub mod dates;
pub mod device;
pub mod events;
pub mod resolver;
pub mod responses;
pub mod segment;
pub mod store;
pub mod transition;
