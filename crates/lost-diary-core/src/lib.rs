//! Lost Diary Core — shared abstractions for the story engine.
//!
//! This crate defines the ports and types every part of the engine depends
//! on: time, errors, the domain event envelope, the debug hand-off store,
//! configuration and tracing bootstrap. It contains no story content.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod handoff;
pub mod telemetry;
