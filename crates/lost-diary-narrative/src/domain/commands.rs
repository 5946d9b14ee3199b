//! Commands for story sessions.

use lost_diary_core::config::EngineConfig;

use super::device::DeviceInfo;
use super::responses::ResponseMap;

/// Command to start a reading session.
#[derive(Debug, Clone, Default)]
pub struct StartSession {
    /// Session configuration.
    pub config: EngineConfig,
    /// The reader's device, as detected by the host.
    pub device: DeviceInfo,
}

/// Command issued by the authoring tool to start the next session at a
/// chosen segment with prepared answers.
#[derive(Debug, Clone)]
pub struct SeedDebugSession {
    /// Segment the next session starts at.
    pub start_segment: String,
    /// Answers the next session starts with.
    pub responses: ResponseMap,
}
