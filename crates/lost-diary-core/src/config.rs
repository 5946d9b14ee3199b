//! Engine configuration.
//!
//! Defaults reproduce the pacing of the shipped experience. Hosts may
//! override them through `LOST_DIARY_*` environment variables.

use std::time::Duration;

use crate::error::StoryError;

/// Env var overriding the segment a fresh session starts at.
pub const ENTRY_SEGMENT_VAR: &str = "LOST_DIARY_ENTRY_SEGMENT";
/// Env var overriding the per-frame fade-out opacity step.
pub const FADE_OUT_STEP_VAR: &str = "LOST_DIARY_FADE_OUT_STEP";
/// Env var overriding the per-frame fade-in opacity step.
pub const FADE_IN_STEP_VAR: &str = "LOST_DIARY_FADE_IN_STEP";

/// Opacity ramp parameters for segment transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeTiming {
    /// Opacity removed per fade-out frame.
    pub fade_out_step: f32,
    /// Opacity added per fade-in frame.
    pub fade_in_step: f32,
    /// Suggested delay between fade-out frames.
    pub fade_out_frame: Duration,
    /// Suggested delay between fade-in frames.
    pub fade_in_frame: Duration,
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            fade_out_step: 0.1,
            fade_in_step: 0.05,
            fade_out_frame: Duration::from_millis(40),
            fade_in_frame: Duration::from_millis(60),
        }
    }
}

impl FadeTiming {
    /// Checks that both opacity steps lie in `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Config` naming the offending step.
    pub fn validate(&self) -> Result<(), StoryError> {
        check_step("fade_out_step", self.fade_out_step)?;
        check_step("fade_in_step", self.fade_in_step)?;
        Ok(())
    }
}

/// Configuration for a story session.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Segment a fresh session starts at.
    pub entry_segment: String,
    /// Label of the advance control when a segment does not set one.
    pub default_advance_label: String,
    /// Transition pacing.
    pub fade: FadeTiming,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entry_segment: "intro".to_owned(),
            default_advance_label: "Next".to_owned(),
            fade: FadeTiming::default(),
        }
    }
}

impl EngineConfig {
    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Config` if an override is present but invalid.
    pub fn from_env() -> Result<Self, StoryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup, falling back
    /// to defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Config` if an override is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(entry) = lookup(ENTRY_SEGMENT_VAR) {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(StoryError::Config(format!(
                    "{ENTRY_SEGMENT_VAR} must not be empty"
                )));
            }
            entry.clone_into(&mut config.entry_segment);
        }
        if let Some(raw) = lookup(FADE_OUT_STEP_VAR) {
            config.fade.fade_out_step = parse_step(FADE_OUT_STEP_VAR, &raw)?;
        }
        if let Some(raw) = lookup(FADE_IN_STEP_VAR) {
            config.fade.fade_in_step = parse_step(FADE_IN_STEP_VAR, &raw)?;
        }

        Ok(config)
    }
}

/// Parses an opacity step from an env var.
fn parse_step(var: &str, raw: &str) -> Result<f32, StoryError> {
    let step: f32 = raw
        .trim()
        .parse()
        .map_err(|e| StoryError::Config(format!("{var} must be a number: {e}")))?;
    check_step(var, step)
}

/// An opacity step must lie in `(0, 1]`, otherwise a fade never finishes.
fn check_step(name: &str, step: f32) -> Result<f32, StoryError> {
    if step > 0.0 && step <= 1.0 {
        Ok(step)
    } else {
        Err(StoryError::Config(format!(
            "{name} must be in (0, 1], got {step}"
        )))
    }
}
