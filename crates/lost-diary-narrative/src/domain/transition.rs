//! Fade transition state machine.
//!
//! A transition ramps opacity from 1 to 0, swaps the current segment, then
//! ramps back to 1. The host advances it one display frame at a time with
//! the token it was given; once a newer transition starts, older tokens are
//! stale and their frames do nothing.

use std::fmt;

use lost_diary_core::config::FadeTiming;
use serde::{Deserialize, Serialize};

/// Identifies one transition. Frames carrying any other token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionToken(pub(crate) u64);

impl TransitionToken {
    /// Raw generation number.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransitionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transition#{}", self.0)
    }
}

/// Whether the engine accepts navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionPhase {
    /// Accepting navigation.
    Idle,
    /// A transition is in flight; navigation is ignored.
    Transitioning,
}

/// Direction of the opacity ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FadeStage {
    /// Ramping 1 → 0.
    Out,
    /// Ramping 0 → 1.
    In,
}

/// Result of stepping a fade by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FadeStep {
    /// Still fading out.
    FadingOut(f32),
    /// Opacity reached 0; the ramp now fades in.
    FadedOut,
    /// Still fading in.
    FadingIn(f32),
    /// Opacity reached 1.
    FadedIn,
}

/// Opacity ramp of a single transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Fade {
    stage: FadeStage,
    opacity: f32,
}

impl Fade {
    pub(crate) fn new() -> Self {
        Self {
            stage: FadeStage::Out,
            opacity: 1.0,
        }
    }

    pub(crate) fn stage(&self) -> FadeStage {
        self.stage
    }

    pub(crate) fn opacity(&self) -> f32 {
        self.opacity
    }

    pub(crate) fn step(&mut self, timing: &FadeTiming) -> FadeStep {
        match self.stage {
            FadeStage::Out => {
                self.opacity = (self.opacity - timing.fade_out_step).max(0.0);
                if self.opacity <= 0.0 {
                    self.opacity = 0.0;
                    self.stage = FadeStage::In;
                    FadeStep::FadedOut
                } else {
                    FadeStep::FadingOut(self.opacity)
                }
            }
            FadeStage::In => {
                self.opacity = (self.opacity + timing.fade_in_step).min(1.0);
                if self.opacity >= 1.0 {
                    self.opacity = 1.0;
                    FadeStep::FadedIn
                } else {
                    FadeStep::FadingIn(self.opacity)
                }
            }
        }
    }
}

/// An in-flight transition towards `target`.
#[derive(Debug, Clone)]
pub(crate) struct Transition {
    pub(crate) token: TransitionToken,
    pub(crate) target: String,
    pub(crate) fade: Fade,
}

/// What a frame did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameOutcome {
    /// The token does not belong to the in-flight transition.
    Stale,
    /// Opacity changed; the pointer did not.
    Faded {
        /// Opacity after this frame.
        opacity: f32,
    },
    /// Fully faded out and the pointer now names `segment_id`.
    Swapped {
        /// The newly current segment.
        segment_id: String,
    },
    /// Fully faded in; the engine is idle again.
    Completed {
        /// The current segment.
        segment_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_reaches_zero_then_one() {
        // Arrange
        let timing = FadeTiming::default();
        let mut fade = Fade::new();
        let mut steps = Vec::new();

        // Act
        loop {
            let step = fade.step(&timing);
            steps.push(step);
            if step == FadeStep::FadedIn {
                break;
            }
        }

        // Assert
        let swap_at = steps
            .iter()
            .position(|s| *s == FadeStep::FadedOut)
            .unwrap();
        assert!(steps[..swap_at]
            .iter()
            .all(|s| matches!(s, FadeStep::FadingOut(_))));
        assert!(steps[swap_at + 1..steps.len() - 1]
            .iter()
            .all(|s| matches!(s, FadeStep::FadingIn(_))));
        assert!((fade.opacity() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_full_step_fades_in_one_frame_each_way() {
        let timing = FadeTiming {
            fade_out_step: 1.0,
            fade_in_step: 1.0,
            ..FadeTiming::default()
        };
        let mut fade = Fade::new();

        assert_eq!(fade.step(&timing), FadeStep::FadedOut);
        assert_eq!(fade.stage(), FadeStage::In);
        assert!(fade.opacity().abs() < f32::EPSILON);
        assert_eq!(fade.step(&timing), FadeStep::FadedIn);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(TransitionToken(7).to_string(), "transition#7");
        assert_eq!(TransitionToken(7).get(), 7);
    }
}
