//! Fade animation state machine
//!
//! Progress always counts up from 0 to 1. The direction picks the easing
//! curve: entering rises along a quarter sine, exiting falls along the next
//! quarter.

use std::f32::consts::FRAC_PI_2;

/// Which way the panel is currently fading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeDirection {
    /// Idle: fully shown or fully hidden
    #[default]
    None,
    /// Entering (opacity rising)
    In,
    /// Exiting (opacity falling)
    Out,
}

/// Result of advancing the fade by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeFrame {
    /// Intensity in [0, 1] for the renderer, `None` while idle
    pub intensity: Option<f32>,
    /// Set on the frame a fade run finishes
    pub completed: Option<FadeDirection>,
}

/// Direction plus normalized progress
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FadeState {
    direction: FadeDirection,
    progress: f32,
}

impl FadeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_idle(&self) -> bool {
        self.direction == FadeDirection::None
    }

    /// Start (or continue) a fade in the given direction.
    ///
    /// Asking for the direction already running keeps its progress. Any other
    /// change starts a full run from 0, so an interrupted fade is never cut short.
    pub fn set_direction(&mut self, direction: FadeDirection) {
        if direction == self.direction {
            return;
        }

        self.progress = 0.0;
        self.direction = direction;
    }

    /// Advance by `rate * elapsed_secs` and report the frame's intensity.
    pub fn advance(&mut self, rate: f32, elapsed_secs: f32) -> FadeFrame {
        if self.is_idle() {
            return FadeFrame {
                intensity: None,
                completed: None,
            };
        }

        let step = (rate * elapsed_secs).max(0.0);
        self.progress = clamp_unit(self.progress + step);
        let intensity = intensity(self.direction, self.progress);

        let completed = if self.progress >= 1.0 {
            let finished = self.direction;
            self.progress = 0.0;
            self.direction = FadeDirection::None;
            Some(finished)
        } else {
            None
        };

        FadeFrame {
            intensity: Some(intensity),
            completed,
        }
    }
}

/// Intensity of the easing curve for `direction` at `progress`.
///
/// Idle has no curve of its own and reports full intensity.
pub fn intensity(direction: FadeDirection, progress: f32) -> f32 {
    let p = clamp_unit(progress);
    let value = match direction {
        FadeDirection::In => (p * FRAC_PI_2).sin(),
        FadeDirection::Out => (p * FRAC_PI_2 + FRAC_PI_2).sin(),
        FadeDirection::None => 1.0,
    };
    clamp_unit(value)
}

/// Clamp to [0, 1], mapping NaN to 0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
