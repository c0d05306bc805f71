//! Per-loop mutable state

use super::fade::FadeState;

/// Everything the main loop mutates between iterations.
#[derive(Debug, Clone, Default)]
pub struct LoopState {
    pub fade: FadeState,
    close_requested: bool,
    terminated: bool,
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop once the exit fade completes. Cannot be undone.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    pub fn is_running(&self) -> bool {
        !self.terminated
    }
}
