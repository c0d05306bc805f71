//! Animation core: fade state, loop state and frame pacing

pub mod fade;
pub mod pacer;
pub mod state;

pub use fade::{FadeDirection, FadeFrame, FadeState};
pub use pacer::{Clock, FramePacer, ManualClock, MonotonicClock};
pub use state::LoopState;
