//! Fixed-rate frame pacing

use std::time::{Duration, Instant};

/// Monotonic time source the pacer measures and sleeps against
pub trait Clock {
    /// Time since the clock's origin
    fn now(&self) -> Duration;

    /// Block the calling thread for (at least roughly) `duration`
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Simulated clock for driving the loop without real time passing.
///
/// Work done between sleeps can be simulated with [`ManualClock::advance`].
/// `sleep_ratio` scales how much time a sleep actually passes, which lets
/// tests model a scheduler that wakes early.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Duration,
    sleep_ratio: f64,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            sleep_ratio: 1.0,
            sleeps: Vec::new(),
        }
    }

    pub fn with_sleep_ratio(sleep_ratio: f64) -> Self {
        Self {
            sleep_ratio,
            ..Self::new()
        }
    }

    /// Pretend `duration` of work happened
    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }

    /// Every sleep request seen so far
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }

    pub fn total_slept(&self) -> Duration {
        self.sleeps.iter().sum()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        if !duration.is_zero() {
            // Always move forward, however short the sleep
            self.now += duration.mul_f64(self.sleep_ratio).max(Duration::from_nanos(1));
        }
    }
}

/// Sleeps out the remainder of each frame to hold a target frame duration.
///
/// Overrunning frames are not corrected: the pacer just starts the next
/// frame immediately.
#[derive(Debug, Clone)]
pub struct FramePacer {
    target: Duration,
    frame_start: Duration,
    last_frame: Duration,
}

impl FramePacer {
    /// Start pacing at `frame_rate` frames per second from the clock's current time
    pub fn new(frame_rate: u32, clock: &impl Clock) -> Self {
        Self::with_target(Duration::from_secs(1) / frame_rate.max(1), clock)
    }

    pub fn with_target(target: Duration, clock: &impl Clock) -> Self {
        Self {
            target,
            frame_start: clock.now(),
            last_frame: Duration::ZERO,
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    /// Duration of the most recently finished frame (zero before the first)
    pub fn last_frame(&self) -> Duration {
        self.last_frame
    }

    /// Block until the current frame has lasted `target`, then start the next.
    ///
    /// Returns the measured duration of the frame that just ended.
    pub fn wait(&mut self, clock: &mut impl Clock) -> Duration {
        let target_ms = millis(self.target);
        let mut end = clock.now();
        let mut elapsed_ms = millis(end.saturating_sub(self.frame_start));

        if target_ms - elapsed_ms > f32::EPSILON {
            while target_ms - elapsed_ms > f32::EPSILON {
                let remaining = Duration::from_secs_f32((target_ms - elapsed_ms) / 1000.0);
                if remaining.is_zero() {
                    // Below clock resolution
                    break;
                }
                clock.sleep(remaining);
                end = clock.now();
                elapsed_ms = millis(end.saturating_sub(self.frame_start));
            }
        } else {
            tracing::trace!(elapsed_ms, target_ms, "Frame running behind");
        }

        self.last_frame = end.saturating_sub(self.frame_start);
        self.frame_start = end;
        self.last_frame
    }
}

fn millis(duration: Duration) -> f32 {
    duration.as_secs_f32() * 1000.0
}
