//! Overlay main loop

use crate::config::Config;
use crate::core::{Clock, FadeDirection, FramePacer, LoopState};
use crate::input::{reduce_events, Hotkeys};
use crate::platform::Surface;
use crate::renderer::{FrameBuffer, Gradient};
use anyhow::Result;
use tracing::{debug, info};

/// Run the overlay on the X11 display until the quit hotkey finishes
#[cfg(feature = "x11")]
pub fn run(config: Config) -> Result<()> {
    use crate::core::MonotonicClock;
    use crate::platform::x11::X11Surface;

    info!("Starting X11 backend");
    let hotkeys = config.hotkeys()?;
    let surface = X11Surface::new(&config, &hotkeys)?;
    let mut overlay = Overlay::new(surface, MonotonicClock::new(), &config)?;
    overlay.run()
}

#[cfg(not(feature = "x11"))]
pub fn run(_config: Config) -> Result<()> {
    anyhow::bail!("X11 support not compiled in")
}

/// Drives one surface: input, fade, render, then pace, once per iteration.
pub struct Overlay<S: Surface, C: Clock> {
    surface: S,
    clock: C,
    pacer: FramePacer,
    state: LoopState,
    hotkeys: Hotkeys,
    fade_rate: f32,
    gradient: Gradient,
    frame: FrameBuffer,
}

impl<S: Surface, C: Clock> Overlay<S, C> {
    pub fn new(surface: S, clock: C, config: &Config) -> Result<Self> {
        let (width, height) = surface.size();
        let gradient = Gradient::new(width, height, config.appearance.color)?;
        let frame = FrameBuffer::new(width, height)?;
        let pacer = FramePacer::new(config.animation.frame_rate, &clock);

        Ok(Self {
            surface,
            clock,
            pacer,
            state: LoopState::new(),
            hotkeys: config.hotkeys()?,
            fade_rate: config.animation.fade_rate,
            gradient,
            frame,
        })
    }

    /// Map the panel and begin the opening fade
    pub fn show(&mut self) -> Result<()> {
        self.surface.map_window()?;
        self.state.fade.set_direction(FadeDirection::In);
        Ok(())
    }

    /// Show the panel, then loop until closed
    pub fn run(&mut self) -> Result<()> {
        self.show()?;
        info!(
            frame_ms = self.pacer.target().as_secs_f32() * 1000.0,
            "Entering main loop"
        );

        while self.tick()? {}

        info!("Main loop finished");
        Ok(())
    }

    /// One loop iteration. Returns whether the loop should keep going.
    pub fn tick(&mut self) -> Result<bool> {
        let events = self.surface.poll_events()?;
        reduce_events(&events, &self.hotkeys, &mut self.state, &mut self.surface)?;

        let elapsed = self.pacer.last_frame().as_secs_f32();
        let fade = self.state.fade.advance(self.fade_rate, elapsed);

        if let Some(direction) = fade.completed {
            debug!(?direction, "Fade finished");
            if direction == FadeDirection::Out {
                self.surface.unmap_window()?;
            }
            if self.state.close_requested() {
                self.state.terminate();
            }
        }

        if self.surface.is_mapped()? {
            self.gradient
                .render(fade.intensity.unwrap_or(1.0), &mut self.frame);
            self.surface.present(&self.frame)?;
        }

        if self.state.is_running() {
            self.pacer.wait(&mut self.clock);
        }

        Ok(self.state.is_running())
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
