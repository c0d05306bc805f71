//! In-memory surface

use super::Surface;
use crate::input::InputEvent;
use crate::renderer::FrameBuffer;
use anyhow::Result;
use std::collections::VecDeque;

/// Surface with no display behind it.
///
/// Events are injected with [`HeadlessSurface::push_event`] and handed out on
/// the next poll. Presented frames are summarized by the alpha of their
/// top-left pixel, which equals the frame's intensity.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    width: u16,
    height: u16,
    mapped: bool,
    pending: VecDeque<InputEvent>,
    map_calls: usize,
    unmap_calls: usize,
    presented: Vec<f32>,
}

impl HeadlessSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            mapped: false,
            pending: VecDeque::new(),
            map_calls: 0,
            unmap_calls: 0,
            presented: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    pub fn map_calls(&self) -> usize {
        self.map_calls
    }

    pub fn unmap_calls(&self) -> usize {
        self.unmap_calls
    }

    /// Intensity of every frame presented so far
    pub fn presented(&self) -> &[f32] {
        &self.presented
    }
}

impl Surface for HeadlessSurface {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        Ok(self.pending.drain(..).collect())
    }

    fn is_mapped(&mut self) -> Result<bool> {
        Ok(self.mapped)
    }

    fn map_window(&mut self) -> Result<()> {
        self.map_calls += 1;
        self.mapped = true;
        Ok(())
    }

    fn unmap_window(&mut self) -> Result<()> {
        self.unmap_calls += 1;
        self.mapped = false;
        Ok(())
    }

    fn present(&mut self, frame: &FrameBuffer) -> Result<()> {
        let alpha = frame.pixels().first().map_or(0, |p| p.to_be_bytes()[0]);
        self.presented.push(alpha as f32 / 255.0);
        Ok(())
    }

    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}
