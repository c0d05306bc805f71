//! Platform abstraction layer
//!
//! The animation loop only talks to a [`Surface`]. The X11 backend is the
//! real implementation; [`HeadlessSurface`] keeps everything in memory.

mod headless;

#[cfg(feature = "x11")]
pub mod x11;

pub use headless::HeadlessSurface;

use crate::input::InputEvent;
use crate::renderer::FrameBuffer;
use anyhow::Result;

/// The window the overlay draws into
pub trait Surface {
    /// Drain every event that arrived since the last call
    fn poll_events(&mut self) -> Result<Vec<InputEvent>>;

    /// Query whether the window is currently mapped
    fn is_mapped(&mut self) -> Result<bool>;

    fn map_window(&mut self) -> Result<()>;

    fn unmap_window(&mut self) -> Result<()>;

    /// Copy a finished frame to the visible window
    fn present(&mut self, frame: &FrameBuffer) -> Result<()>;

    /// Panel size in pixels
    fn size(&self) -> (u16, u16);
}

/// Rectangle of a physical monitor in root-window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

/// Where the panel sits on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl PanelGeometry {
    /// Full monitor width, `height_fraction` of its height, flush with the bottom edge
    pub fn bottom_of(monitor: Monitor, height_fraction: f32) -> Self {
        let height = (monitor.height as f32 * height_fraction.clamp(0.0, 1.0)) as u16;
        let height = height.max(1).min(monitor.height.max(1));
        let y = monitor.y as i32 + monitor.height as i32 - height as i32;

        Self {
            x: monitor.x,
            y: y.clamp(i16::MIN as i32, i16::MAX as i32) as i16,
            width: monitor.width.max(1),
            height,
        }
    }
}
