//! dockfade constants

/// Program name used for the window title, WM_CLASS and config directory
pub const PROGRAM_NAME: &str = "dockfade";

/// Default target frame rate (frames per second)
pub const DEFAULT_FRAME_RATE: u32 = 30;

/// Default fade rate in progress units per second (0.5 = two second fade)
pub const DEFAULT_FADE_RATE: f32 = 0.5;

/// Default panel height as a fraction of the monitor height
pub const DEFAULT_HEIGHT_FRACTION: f32 = 0.2;

/// Default gradient base color (RGB)
pub const DEFAULT_COLOR: [u8; 3] = [0x2e, 0x86, 0xde];

/// Default hotkey key name
pub const DEFAULT_HOTKEY: &str = "Tab";
