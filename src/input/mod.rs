//! Input handling - hotkey chords and per-frame event reduction

pub mod hotkey;
pub mod reducer;

pub use hotkey::{HotkeyAction, Hotkeys, Keysym, Modifiers};
pub use reducer::reduce_events;

/// Platform-neutral input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPress { keysym: Keysym, modifiers: Modifiers },
    KeyRelease { keysym: Keysym, modifiers: Modifiers },
    /// Anything else the platform reported
    Other,
}
