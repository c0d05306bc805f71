//! Reduces a frame's pending events to fade and close commands

use super::{HotkeyAction, Hotkeys, InputEvent, Keysym};
use crate::core::{FadeDirection, LoopState};
use crate::platform::Surface;
use anyhow::Result;
use tracing::debug;

/// Apply every hotkey release in `events` to the loop state.
///
/// Visibility is queried from the surface for each chord rather than
/// tracked, so it always reflects the real map state. A release directly
/// followed by a press of the same key is autorepeat and is skipped.
pub fn reduce_events<S: Surface + ?Sized>(
    events: &[InputEvent],
    hotkeys: &Hotkeys,
    state: &mut LoopState,
    surface: &mut S,
) -> Result<()> {
    for (i, event) in events.iter().enumerate() {
        let InputEvent::KeyRelease { keysym, modifiers } = *event else {
            continue;
        };
        if is_repeat(keysym, events.get(i + 1)) {
            continue;
        }
        let Some(action) = hotkeys.action_for(keysym, modifiers) else {
            continue;
        };

        match action {
            HotkeyAction::Toggle => {
                if surface.is_mapped()? {
                    debug!("Toggle: fading out");
                    state.fade.set_direction(FadeDirection::Out);
                } else {
                    debug!("Toggle: mapping and fading in");
                    surface.map_window()?;
                    state.fade.set_direction(FadeDirection::In);
                }
            }
            HotkeyAction::Quit => {
                debug!("Quit requested: fading out before exit");
                state.fade.set_direction(FadeDirection::Out);
                state.request_close();
            }
        }
    }

    Ok(())
}

fn is_repeat(released: Keysym, next: Option<&InputEvent>) -> bool {
    matches!(next, Some(InputEvent::KeyPress { keysym, .. }) if *keysym == released)
}
