//! Hotkey chords, modifier masks and keysym names

use anyhow::Result;
use std::ops::BitOr;

/// X11 keysym value
pub type Keysym = u32;

/// Keyboard modifier mask, using the core X11 bit layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const LOCK: Self = Self(1 << 1);
    pub const CONTROL: Self = Self(1 << 2);
    /// Usually Alt
    pub const MOD1: Self = Self(1 << 3);
    /// Usually NumLock
    pub const MOD2: Self = Self(1 << 4);
    pub const MOD3: Self = Self(1 << 5);
    pub const MOD4: Self = Self(1 << 6);
    pub const MOD5: Self = Self(1 << 7);

    /// Bits that never change what a chord means
    const IGNORED: u16 = Self::LOCK.0 | Self::MOD2.0;

    /// Build from a raw state mask, dropping pointer-button bits
    pub fn from_state(state: u16) -> Self {
        Self(state & 0x00ff)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    /// The mask with CapsLock and NumLock removed
    pub fn without_locks(self) -> Self {
        Self(self.0 & !Self::IGNORED)
    }

    /// Every lock combination a grab must cover to fire regardless of
    /// CapsLock/NumLock state
    pub fn lock_variants(self) -> [Self; 4] {
        let base = self.without_locks();
        [
            base,
            base | Self::LOCK,
            base | Self::MOD2,
            base | Self::LOCK | Self::MOD2,
        ]
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// What a matched chord asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    Toggle,
    Quit,
}

/// The toggle and quit chords sharing one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkeys {
    pub keysym: Keysym,
    pub toggle: Modifiers,
    pub quit: Modifiers,
}

impl Hotkeys {
    /// Primary modifier toggles, primary + Shift quits
    pub fn new(keysym: Keysym) -> Self {
        Self {
            keysym,
            toggle: Modifiers::MOD1,
            quit: Modifiers::MOD1 | Modifiers::SHIFT,
        }
    }

    /// Build from a key name such as `Tab` or `F9`
    pub fn from_key_name(name: &str) -> Result<Self> {
        let keysym = keysym_from_name(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown hotkey key name '{}'", name))?;
        Ok(Self::new(keysym))
    }

    /// Match a key event. Modifiers must match exactly, ignoring locks.
    pub fn action_for(&self, keysym: Keysym, modifiers: Modifiers) -> Option<HotkeyAction> {
        if keysym != self.keysym {
            return None;
        }

        let modifiers = modifiers.without_locks();
        if modifiers == self.toggle.without_locks() {
            Some(HotkeyAction::Toggle)
        } else if modifiers == self.quit.without_locks() {
            Some(HotkeyAction::Quit)
        } else {
            None
        }
    }

    /// Modifier masks to grab, covering every lock combination of both chords
    pub fn grab_masks(&self) -> Vec<Modifiers> {
        self.toggle
            .lock_variants()
            .into_iter()
            .chain(self.quit.lock_variants())
            .collect()
    }
}

/// Resolve a key name to the keysym found in the first column of the
/// keyboard mapping (letters resolve to their lowercase keysym).
pub fn keysym_from_name(name: &str) -> Option<Keysym> {
    let named = match name {
        "Tab" => Some(0xff09),
        "Return" | "Enter" => Some(0xff0d),
        "Escape" => Some(0xff1b),
        "BackSpace" => Some(0xff08),
        "space" | "Space" => Some(0x0020),
        "grave" => Some(0x0060),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    if let Some(n) = name.strip_prefix('F').and_then(|n| n.parse::<u32>().ok()) {
        return (1..=12).contains(&n).then(|| 0xffbe + n - 1);
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphanumeric() => Some(c.to_ascii_lowercase() as Keysym),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: Keysym = 0xff09;

    #[test]
    fn test_keysym_names() {
        assert_eq!(keysym_from_name("Tab"), Some(TAB));
        assert_eq!(keysym_from_name("F1"), Some(0xffbe));
        assert_eq!(keysym_from_name("F12"), Some(0xffc9));
        assert_eq!(keysym_from_name("Q"), Some('q' as Keysym));
        assert_eq!(keysym_from_name("7"), Some('7' as Keysym));
        assert_eq!(keysym_from_name("F13"), None);
        assert_eq!(keysym_from_name("Hyper"), None);
        assert_eq!(keysym_from_name(""), None);
    }

    #[test]
    fn test_toggle_and_quit_chords() {
        let hotkeys = Hotkeys::new(TAB);
        assert_eq!(
            hotkeys.action_for(TAB, Modifiers::MOD1),
            Some(HotkeyAction::Toggle)
        );
        assert_eq!(
            hotkeys.action_for(TAB, Modifiers::MOD1 | Modifiers::SHIFT),
            Some(HotkeyAction::Quit)
        );
    }

    #[test]
    fn test_extra_modifiers_do_not_match() {
        let hotkeys = Hotkeys::new(TAB);
        assert_eq!(hotkeys.action_for(TAB, Modifiers::NONE), None);
        assert_eq!(hotkeys.action_for(TAB, Modifiers::MOD1 | Modifiers::CONTROL), None);
        assert_eq!(hotkeys.action_for('a' as Keysym, Modifiers::MOD1), None);
    }

    #[test]
    fn test_locks_are_ignored() {
        let hotkeys = Hotkeys::new(TAB);
        let state = Modifiers::MOD1 | Modifiers::LOCK | Modifiers::MOD2;
        assert_eq!(hotkeys.action_for(TAB, state), Some(HotkeyAction::Toggle));
    }

    #[test]
    fn test_pointer_buttons_are_dropped() {
        // Button1 held during the release
        let state = Modifiers::from_state(Modifiers::MOD1.bits() | 0x0100);
        assert_eq!(state, Modifiers::MOD1);
    }

    #[test]
    fn test_grab_masks_cover_locks() {
        let masks = Hotkeys::new(TAB).grab_masks();
        assert_eq!(masks.len(), 8);
        assert!(masks.contains(&(Modifiers::MOD1 | Modifiers::MOD2)));
        assert!(masks.contains(&(Modifiers::MOD1 | Modifiers::SHIFT | Modifiers::LOCK)));
    }

    #[test]
    fn test_unknown_key_name_errors() {
        let err = Hotkeys::from_key_name("Meta_Super").unwrap_err();
        assert!(err.to_string().contains("Meta_Super"));
    }
}
