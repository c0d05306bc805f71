//! Keycode ↔ keysym lookup from the server keyboard mapping

use crate::input::Keysym;

/// Keysym returned for keycodes with nothing bound
const NO_SYMBOL: Keysym = 0;

/// Snapshot of `GetKeyboardMapping`, consulted in its first column only
#[derive(Debug, Clone)]
pub struct KeyboardMap {
    min_keycode: u8,
    keysyms_per_keycode: u8,
    keysyms: Vec<Keysym>,
}

impl KeyboardMap {
    pub fn new(min_keycode: u8, keysyms_per_keycode: u8, keysyms: Vec<Keysym>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode,
            keysyms,
        }
    }

    /// Unshifted keysym for a keycode
    pub fn keysym(&self, keycode: u8) -> Keysym {
        let Some(offset) = keycode.checked_sub(self.min_keycode) else {
            return NO_SYMBOL;
        };
        self.keysyms
            .get(offset as usize * self.keysyms_per_keycode as usize)
            .copied()
            .unwrap_or(NO_SYMBOL)
    }

    /// Every keycode whose unshifted keysym is `keysym`
    pub fn keycodes_for(&self, keysym: Keysym) -> Vec<u8> {
        if self.keysyms_per_keycode == 0 || keysym == NO_SYMBOL {
            return Vec::new();
        }

        self.keysyms
            .chunks(self.keysyms_per_keycode as usize)
            .enumerate()
            .filter(|(_, row)| row[0] == keysym)
            .filter_map(|(i, _)| u8::try_from(i + self.min_keycode as usize).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAB: Keysym = 0xff09;
    const ISO_LEFT_TAB: Keysym = 0xfe20;

    fn sample() -> KeyboardMap {
        // keycodes 8..=11, two columns each
        KeyboardMap::new(
            8,
            2,
            vec![
                'a' as Keysym, 'A' as Keysym,
                TAB, ISO_LEFT_TAB,
                0, 0,
                TAB, 0,
            ],
        )
    }

    #[test]
    fn test_keysym_uses_first_column() {
        let map = sample();
        assert_eq!(map.keysym(8), 'a' as Keysym);
        assert_eq!(map.keysym(9), TAB);
    }

    #[test]
    fn test_out_of_range_keycodes() {
        let map = sample();
        assert_eq!(map.keysym(7), NO_SYMBOL);
        assert_eq!(map.keysym(200), NO_SYMBOL);
    }

    #[test]
    fn test_keycodes_for_finds_all_bindings() {
        let map = sample();
        assert_eq!(map.keycodes_for(TAB), vec![9, 11]);
        assert!(map.keycodes_for(ISO_LEFT_TAB).is_empty());
        assert!(map.keycodes_for(NO_SYMBOL).is_empty());
    }
}
