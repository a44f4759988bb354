//! Keyboard input state
//!
//! The host feeds key transitions in; gameplay code polls [`KeyState`]
//! during its update.

use std::collections::HashSet;

/// Held-key tracker
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed: HashSet<KeyCode>,
}

impl KeyState {
    /// Create with no keys held
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition
    pub fn set(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.pressed.insert(key);
        } else {
            self.pressed.remove(&key);
        }
    }

    /// Whether `key` is currently held
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Release every key
    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Space key
    Space,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}

impl KeyCode {
    /// Map a host key name (`"w"`, `"ArrowUp"`, ...) to a key code
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "w" => Self::W,
            "a" => Self::A,
            "s" => Self::S,
            "d" => Self::D,
            " " | "space" => Self::Space,
            "enter" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            "arrowup" | "up" => Self::Up,
            "arrowdown" | "down" => Self::Down,
            "arrowleft" | "left" => Self::Left,
            "arrowright" | "right" => Self::Right,
            _ => return None,
        };
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut keys = KeyState::new();
        keys.set(KeyCode::W, true);
        keys.set(KeyCode::A, true);
        keys.set(KeyCode::W, false);
        assert!(!keys.is_pressed(KeyCode::W));
        assert!(keys.is_pressed(KeyCode::A));
        keys.clear();
        assert!(!keys.is_pressed(KeyCode::A));
    }

    #[test]
    fn test_key_names_are_case_insensitive() {
        assert_eq!(KeyCode::from_name("W"), Some(KeyCode::W));
        assert_eq!(KeyCode::from_name("ArrowLeft"), Some(KeyCode::Left));
        assert_eq!(KeyCode::from_name("F13"), None);
    }
}
