//! Key chords as written in the config file (`q`, `ctrl+c`, `shift+Tab`, `F5`).

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Key {
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn with_ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        match (self.code, event.code) {
            // Terminals disagree on whether uppercase letters also carry SHIFT,
            // so compare characters exactly and ignore SHIFT.
            (KeyCode::Char(a), KeyCode::Char(b)) => {
                a == b
                    && (self.modifiers - KeyModifiers::SHIFT)
                        == (event.modifiers - KeyModifiers::SHIFT)
            }
            _ => self.code == event.code && self.modifiers == event.modifiers,
        }
    }

    pub fn display(&self) -> String {
        self.to_string()
    }
}

fn parse_modifier(name: &str) -> Result<KeyModifiers, String> {
    match name.to_lowercase().as_str() {
        "ctrl" | "control" => Ok(KeyModifiers::CONTROL),
        "alt" => Ok(KeyModifiers::ALT),
        "shift" => Ok(KeyModifiers::SHIFT),
        _ => Err(format!("Unknown modifier: {name}")),
    }
}

fn parse_code(name: &str) -> Result<KeyCode, String> {
    let lower = name.to_lowercase();
    let code = match lower.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        f if f.len() > 1 && f.starts_with('f') => f[1..]
            .parse()
            .map(KeyCode::F)
            .map_err(|_| format!("Invalid function key: {name}"))?,
        _ => {
            // Single characters keep their case: `G` and `g` are different keys.
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(format!("Unknown key: {name}")),
            }
        }
    };
    Ok(code)
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // A lone "+" is the plus key, not a separator.
        let (prefix, key_part) = match s.rsplit_once('+') {
            Some((prefix, key)) if !key.is_empty() => (Some(prefix), key),
            _ => (None, s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in prefix.into_iter().flat_map(|p| p.split('+')) {
            modifiers |= parse_modifier(part)?;
        }

        Ok(Self {
            code: parse_code(key_part)?,
            modifiers,
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift+")?;
        }

        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Esc => f.write_str("Esc"),
            KeyCode::Tab => f.write_str("Tab"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Delete => f.write_str("Delete"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PageUp"),
            KeyCode::PageDown => f.write_str("PageDown"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            _ => f.write_str("?"),
        }
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One key or a list of alternatives bound to the same action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyBinding {
    Single(Key),
    Multiple(Vec<Key>),
}

impl KeyBinding {
    pub const fn multiple(keys: Vec<Key>) -> Self {
        Self::Multiple(keys)
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        match self {
            Self::Single(key) => key.matches(event),
            Self::Multiple(keys) => keys.iter().any(|k| k.matches(event)),
        }
    }

    pub fn display(&self) -> String {
        match self {
            Self::Single(key) => key.display(),
            Self::Multiple(keys) => keys.iter().map(Key::display).collect::<Vec<_>>().join("/"),
        }
    }
}

impl From<Key> for KeyBinding {
    fn from(key: Key) -> Self {
        Self::Single(key)
    }
}
