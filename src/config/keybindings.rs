use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub force_quit: KeyBinding,
    pub refresh: KeyBinding,
    pub toggle_view: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub home: KeyBinding,
    pub end: KeyBinding,
    pub select: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchKeybindings {
    pub start: KeyBinding,
    pub submit: KeyBinding,
    pub cancel: KeyBinding,
    pub clear_filter: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeybindingsConfig {
    #[serde(default)]
    pub global: GlobalKeybindings,
    #[serde(default)]
    pub navigation: NavigationKeybindings,
    #[serde(default)]
    pub search: SearchKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::new(KeyCode::Char('q')).into(),
            force_quit: Key::with_ctrl(KeyCode::Char('c')).into(),
            refresh: Key::new(KeyCode::Char('r')).into(),
            toggle_view: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('x')),
                Key::new(KeyCode::Tab),
            ]),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('k')),
                Key::new(KeyCode::Up),
            ]),
            down: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('j')),
                Key::new(KeyCode::Down),
            ]),
            home: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('g')),
                Key::new(KeyCode::Home),
            ]),
            end: KeyBinding::multiple(vec![
                Key::new(KeyCode::Char('G')),
                Key::new(KeyCode::End),
            ]),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for SearchKeybindings {
    fn default() -> Self {
        Self {
            start: Key::new(KeyCode::Char('/')).into(),
            submit: Key::new(KeyCode::Enter).into(),
            cancel: Key::new(KeyCode::Esc).into(),
            clear_filter: Key::new(KeyCode::Esc).into(),
        }
    }
}
