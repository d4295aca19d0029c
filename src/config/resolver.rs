use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{GlobalAction, NavAction, SearchAction};
use crate::config::keybindings::KeybindingsConfig;

pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::default())
    }
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    // Global actions
    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.matches(event),
            GlobalAction::ForceQuit => kb.force_quit.matches(event),
            GlobalAction::Refresh => kb.refresh.matches(event),
            GlobalAction::ToggleView => kb.toggle_view.matches(event),
        }
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.display(),
            GlobalAction::ForceQuit => kb.force_quit.display(),
            GlobalAction::Refresh => kb.refresh.display(),
            GlobalAction::ToggleView => kb.toggle_view.display(),
        }
    }

    // Navigation actions
    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.matches(event),
            NavAction::Down => kb.down.matches(event),
            NavAction::Home => kb.home.matches(event),
            NavAction::End => kb.end.matches(event),
            NavAction::Select => kb.select.matches(event),
        }
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => kb.up.display(),
            NavAction::Down => kb.down.display(),
            NavAction::Home => kb.home.display(),
            NavAction::End => kb.end.display(),
            NavAction::Select => kb.select.display(),
        }
    }

    // Search actions
    pub fn matches_search(&self, event: &KeyEvent, action: SearchAction) -> bool {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Start => kb.start.matches(event),
            SearchAction::Submit => kb.submit.matches(event),
            SearchAction::Cancel => kb.cancel.matches(event),
            SearchAction::ClearFilter => kb.clear_filter.matches(event),
        }
    }

    pub fn display_search(&self, action: SearchAction) -> String {
        let kb = &self.keybindings.search;
        match action {
            SearchAction::Start => kb.start.display(),
            SearchAction::Submit => kb.submit.display(),
            SearchAction::Cancel => kb.cancel.display(),
            SearchAction::ClearFilter => kb.clear_filter.display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_default_bindings() {
        let resolver = KeyResolver::default();
        assert!(resolver.matches_nav(&key(KeyCode::Char('j')), NavAction::Down));
        assert!(resolver.matches_nav(&key(KeyCode::Down), NavAction::Down));
        assert!(resolver.matches_global(&key(KeyCode::Char('x')), GlobalAction::ToggleView));
        assert!(resolver.matches_global(&key(KeyCode::Tab), GlobalAction::ToggleView));
        assert!(resolver.matches_search(&key(KeyCode::Char('/')), SearchAction::Start));
        assert!(!resolver.matches_global(&key(KeyCode::Char('j')), GlobalAction::Quit));
    }

    #[test]
    fn test_display() {
        let resolver = KeyResolver::default();
        assert_eq!(resolver.display_nav(NavAction::Up), "k/Up");
        assert_eq!(resolver.display_global(GlobalAction::Refresh), "r");
        assert_eq!(resolver.display_search(SearchAction::Start), "/");
        assert_eq!(resolver.display_global(GlobalAction::ForceQuit), "ctrl+c");
    }

    #[test]
    fn test_force_quit_needs_ctrl() {
        let resolver = KeyResolver::default();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(resolver.matches_global(&ctrl_c, GlobalAction::ForceQuit));
        assert!(!resolver.matches_global(&key(KeyCode::Char('c')), GlobalAction::ForceQuit));
        assert!(!resolver.matches_global(&ctrl_c, GlobalAction::Quit));
    }

    #[test]
    fn test_force_quit_rebinding() {
        let keybindings: KeybindingsConfig = toml::from_str(
            r#"
            [global]
            force_quit = ["ctrl+c", "ctrl+d"]
            "#,
        )
        .unwrap();
        let resolver = KeyResolver::new(Arc::new(keybindings));
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(resolver.matches_global(&ctrl_d, GlobalAction::ForceQuit));
        assert!(resolver.matches_global(&key(KeyCode::Char('q')), GlobalAction::Quit));
    }
}
