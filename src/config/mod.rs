pub mod actions;
pub mod key;
pub mod keybindings;
pub mod loader;
pub mod resolver;

use std::time::Duration;

pub use actions::*;
use keybindings::KeybindingsConfig;
pub use loader::load;
pub use resolver::KeyResolver;
use serde::{Deserialize, Serialize};

use crate::navigator::cursor::DEFAULT_WINDOW_HEIGHT;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Catppuccin Mocha".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows visible at once.
    pub window_height: usize,
    /// Show disabled secrets in the secrets table.
    pub include_disabled: bool,
    /// Vaults listed in parallel during a refresh.
    pub concurrency: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            window_height: DEFAULT_WINDOW_HEIGHT,
            include_disabled: false,
            concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl ResolverConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse");
        assert_eq!(config.theme.name, "Catppuccin Mocha");
        assert_eq!(config.table.window_height, 10);
        assert!(!config.table.include_disabled);
        assert_eq!(config.resolver.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [table]
            window_height = 20

            [resolver]
            timeout_secs = 5

            [keybindings.global]
            refresh = "F5"
            "#,
        )
        .expect("parse");

        assert_eq!(config.table.window_height, 20);
        assert_eq!(config.table.concurrency, 4);
        assert_eq!(config.resolver.timeout_secs, 5);
        assert_eq!(config.keybindings.global.refresh.display(), "F5");
        assert_eq!(config.keybindings.global.quit.display(), "q");
    }
}
