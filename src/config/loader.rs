use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::AppConfig;

const CONFIG_DIR: &str = "discretion";
const CONFIG_FILE: &str = "config.toml";

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// Load the config from `path`, or the default location when `None`.
pub fn load(path: Option<&Path>) -> color_eyre::Result<AppConfig> {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
        debug!("No config directory found, using defaults");
        return Ok(AppConfig::default());
    };

    if !path.exists() {
        debug!(path = %path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config: AppConfig = toml::from_str(&content)?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("discretion-test-does-not-exist.toml");
        let config = load(Some(&path)).expect("defaults");
        assert_eq!(config.table.window_height, 10);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("discretion-{}.toml", std::process::id()));
        fs::write(&path, "[table]\ninclude_disabled = true\n").expect("write");

        let config = load(Some(&path)).expect("load");
        let _ = fs::remove_file(&path);

        assert!(config.table.include_disabled);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let path =
            std::env::temp_dir().join(format!("discretion-bad-{}.toml", std::process::id()));
        fs::write(&path, "[table\n").expect("write");

        let result = load(Some(&path));
        let _ = fs::remove_file(&path);

        assert!(result.is_err());
    }
}
