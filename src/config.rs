use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "CHAT_WIDGET_API_URL";
pub const MOCK_MODE_ENV: &str = "CHAT_WIDGET_MOCK_MODE";

/// Main widget configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the chat backend
    pub api_url: String,

    /// Serve canned replies locally instead of calling the backend
    pub mock_mode: bool,

    /// Where the session token is kept; defaults to `<home>/storage`
    pub storage_dir: Option<PathBuf>,

    /// UI preferences
    pub ui: UiConfig,

    /// Widget home directory
    #[serde(skip)]
    pub home: PathBuf,
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub placeholder: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "AI Assistant".to_string(),
            placeholder: "Type a message...".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chat-widget");

        Config {
            api_url: DEFAULT_API_URL.to_string(),
            mock_mode: true,
            storage_dir: None,
            ui: UiConfig::default(),
            home,
        }
    }
}

impl Config {
    /// Load `~/.chat-widget/config.toml` (if present) and apply environment overrides
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir()
            .context("Could not find home directory")?
            .join(".chat-widget");

        let mut config = Self::load_from(&home.join("config.toml"))?;
        config.home = home;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to `<home>/config.toml`
    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.home).context("Failed to create widget home directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(self.home.join("config.toml"), content)
            .context("Failed to write config file")?;
        Ok(())
    }

    /// Apply the page-global style overrides. Mock mode stays on unless the
    /// variable is explicitly false.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(flag) = lookup(MOCK_MODE_ENV) {
            self.mock_mode = !is_explicit_false(&flag);
        }
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| self.home.join("storage"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.home.join("widget.log")
    }
}

fn is_explicit_false(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_are_local_and_mocked() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert!(config.mock_mode);
        assert_eq!(config.storage_dir(), config.home.join("storage"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "api_url = \"https://chat.example.com\"\nmock_mode = false\n\n[ui]\ntitle = \"Support\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://chat.example.com");
        assert!(!config.mock_mode);
        assert_eq!(config.ui.title, "Support");
        assert_eq!(config.ui.placeholder, UiConfig::default().placeholder);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "mock_mode = \"sometimes\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn env_overrides_url() {
        let mut config = Config::default();
        config.apply_env(env(&[(API_URL_ENV, " https://api.example.com ")]));
        assert_eq!(config.api_url, "https://api.example.com");
        assert!(config.mock_mode);
    }

    #[test]
    fn mock_mode_only_disabled_by_explicit_false() {
        for value in ["false", "FALSE", "0", "no", "off"] {
            let mut config = Config::default();
            config.apply_env(env(&[(MOCK_MODE_ENV, value)]));
            assert!(!config.mock_mode, "{value} should disable mock mode");
        }
        for value in ["true", "1", "", "maybe"] {
            let mut config = Config::default();
            config.mock_mode = false;
            config.apply_env(env(&[(MOCK_MODE_ENV, value)]));
            assert!(config.mock_mode, "{value:?} should enable mock mode");
        }
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.home = tmp.path().to_path_buf();
        config.api_url = "http://10.0.0.5:9000".to_string();
        config.mock_mode = false;
        config.save().unwrap();

        let loaded = Config::load_from(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(loaded.api_url, config.api_url);
        assert!(!loaded.mock_mode);
    }
}
