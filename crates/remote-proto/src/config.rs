use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// External commands; each one pre-navigates the browser to a catalog node.
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Media server connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the media server, e.g. `http://localhost:52199`.
    /// Empty means "not configured yet".
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Quiet window before a typed filter is applied.
    #[serde(default = "default_filter_debounce_ms")]
    pub filter_debounce_ms: u64,
    #[serde(default = "default_artwork_size")]
    pub artwork_width: u32,
    #[serde(default = "default_artwork_size")]
    pub artwork_height: u32,
    /// Hex colour (`#rgb` or `#rrggbb`) the server pads artwork with.
    #[serde(default = "default_fallback_colour")]
    pub fallback_colour: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandConfig {
    pub id: String,
    pub title: String,
    /// Catalog node the browser opens at when this command is selected.
    pub node_id: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            filter_debounce_ms: default_filter_debounce_ms(),
            artwork_width: default_artwork_size(),
            artwork_height: default_artwork_size(),
            fallback_colour: default_fallback_colour(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_filter_debounce_ms() -> u64 {
    500
}

fn default_artwork_size() -> u32 {
    96
}

fn default_fallback_colour() -> String {
    // blue-grey 500
    "#607d8b".to_string()
}

impl ServerConfig {
    pub fn is_valid(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, writing a default config there first if it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    pub fn command(&self, id: &str) -> Option<&CommandConfig> {
        self.commands.iter().find(|c| c.id == id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            server: ServerConfig::default(),
            browser: BrowserConfig::default(),
        }
    }
}
