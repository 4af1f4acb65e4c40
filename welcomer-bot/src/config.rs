// ABOUTME: Configuration file loading, validation, and hierarchical merging for the welcomer bot
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use welcomer_core::constants::text as text_defaults;

const DEFAULT_FRAMES_DIR: &str = "ImageFrames";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Gateway credential; `DISCORD_TOKEN` in the environment wins.
    #[serde(default)]
    pub bot_token: Option<SecretString>,
    /// Gates whether the welcome handler is registered at all.
    #[serde(default)]
    pub welcomer_module: bool,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub fallback_channel_id: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_id")]
    pub role_id: Option<u64>,
    #[serde(default)]
    pub welcome_font: Option<PathBuf>,
    #[serde(default)]
    pub frames_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        Self::load_from_paths(&paths.iter().map(|p| p.as_str()).collect::<Vec<_>>())
    }

    /// Load configuration from file paths, lowest precedence first
    pub fn load_from_paths(paths: &[&str]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            // Apply in order - later paths override earlier ones
            if let Ok(file_config) = Self::load_from_file(path) {
                config = config.merge(file_config);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Standard config file paths, lowest precedence first
    pub fn get_config_paths() -> Vec<String> {
        let mut paths = Vec::new();

        // 1. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            let path = home_dir
                .join(".config")
                .join("welcomer")
                .join("config.toml");
            paths.push(path.to_string_lossy().to_string());
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join("welcomer")
                .join("config.toml");
            paths.push(path.to_string_lossy().to_string());
        }

        // 3. Project-local config (highest precedence)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(
                current_dir
                    .join("welcomer.toml")
                    .to_string_lossy()
                    .to_string(),
            );
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            bot_token: other.bot_token.or(self.bot_token),
            welcomer_module: self.welcomer_module || other.welcomer_module,
            fallback_channel_id: other.fallback_channel_id.or(self.fallback_channel_id),
            role_id: other.role_id.or(self.role_id),
            welcome_font: other.welcome_font.or(self.welcome_font),
            frames_dir: other.frames_dir.or(self.frames_dir),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if self.fallback_channel_id == Some(0) {
            return Err(anyhow!("fallback_channel_id must be a non-zero channel id"));
        }
        if self.role_id == Some(0) {
            return Err(anyhow!("role_id must be a non-zero role id"));
        }
        Ok(())
    }

    /// Gateway token: the `DISCORD_TOKEN` environment variable overrides
    /// the configuration file.
    pub fn resolve_token(&self) -> Result<SecretString> {
        if let Ok(token) = std::env::var("DISCORD_TOKEN") {
            return Ok(SecretString::from(token));
        }
        self.bot_token
            .clone()
            .ok_or_else(|| anyhow!("no bot token in configuration or DISCORD_TOKEN"))
    }

    pub fn welcome_font(&self) -> PathBuf {
        self.welcome_font
            .clone()
            .unwrap_or_else(|| PathBuf::from(text_defaults::DEFAULT_FONT_PATH))
    }

    pub fn frames_dir(&self) -> PathBuf {
        self.frames_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FRAMES_DIR))
    }
}

// Snowflake ids arrive as integers from hand-written TOML but as strings
// when copied out of the platform UI; accept both.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Number(u64),
        Text(String),
    }

    let value: Option<IdRepr> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(IdRepr::Number(id)) => Ok(Some(id)),
        Some(IdRepr::Text(text)) => text.trim().parse::<u64>().map(Some).map_err(|_| {
            D::Error::custom(format!(
                "Invalid id '{}'. Expected an unsigned integer",
                text
            ))
        }),
    }
}
