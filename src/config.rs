use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Completion provider settings
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Completion provider configuration (any OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API key. Environment variables and the credential store take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,
    /// Chat completions URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds (unset = transport default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub theme: ThemeVariant,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    Light,
    Dark,
    /// Follow the desktop colour scheme
    #[default]
    System,
}

impl ThemeVariant {
    /// Next variant in the toggle cycle: light -> dark -> system
    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
            Self::System => Self::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_endpoint() -> String {
    "https://api.deepseek.com/v1/chat/completions".to_string()
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("draftsmith");
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let dir = Self::config_dir()?;

        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(Self::config_dir()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.ai.model, "deepseek-chat");
        assert_eq!(
            config.ai.endpoint,
            "https://api.deepseek.com/v1/chat/completions"
        );
        assert!(config.ai.api_key.is_none());
        assert!(config.ai.timeout_secs.is_none());
        assert_eq!(config.ui.theme, ThemeVariant::System);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [ai]
            api_key = "sk-123"
            model = "gpt-4o-mini"
            endpoint = "https://api.openai.com/v1/chat/completions"
            timeout_secs = 45

            [ui]
            theme = "dark"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.ai.api_key.as_deref(), Some("sk-123"));
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.ai.timeout_secs, Some(45));
        assert_eq!(config.ui.theme, ThemeVariant::Dark);
    }

    #[test]
    fn test_partial_ai_section() {
        let config: Config = toml::from_str("[ai]\nmodel = \"deepseek-reasoner\"").unwrap();
        assert_eq!(config.ai.model, "deepseek-reasoner");
        assert_eq!(
            config.ai.endpoint,
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_theme_cycle() {
        assert_eq!(ThemeVariant::Light.next(), ThemeVariant::Dark);
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::System);
        assert_eq!(ThemeVariant::System.next(), ThemeVariant::Light);
    }

    #[test]
    fn test_serialize_omits_unset_secrets() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!content.contains("api_key"));
        assert!(content.contains("model = \"deepseek-chat\""));
        assert!(content.contains("theme = \"system\""));
    }
}
