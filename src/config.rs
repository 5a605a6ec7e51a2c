//! Configuration file parser for ~/.config/ultra/config.toml.
//!
//! The config file is optional. A missing or empty file yields
//! `Config::default()`; unknown keys are accepted and logged as warnings.
use crate::feed::HeroMode;
use anyhow::Context as _;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Backend used when neither the CLI, the environment nor the config file
/// names one.
pub const DEFAULT_API_BASE: &str = "http://backend:8000";

/// Environment variables consulted for the API base, in priority order.
pub const API_URL_ENV_VARS: [&str; 2] = ["ULTRA_API_URL", "NEXT_PUBLIC_API_URL"];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level application configuration.
///
/// Every field has a default, so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the news backend (overridden by env and `--api-url`).
    pub api_base_url: Option<String>,

    /// Layout of the first page's lead stories.
    pub hero_mode: HeroMode,

    /// Seconds between carousel slides. Zero falls back to the default.
    pub carousel_interval_secs: u64,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            hero_mode: HeroMode::default(),
            carousel_interval_secs: 6,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] = [
        "api_base_url",
        "hero_mode",
        "carousel_interval_secs",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            // Deleted between metadata and read
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            path = %path.display(),
            hero_mode = ?config.hero_mode,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Carousel rotation period; a zero setting uses the 6 second default.
    pub fn carousel_interval(&self) -> Duration {
        match self.carousel_interval_secs {
            0 => crate::carousel::DEFAULT_INTERVAL,
            secs => Duration::from_secs(secs),
        }
    }
}

/// Get the config directory path (~/.config/ultra/)
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("ultra"))
}

/// Pick the backend base URL: CLI flag, then `ULTRA_API_URL`, then
/// `NEXT_PUBLIC_API_URL`, then the config file, then [`DEFAULT_API_BASE`].
///
/// Blank values at any level are skipped. `env` is the variable lookup,
/// usually `|k| std::env::var(k).ok()`.
pub fn resolve_api_base(
    cli: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    file: Option<&str>,
) -> String {
    let non_blank = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    cli.and_then(non_blank)
        .or_else(|| {
            API_URL_ENV_VARS
                .iter()
                .find_map(|key| env(key).as_deref().and_then(non_blank))
        })
        .or_else(|| file.and_then(non_blank))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("ultra_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_base_url.is_none());
        assert_eq!(config.hero_mode, HeroMode::Carousel);
        assert_eq!(config.carousel_interval(), Duration::from_secs(6));
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/ultra_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.hero_mode, HeroMode::Carousel);
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("whitespace", "   \n  \n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.carousel_interval_secs, 6);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
api_base_url = "https://news.example.com"
hero_mode = "featured_grid"
carousel_interval_secs = 10

[keybindings]
quit = "Ctrl+q"
reload = "F5"
"#;
        let (dir, path) = write_config("full", content);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("https://news.example.com"));
        assert_eq!(config.hero_mode, HeroMode::FeaturedGrid);
        assert_eq!(config.carousel_interval(), Duration::from_secs(10));
        assert_eq!(config.keybindings.get("quit").map(String::as_str), Some("Ctrl+q"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_interval_uses_default() {
        let config = Config {
            carousel_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.carousel_interval(), Duration::from_secs(6));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_hero_mode_is_an_error() {
        let (dir, path) = write_config("bad_mode", "hero_mode = \"spinning\"\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "theme = \"dark\"\nhero_mode = \"single\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.hero_mode, HeroMode::Single);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_api_base_precedence() {
        let env = |key: &str| match key {
            "ULTRA_API_URL" => Some("http://ultra-env".to_string()),
            "NEXT_PUBLIC_API_URL" => Some("http://public-env".to_string()),
            _ => None,
        };
        assert_eq!(
            resolve_api_base(Some("http://cli"), env, Some("http://file")),
            "http://cli"
        );
        assert_eq!(resolve_api_base(None, env, Some("http://file")), "http://ultra-env");

        let public_only = |key: &str| {
            (key == "NEXT_PUBLIC_API_URL").then(|| "http://public-env".to_string())
        };
        assert_eq!(resolve_api_base(None, public_only, None), "http://public-env");

        let no_env = |_: &str| None;
        assert_eq!(resolve_api_base(None, no_env, Some("http://file")), "http://file");
        assert_eq!(resolve_api_base(None, no_env, None), DEFAULT_API_BASE);
    }

    #[test]
    fn test_blank_api_base_values_are_skipped() {
        let blank_env = |_: &str| Some("  ".to_string());
        assert_eq!(resolve_api_base(Some(""), blank_env, Some(" ")), DEFAULT_API_BASE);
    }
}
