//! Configuration types.
//!
//! Configuration lives in `config.toml` under the platform config directory.
//! Every field has a default, so a missing file or a partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Search bar settings
    #[serde(default)]
    pub search: SearchBarConfig,

    /// Topic list settings
    #[serde(default)]
    pub topics: TopicListConfig,
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Load the user's configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }
}

/// Search bar configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchBarConfig {
    /// Render the query as removable pills instead of plain text.
    pub search_pills_enabled: bool,

    /// Delay before re-checking button state after the box loses focus.
    pub blur_recheck_delay_ms: u64,

    /// Selectors for the page elements the controller binds to.
    pub selectors: ElementSelectors,
}

impl SearchBarConfig {
    /// The blur recheck delay as a `Duration`.
    pub fn blur_recheck_delay(&self) -> Duration {
        Duration::from_millis(self.blur_recheck_delay_ms)
    }
}

impl Default for SearchBarConfig {
    fn default() -> Self {
        Self {
            search_pills_enabled: false,
            blur_recheck_delay_ms: 100,
            selectors: ElementSelectors::default(),
        }
    }
}

/// Selectors for the search bar's page elements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElementSelectors {
    pub query_box: String,
    pub form: String,
    pub searchbox: String,
    pub close_button: String,
    /// Container the typeahead menu is attached to.
    pub typeahead_parent: String,
}

impl Default for ElementSelectors {
    fn default() -> Self {
        Self {
            query_box: "#search_query".to_string(),
            form: "#searchbox_form".to_string(),
            searchbox: "#searchbox".to_string(),
            close_button: ".search_close_button".to_string(),
            typeahead_parent: "#searchbox_legacy".to_string(),
        }
    }
}

/// Topic list configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TopicListConfig {
    /// Maximum number of topics shown per stream.
    pub max_topics: usize,
}

impl Default for TopicListConfig {
    fn default() -> Self {
        Self { max_topics: 5 }
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("narrowbar"))
}

/// Get the path to config.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(!config.search.search_pills_enabled);
        assert_eq!(config.search.blur_recheck_delay(), Duration::from_millis(100));
        assert_eq!(config.search.selectors.query_box, "#search_query");
        assert_eq!(config.topics.max_topics, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r##"
            [search]
            search_pills_enabled = true

            [search.selectors]
            close_button = "#close"
            "##,
        )
        .unwrap();

        assert!(config.search.search_pills_enabled);
        assert_eq!(config.search.blur_recheck_delay_ms, 100);
        assert_eq!(config.search.selectors.close_button, "#close");
        assert_eq!(config.search.selectors.form, "#searchbox_form");
        assert_eq!(config.topics, TopicListConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = AppConfig::from_toml_str("[topics]\nmax_topics = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[topics]\nmax_topics = 8").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.topics.max_topics, 8);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
