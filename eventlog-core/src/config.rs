//! Client configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{EventLogError, EventLogResult};
use crate::photo::PhotoRules;

static DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn is_default_photo_rules(rules: &PhotoRules) -> bool {
    *rules == PhotoRules::default()
}

/// Configuration at ~/.config/eventlog/config.toml
///
/// Every key can be overridden with an `EVENTLOG_`-prefixed environment
/// variable, e.g. `EVENTLOG_API_BASE_URL`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// ID token issued by the identity provider for the signed-in user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    #[serde(default, skip_serializing_if = "is_default_photo_rules")]
    pub photos: PhotoRules,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_base_url: default_api_base_url(),
            id_token: None,
            photos: PhotoRules::default(),
        }
    }
}

impl ClientConfig {
    pub fn config_path() -> EventLogResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EventLogError::Config("Could not determine config directory".into()))?
            .join("eventlog");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented template first if missing.
    pub fn load() -> EventLogResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> EventLogResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("EVENTLOG"))
            .build()
            .map_err(|e| EventLogError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EventLogError::Config(e.to_string()))
    }

    pub fn save_to(&self, path: &Path) -> EventLogResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| EventLogError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)
            .map_err(|e| EventLogError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> EventLogResult<()> {
        let contents = format!(
            "\
# eventlog configuration

# Backend serving /api/events:
# api_base_url = \"{}\"

# ID token of the signed-in user (sent as the `token` cookie):
# id_token = \"...\"

# Photo upload constraints:
# [photos]
# max_upload_bytes = 31457280
# accepted_file_types = [\"image/jpeg\", \"image/png\"]
",
            DEFAULT_API_BASE_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EventLogError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| EventLogError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::MAX_UPLOAD_SIZE;

    #[test]
    fn test_default_template_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eventlog").join("config.toml");

        ClientConfig::create_default_config(&path).unwrap();
        let config = ClientConfig::load_from(&path).unwrap();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.id_token, None);
        assert_eq!(config.photos.max_upload_bytes, MAX_UPLOAD_SIZE);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.photos, PhotoRules::default());
    }

    #[test]
    fn test_partial_photo_table_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://events.example\"\n\n[photos]\nmax_upload_bytes = 1024\n",
        )
        .unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.api_base_url, "https://events.example");
        assert_eq!(config.photos.max_upload_bytes, 1024);
        assert_eq!(config.photos.accepted_file_types, PhotoRules::default().accepted_file_types);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = ClientConfig {
            api_base_url: "https://events.example".to_string(),
            id_token: Some("jwt".to_string()),
            photos: PhotoRules::default(),
        };
        config.save_to(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("[photos]"));
        assert_eq!(ClientConfig::load_from(&path).unwrap(), config);
    }
}
