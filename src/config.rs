use crate::{error::Result, CmsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailProviderKind {
    Mailchimp,
    ConstantContact,
}

impl Default for EmailProviderKind {
    fn default() -> Self {
        EmailProviderKind::Mailchimp
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailConfig {
    #[serde(default)]
    pub primary: EmailProviderKind,
    #[serde(default)]
    pub fallback: Option<EmailProviderKind>,
    #[serde(default = "default_auto_fallback")]
    pub auto_fallback: bool,
    #[serde(default)]
    pub mailchimp_api_key: Option<String>,
    /// Data center prefix, e.g. `us21`. Derived from the API key suffix when unset.
    #[serde(default)]
    pub mailchimp_server_prefix: Option<String>,
    #[serde(default)]
    pub mailchimp_list_id: Option<String>,
    #[serde(default)]
    pub constant_contact_access_token: Option<String>,
    #[serde(default)]
    pub constant_contact_list_id: Option<String>,
    /// Maps submitted merge fields (`MESSAGE`, `DEMODATE`) to Constant Contact custom field ids
    #[serde(default)]
    pub constant_contact_custom_fields: BTreeMap<String, String>,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            primary: EmailProviderKind::default(),
            fallback: None,
            auto_fallback: default_auto_fallback(),
            mailchimp_api_key: None,
            mailchimp_server_prefix: None,
            mailchimp_list_id: None,
            constant_contact_access_token: None,
            constant_contact_list_id: None,
            constant_contact_custom_fields: BTreeMap::new(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetsConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub database_path: Option<String>,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

fn default_auto_fallback() -> bool {
    true
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir()
        .ok_or_else(|| CmsError::Internal("Failed to get config directory".to_string()))?;

    path.push("site-cms");
    fs::create_dir_all(&path)?;

    path.push("config.json");
    Ok(path)
}

/// Resolves the SQLite file holding the content store
///
/// Uses `database_path` when configured, otherwise `cms.db` in the user's data directory.
pub fn get_db_path(config: &Config) -> Result<PathBuf> {
    if let Some(path) = config.database_path.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let mut path = dirs::data_dir()
        .ok_or_else(|| CmsError::Internal("Failed to get data directory".to_string()))?;

    path.push("site-cms");
    fs::create_dir_all(&path)?;

    path.push("cms.db");
    Ok(path)
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path()?)
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    if !config_path.exists() {
        let default_config = Config::default();
        save_config_to(config_path, &default_config)?;
        return Ok(default_config);
    }

    let content = fs::read_to_string(config_path)?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| CmsError::Internal(format!("Failed to parse config: {}", e)))?;
    let mut config: Config = serde_json::from_value(value.clone())
        .map_err(|e| CmsError::Internal(format!("Failed to parse config: {}", e)))?;

    let mut changed = false;
    if config.media.max_file_size == 0 {
        config.media.max_file_size = default_max_file_size();
        changed = true;
    }

    // Older config files predate some sections; write them back with defaults filled in.
    let needs_backfill = value
        .as_object()
        .map(|obj| {
            ["email", "sheets", "media"]
                .iter()
                .any(|key| !obj.contains_key(*key))
        })
        .unwrap_or(false);
    if needs_backfill || changed {
        save_config_to(config_path, &config)?;
    }

    Ok(config)
}

pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(&get_config_path()?, config)
}

pub fn save_config_to(config_path: &Path, config: &Config) -> Result<()> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| CmsError::Internal(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(config_path, content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = load_config_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_old_config_is_backfilled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"database_path": "/tmp/site.db"}"#).unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.database_path.as_deref(), Some("/tmp/site.db"));
        assert_eq!(config.media.max_file_size, 5 * 1024 * 1024);
        assert!(config.email.auto_fallback);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"sheets\""));
        assert!(written.contains("\"media\""));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.email.primary = EmailProviderKind::ConstantContact;
        config.email.fallback = Some(EmailProviderKind::Mailchimp);
        config.sheets.api_key = Some("key-123".to_string());
        save_config_to(&path, &config).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_db_path_prefers_configured_value() {
        let config = Config {
            database_path: Some("/var/lib/site/cms.db".to_string()),
            ..Config::default()
        };
        assert_eq!(get_db_path(&config).unwrap(), PathBuf::from("/var/lib/site/cms.db"));
    }
}
