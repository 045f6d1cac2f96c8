//! Runtime configuration: optional `config/medstock.toml`, overridden by `MEDSTOCK__*`
//! environment variables (e.g. `MEDSTOCK__SHEETS__API_KEY`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "config/medstock.toml";
const ENV_PREFIX: &str = "MEDSTOCK";

/// Connection settings for the spreadsheet store.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SheetsConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub sheet_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            sheet_id: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SheetsConfig {
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.sheet_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InventoryConfig {
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Capacity of the command channel in front of the inventory actor.
    #[serde(default = "default_actor_buffer")]
    pub actor_buffer: usize,
    /// How many times a read-modify-write is re-run after a concurrent modification.
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,
    /// Where the file-backed session store lives. `None` keeps the session in memory.
    #[serde(default)]
    pub session_path: Option<PathBuf>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            sheets: SheetsConfig::default(),
            actor_buffer: default_actor_buffer(),
            max_conflict_retries: default_max_conflict_retries(),
            session_path: None,
        }
    }
}

fn default_base_url() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_actor_buffer() -> usize {
    32
}

fn default_max_conflict_retries() -> u32 {
    3
}

impl InventoryConfig {
    /// Loads `config/medstock.toml` (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads `path` (if present) and the environment; the environment wins.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        settings.try_deserialize::<InventoryConfig>().map_err(|e| {
            ConfigError::Message(format!(
                "Inventory configuration could not be loaded from {} or environment: {e}",
                path.display()
            ))
        })
    }

    /// Fills empty configured credentials from values remembered in the session.
    pub fn with_session_credentials(
        mut self,
        api_key: Option<String>,
        sheet_id: Option<String>,
    ) -> Self {
        if self.sheets.api_key.trim().is_empty() {
            if let Some(key) = api_key {
                self.sheets.api_key = key;
            }
        }
        if self.sheets.sheet_id.trim().is_empty() {
            if let Some(id) = sheet_id {
                self.sheets.sheet_id = id;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_sources() {
        let config = InventoryConfig::load_from(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.sheets.base_url, "https://sheets.googleapis.com/v4/spreadsheets");
        assert_eq!(config.sheets.timeout_secs, 30);
        assert_eq!(config.actor_buffer, 32);
        assert_eq!(config.max_conflict_retries, 3);
    }

    #[test]
    fn test_file_values_are_read() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "max_conflict_retries = 5\n\n[sheets]\napi_key = \"abc\"\nsheet_id = \"sheet-9\"\ntimeout_secs = 5"
        )
        .unwrap();

        let config = InventoryConfig::load_from(file.path()).unwrap();
        assert_eq!(config.sheets.api_key, "abc");
        assert_eq!(config.sheets.sheet_id, "sheet-9");
        assert_eq!(config.sheets.timeout_secs, 5);
        assert_eq!(config.max_conflict_retries, 5);
        assert!(config.sheets.has_credentials());
    }

    #[test]
    fn test_session_credentials_fill_only_empty_values() {
        let mut config = InventoryConfig::default();
        config.sheets.sheet_id = "configured".into();

        let merged = config.with_session_credentials(Some("from-session".into()), Some("other".into()));
        assert_eq!(merged.sheets.api_key, "from-session");
        assert_eq!(merged.sheets.sheet_id, "configured");
    }
}
