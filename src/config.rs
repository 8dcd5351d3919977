use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub server_url: Option<String>,
    pub mode: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            server_url: None,
            mode: None,
        }
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn save_mode(mode: &str) -> Result<()> {
        let config_path = Self::get_config_path()?;
        Self::save_mode_to(&config_path, mode)
    }

    pub fn save_mode_to(path: &Path, mode: &str) -> Result<()> {
        let mut config = Self::load_from(path).unwrap_or_else(|_| Self::new());
        config.mode = Some(mode.to_string());
        config.save_to(path)
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("chat-cli").join("config.json"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.server_url.is_none());
        assert!(config.mode.is_none());
    }

    #[test]
    fn save_creates_parent_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat-cli").join("config.json");

        let config = Config {
            server_url: Some("http://example.com:5000".to_string()),
            mode: Some("multi".to_string()),
        };
        config.save_to(&path).unwrap();
        assert!(path.exists());

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.server_url.as_deref(), Some("http://example.com:5000"));
        assert_eq!(loaded.mode.as_deref(), Some("multi"));
    }

    #[test]
    fn toggled_mode_is_persisted_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        // First toggle creates the file.
        Config::save_mode_to(&path, "multi").unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.mode.as_deref(), Some("multi"));

        // A later toggle overwrites the mode but keeps other settings.
        let config = Config {
            server_url: Some("http://example.com:5000".to_string()),
            mode: Some("multi".to_string()),
        };
        config.save_to(&path).unwrap();
        Config::save_mode_to(&path, "single").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.mode.as_deref(), Some("single"));
        assert_eq!(loaded.server_url.as_deref(), Some("http://example.com:5000"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
