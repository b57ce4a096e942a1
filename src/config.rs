use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides `api_base_url` when set.
pub const API_URL_ENV: &str = "CLEAR_MINUTES_API_URL";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend root, e.g. "https://minutes.example.com"
    pub api_base_url: String,
    /// Uploads wait on slow cold-starting backends, so this is long.
    pub upload_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// Period of the cosmetic step indicator on the processing page.
    pub step_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            upload_timeout_secs: 300,
            request_timeout_secs: 30,
            poll_interval_ms: 3000,
            step_interval_ms: 4000,
        }
    }
}

impl Config {
    /// Directory: ~/.config/clear-minutes/
    fn dir() -> PathBuf {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("clear-minutes");
        p
    }

    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from the default location and apply the environment override.
    pub fn load() -> Self {
        let mut config = Self::load_or_create(&Self::path());
        config.apply_env_override(std::env::var(API_URL_ENV).ok());
        config
    }

    /// Load from `path`, returning defaults if the file doesn't exist or is invalid.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid config at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Like [`Config::load_from`], but writes the defaults to `path` on first
    /// run so there is a file to edit.
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::warn!("Failed to write default config to {}: {e}", path.display()),
        }
        config
    }

    pub fn apply_env_override(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            log::info!("Using API base URL from {API_URL_ENV}: {url}");
            self.api_base_url = url.trim().to_string();
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }

    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms.max(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.step_interval(), Duration::from_secs(4));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_base_url: "https://minutes.example.com".into(),
            upload_timeout_secs: 600,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_first_run_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clear-minutes").join("config.json");
        let config = Config::load_or_create(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"poll_interval_ms":1500}"#).unwrap();
        let config = Config::load_or_create(&path);
        assert_eq!(config.poll_interval_ms, 1500);
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"poll_interval_ms":1500}"#);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"api_base_url":"http://10.0.0.2:9000"}"#).unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.api_base_url, "http://10.0.0.2:9000");
        assert_eq!(config.upload_timeout_secs, 300);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env_override(Some(" https://prod.example.com ".into()));
        assert_eq!(config.api_base_url, "https://prod.example.com");

        config.apply_env_override(Some("   ".into()));
        assert_eq!(config.api_base_url, "https://prod.example.com");

        config.apply_env_override(None);
        assert_eq!(config.api_base_url, "https://prod.example.com");
    }
}
