use crate::error::{LinewatchError, LinewatchResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "linewatch.toml";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the factory backend, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Seconds between status polls.
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> LinewatchResult<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&raw)?;
        if cfg.poll_interval_secs == 0 {
            return Err(LinewatchError::config(
                "poll_interval_secs must be at least 1",
            ));
        }
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> LinewatchResult<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| LinewatchError::config(e.to_string()))?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Loads the config file, writing out the defaults on first run.
    pub fn load_or_create(path: &Path) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(_) => {
                let def = Config::default();
                let _ = def.save(path);
                def
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linewatch.toml");

        let cfg = Config {
            base_url: "http://factory.local:9000".into(),
            poll_interval_secs: 10,
        };
        cfg.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.base_url, "http://factory.local:9000");
        assert_eq!(loaded.poll_interval_secs, 10);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linewatch.toml");

        let cfg = Config::load_or_create(&path);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linewatch.toml");
        fs::write(&path, "base_url = \"http://10.0.0.2:8000\"\n").unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.base_url, "http://10.0.0.2:8000");
        assert_eq!(cfg.poll_interval_secs, DEFAULT_POLL_INTERVAL_SECS);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linewatch.toml");
        fs::write(&path, "poll_interval_secs = 0\n").unwrap();

        assert!(Config::load(&path).is_err());
    }
}
