use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_FILTER: &str = "roster_core=info,roster_tui=info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Log destination. Defaults to `<cache dir>/roster/roster.log`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    /// UI refresh interval in milliseconds.
    pub tick_ms: u64,
    /// Route shown at startup.
    pub initial_route: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
            tick_ms: 100,
            initial_route: "/".to_string(),
        }
    }
}

impl Config {
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("roster");
        Ok(config_dir.join("config.json"))
    }

    /// Config file (if any) with environment overrides applied.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Could not parse config file {}", path.display()))?;

        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(filter) = lookup("ROSTER_LOG") {
            self.log_filter = filter;
        }
        if let Some(file) = lookup("ROSTER_LOG_FILE") {
            self.log_file = Some(PathBuf::from(file));
        }
        if let Some(tick) = lookup("ROSTER_TICK_MS") {
            self.tick_ms = tick
                .parse()
                .with_context(|| format!("ROSTER_TICK_MS must be a number, got '{}'", tick))?;
        }
        Ok(())
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.log_file {
            return Ok(path.clone());
        }
        let cache_dir = dirs::cache_dir().context("Could not find cache directory")?;
        Ok(cache_dir.join("roster").join("roster.log"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "tick_ms": 250 }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tick_ms, 250);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.initial_route, "/");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ROSTER_LOG", "debug"),
            ("ROSTER_LOG_FILE", "/tmp/roster-test.log"),
            ("ROSTER_TICK_MS", "50"),
        ]);
        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.tick_ms, 50);
        assert_eq!(config.log_path().unwrap(), PathBuf::from("/tmp/roster-test.log"));
    }

    #[test]
    fn bad_tick_override_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "ROSTER_TICK_MS").then(|| "fast".to_string())
        });
        assert!(result.is_err());
    }
}
