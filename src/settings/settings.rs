use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub storage: Storage,
    pub poller: Poller,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Api {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub backend: String, // "file" or "memory"
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Poller {
    pub interval_secs: u64,
    pub capacity: usize,
}

impl Poller {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Defaults, then the TOML file, then `STAYLINE__SECTION__KEY` environment overrides.
///
/// The default file may be absent; an explicitly requested one may not.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let required = path.is_some();
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .set_default("api.base_url", "http://127.0.0.1:8000")?
        .set_default("api.timeout_secs", 15)?
        .set_default("storage.backend", "file")?
        .set_default("storage.path", ".stayline/storage.json")?
        .set_default("poller.interval_secs", 5)?
        .set_default("poller.capacity", 20)?
        .set_default("log.filter", "warn")?
        .add_source(File::with_name(path).required(required))
        .add_source(Environment::with_prefix("STAYLINE").separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://travel.example.com\"\n[poller]\ninterval_secs = 2\n",
        )
        .unwrap();

        let settings = parse_settings(path.to_str()).unwrap();
        assert_eq!(settings.api.base_url, "https://travel.example.com");
        assert_eq!(settings.api.timeout_secs, 15);
        assert_eq!(settings.poller.interval(), Duration::from_secs(2));
        assert_eq!(settings.poller.capacity, 20);
        assert_eq!(settings.storage.backend, "file");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        assert!(parse_settings(Some("/nonexistent/stayline.toml")).is_err());
    }
}
