use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

/// Optional settings from `~/.config/coindo/config.toml`. A missing or
/// invalid file just means defaults, same degradation policy as the store.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub user_name: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Config {
        let Some(path) = dirs::config_dir().map(|dir| dir.join("coindo").join("config.toml"))
        else {
            return Config::default();
        };
        let Ok(data) = fs::read_to_string(&path) else {
            return Config::default();
        };
        match toml::from_str(&data) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "config file is invalid, using defaults");
                Config::default()
            }
        }
    }
}
