//! Runtime configuration.
//!
//! Defaults, then an optional TOML file named by `POKESCOUT_CONFIG`, then
//! environment overrides (`HOST`, `PORT`, `POKEAPI_BASE_URL`, `DATABASE_URL`,
//! `POKEMON_LIST`, `SYNC_ON_STARTUP`, `FETCH_TIMEOUT_SECS`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "POKESCOUT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {var}: {value:?}")]
    InvalidVar { var: &'static str, value: String },

    #[error("fetch_timeout_secs must be at least 1")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub pokeapi_base_url: String,
    pub database_url: String,
    /// Names synced at startup and by `POST /refresh`, in order.
    pub pokemon_list: Vec<String>,
    pub sync_on_startup: bool,
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            pokeapi_base_url: "https://pokeapi.co/api/v2".to_string(),
            database_url: "sqlite://pokemon.db".to_string(),
            // "terodactyl" is corrected to "aerodactyl" by the service.
            pokemon_list: ["pikachu", "dhelmise", "charizard", "parasect", "terodactyl", "kingler"]
                .into_iter()
                .map(String::from)
                .collect(),
            sync_on_startup: true,
            fetch_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidVar { var: "PORT", value: port })?;
        }
        if let Some(url) = lookup("POKEAPI_BASE_URL") {
            self.pokeapi_base_url = url;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(list) = lookup("POKEMON_LIST") {
            self.pokemon_list = list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(flag) = lookup("SYNC_ON_STARTUP") {
            self.sync_on_startup = parse_bool(&flag).ok_or_else(|| ConfigError::InvalidVar {
                var: "SYNC_ON_STARTUP",
                value: flag,
            })?;
        }
        if let Some(secs) = lookup("FETCH_TIMEOUT_SECS") {
            self.fetch_timeout_secs = secs.trim().parse().map_err(|_| ConfigError::InvalidVar {
                var: "FETCH_TIMEOUT_SECS",
                value: secs,
            })?;
        }
        self.validate()
    }

    /// A zero timeout would fail every upstream fetch.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
