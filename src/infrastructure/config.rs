//! Runtime settings: defaults, then `menudeck.toml`, then environment,
//! then command-line flags (applied by the binary).

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "menudeck.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("missing setting: {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Base URL of the data service, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Anonymous access key sent with every request
    pub anon_key: String,
    pub table: String,
    pub request_timeout_secs: u64,
    /// Length of the card exit animation
    pub advance_delay_ms: u64,
    /// Minimum horizontal drag, in terminal columns, that counts as a swipe
    pub swipe_threshold: u32,
    pub currency: String,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            anon_key: String::new(),
            table: "menu_items".into(),
            request_timeout_secs: 15,
            advance_delay_ms: 400,
            swipe_threshold: 10,
            currency: "₽".into(),
            log_file: std::env::temp_dir().join("menudeck.log"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    anon_key: Option<String>,
    table: Option<String>,
    request_timeout_secs: Option<u64>,
    advance_delay_ms: Option<u64>,
    swipe_threshold: Option<u32>,
    currency: Option<String>,
    log_file: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from `path` (which must exist) or from
    /// `menudeck.toml` in the working directory when present, then applies
    /// `MENUDECK_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        match path {
            Some(path) => settings.merge_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings.merge_file(default_path)?;
                }
            }
        }

        settings.apply_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileSettings = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(v) = file.base_url {
            self.base_url = v;
        }
        if let Some(v) = file.anon_key {
            self.anon_key = v;
        }
        if let Some(v) = file.table {
            self.table = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.advance_delay_ms {
            self.advance_delay_ms = v;
        }
        if let Some(v) = file.swipe_threshold {
            self.swipe_threshold = v;
        }
        if let Some(v) = file.currency {
            self.currency = v;
        }
        if let Some(v) = file.log_file {
            self.log_file = v;
        }
        Ok(())
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MENUDECK_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("MENUDECK_ANON_KEY") {
            self.anon_key = v;
        }
        if let Some(v) = lookup("MENUDECK_TABLE") {
            self.table = v;
        }
        if let Some(v) = lookup("MENUDECK_TIMEOUT_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("base_url"));
        }
        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing("anon_key"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}
