use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://fakestoreapi.com";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api_base_url: String,
    pub storage_path: Option<String>,
    pub request_timeout_secs: u64,
    pub toast_duration_ms: u64,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Some(get_user_config_path()), PathBuf::from("storefront.toml"))
    }

    /// Defaults, then the user's global config, then `local` from the CWD, then
    /// `STOREFRONT_*` environment variables.
    pub fn load(user_config_path: Option<PathBuf>, local: PathBuf) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("request_timeout_secs", 10)?
            .set_default("toast_duration_ms", 2000)?
            .set_default("log_level", "info")?;

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(File::from(local).required(false))
            .add_source(Environment::with_prefix("STOREFRONT"))
            .build()?
            .try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    /// Configured storage file with `~` and env vars expanded.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage_path.as_deref().map(expand_path)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(expand_path)
    }
}

pub fn get_user_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("storefront");
    path.push("storefront.toml");
    path
}

/// `<data_dir>/storefront/storefront.log`
pub fn default_log_path() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    path.push("storefront");
    path.push("storefront.log");
    path
}

fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(raw),
    }
}
