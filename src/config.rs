use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CONFIG_PATH, DEFAULT_TOKEN_FILE, TOKEN_MAX_AGE_SECS,
    VIEW_TRACKING_DEBOUNCE_MS,
};
use crate::error::{Result, RewrappedError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub tracking: TrackingConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub debounce_ms: u64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: VIEW_TRACKING_DEBOUNCE_MS,
        }
    }
}

impl TrackingConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub token_file: PathBuf,
    pub token_max_age_secs: Option<u64>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            token_max_age_secs: Some(TOKEN_MAX_AGE_SECS),
        }
    }
}

impl Config {
    /// Load `rewrapped.toml` (or `$REWRAPPED_CONFIG`), then apply env overrides.
    /// A missing file is not an error; every section has defaults.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("REWRAPPED_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(Path::new(&config_path))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(path).map_err(|e| {
            RewrappedError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("REWRAPPED_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Ok(token_file) = std::env::var("REWRAPPED_TOKEN_FILE") {
            self.auth.token_file = PathBuf::from(token_file);
        }
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.api.base_url.trim();
        if base.is_empty() {
            return Err(RewrappedError::Config("api.base_url must not be empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(RewrappedError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                base
            )));
        }
        if self.api.timeout_seconds == 0 {
            return Err(RewrappedError::Config(
                "api.timeout_seconds must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
