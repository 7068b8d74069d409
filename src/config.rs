use std::env;
use std::fs;
use std::path::Path;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::Coordinates;

pub const DEFAULT_CONFIG_PATH: &str = "config/board.json";

pub const STORE_URL_VAR: &str = "SUPABASE_URL";
pub const STORE_KEY_VAR: &str = "SUPABASE_ANON_KEY";

const DEFAULT_TABLE: &str = "messages";
const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const DEFAULT_ATTRIBUTION: &str = "© OpenStreetMap contributors";
const DEFAULT_IP_LOCATOR: &str = "https://ipapi.co/json/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },
}

/// Endpoint and public key of the hosted message table.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: Url,
    pub anon_key: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let raw_url = required(STORE_URL_VAR)?;
        let anon_key = required(STORE_KEY_VAR)?;

        let base_url = Url::parse(&raw_url).map_err(|err| ConfigError::InvalidUrl {
            var: STORE_URL_VAR,
            reason: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl {
                var: STORE_URL_VAR,
                reason: "not a base URL".to_string(),
            });
        }

        Ok(Self { base_url, anon_key })
    }
}

/// Where the startup position fix comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeolocationSource {
    Ip { endpoint: String },
    Fixed { lat: f64, lng: f64 },
    Disabled,
}

impl Default for GeolocationSource {
    fn default() -> Self {
        GeolocationSource::Ip {
            endpoint: DEFAULT_IP_LOCATOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub table: String,
    pub tile_url: String,
    pub attribution: String,
    pub initial_zoom: u8,
    pub fallback_center: Coordinates,
    pub geolocation: GeolocationSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            tile_url: DEFAULT_TILE_URL.to_string(),
            attribution: DEFAULT_ATTRIBUTION.to_string(),
            initial_zoom: 2,
            fallback_center: Coordinates::new(20.0, 0.0),
            geolocation: GeolocationSource::default(),
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}
