//! Persisted application settings (TOML) and the startup resolution of the
//! inference endpoint.

mod io;


use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{app_dirs, http_client::Timeouts};

pub use io::{config_path, load_from, load_inference_settings, load_or_default, save_to_path};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that replaces the configured inference base URL.
pub const API_URL_ENV: &str = "SCAN_DETECT_API_URL";
/// Base URL used when neither the config file nor the environment set one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Path of the detection route relative to the base URL.
pub const DETECT_PATH: &str = "/detect";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Aggregate settings loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub inference: InferenceSettings,
}

/// Where and how to reach the external inference service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceSettings {
    /// Scheme, host and optional path prefix of the service, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds allowed for establishing a connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Seconds allowed per socket read. Absent means wait until the service answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_timeout_secs: Option<u64>,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: None,
        }
    }
}

impl InferenceSettings {
    /// Replace the base URL with a non-blank environment value.
    pub fn with_env_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.map(|url| url.trim().to_string()) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    /// Check that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(self.base_url.trim()).map_err(|err| {
            ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: err.to_string(),
            }
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme `{other}`"),
            }),
        }
    }

    /// Full URL of the detection route.
    pub fn detect_url(&self) -> String {
        format!("{}{DETECT_PATH}", self.base_url.trim().trim_end_matches('/'))
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            read: self.read_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// Errors that may occur while loading or saving app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The app directory could not be resolved or created.
    #[error("Config directory unavailable: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config for {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// The inference base URL is unusable.
    #[error("Invalid inference base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
