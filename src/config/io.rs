use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app_dirs;

use super::{API_URL_ENV, AppConfig, CONFIG_FILE_NAME, ConfigError, InferenceSettings};

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from disk.
///
/// A missing file yields defaults, which are written out so the user has a
/// file to edit.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    let path = config_path()?;
    if path.exists() {
        return load_from(&path);
    }
    let config = AppConfig::default();
    if let Err(err) = save_to_path(&config, &path) {
        warn!("Could not write default config: {err}");
    } else {
        info!("Wrote default config to {}", path.display());
    }
    Ok(config)
}

/// Parse a TOML config file.
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize the config as TOML and write it to `path`.
pub fn save_to_path(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, text).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the inference settings used for this launch.
///
/// Reads `config.toml`, applies the `SCAN_DETECT_API_URL` override and
/// validates the result. Call once during startup.
pub fn load_inference_settings() -> Result<InferenceSettings, ConfigError> {
    let config = load_or_default()?;
    let settings = config
        .inference
        .with_env_override(std::env::var(API_URL_ENV).ok());
    settings.validate()?;
    info!("Inference endpoint: {}", settings.detect_url());
    Ok(settings)
}
