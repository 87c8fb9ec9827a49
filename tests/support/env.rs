use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

use scan_detect::app_dirs::CONFIG_HOME_ENV;
use scan_detect::config::API_URL_ENV;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points the app directory and the API URL at test values, restoring the
/// previous environment on drop.
pub struct ScanDetectEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl ScanDetectEnvGuard {
    pub fn set(config_home: PathBuf, api_url: Option<&str>) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = vec![
            (CONFIG_HOME_ENV, std::env::var(CONFIG_HOME_ENV).ok()),
            (API_URL_ENV, std::env::var(API_URL_ENV).ok()),
        ];
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var(CONFIG_HOME_ENV, config_home);
            match api_url {
                Some(url) => std::env::set_var(API_URL_ENV, url),
                None => std::env::remove_var(API_URL_ENV),
            }
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for ScanDetectEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
