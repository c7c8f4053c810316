use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_HEALTH_URL: &str = "http://127.0.0.1:5000/";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3_000;
pub const DEFAULT_ANIMATION_DELAY_MS: u64 = 300;
pub const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_MAX_TOASTS: usize = 5;
pub const THEME_STORAGE_KEY: &str = "habitTracker_theme";
pub const FILTER_STORAGE_KEY: &str = "habitTracker_filter";

/// Process-wide settings. Built once in `main` and handed to whoever needs it;
/// nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppConfig {
    pub api_url: String,
    pub health_url: String,
    pub request_timeout_ms: u64,
    pub toast_duration_ms: u64,
    pub animation_delay_ms: u64,
    pub health_interval_secs: u64,
    pub max_toasts: usize,
    pub export_dir: PathBuf,
    pub theme_storage_key: String,
    pub filter_storage_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            health_url: DEFAULT_HEALTH_URL.into(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            animation_delay_ms: DEFAULT_ANIMATION_DELAY_MS,
            health_interval_secs: DEFAULT_HEALTH_INTERVAL_SECS,
            max_toasts: DEFAULT_MAX_TOASTS,
            export_dir: PathBuf::from("."),
            theme_storage_key: THEME_STORAGE_KEY.into(),
            filter_storage_key: FILTER_STORAGE_KEY.into(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn animation_delay(&self) -> Duration {
        Duration::from_millis(self.animation_delay_ms)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }
}
