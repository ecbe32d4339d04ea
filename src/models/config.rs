//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote task-listing endpoint settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Polling interval policy
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Credential bundle loading
    #[serde(default)]
    pub auth: AuthConfig,

    /// Notification dispatch settings
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.base_url)
            .map_err(|e| AppError::config(format!("source.base_url is invalid: {e}")))?;
        if self.source.categories.is_empty() {
            return Err(AppError::config("source.categories is empty"));
        }
        if self.source.page_size == 0 {
            return Err(AppError::config("source.page_size must be > 0"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::config("source.timeout_secs must be > 0"));
        }
        if self.schedule.peak_start_hour >= 24 || self.schedule.peak_end_hour > 24 {
            return Err(AppError::config("schedule hours must be within 0-24"));
        }
        if self.schedule.peak_start_hour >= self.schedule.peak_end_hour {
            return Err(AppError::config(
                "schedule.peak_start_hour must be before peak_end_hour",
            ));
        }
        if self.schedule.peak_interval_secs == 0 || self.schedule.off_peak_interval_secs == 0 {
            return Err(AppError::config("schedule intervals must be > 0"));
        }
        if self.auth.env_var.trim().is_empty() {
            return Err(AppError::config("auth.env_var is empty"));
        }
        Ok(())
    }
}

/// Remote task-listing endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Task list endpoint URL
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Categories (task types) to monitor each cycle
    #[serde(default = "defaults::categories")]
    pub categories: Vec<u32>,

    /// Page size for the first (and only) results page
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            categories: defaults::categories(),
            page_size: defaults::page_size(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Polling interval policy.
///
/// The peak window is a left-closed, right-open hour range in 24-hour
/// local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// First hour of the peak window (inclusive)
    #[serde(default = "defaults::peak_start")]
    pub peak_start_hour: u32,

    /// End hour of the peak window (exclusive)
    #[serde(default = "defaults::peak_end")]
    pub peak_end_hour: u32,

    /// Interval between cycles during the peak window, in seconds
    #[serde(default = "defaults::peak_interval")]
    pub peak_interval_secs: u64,

    /// Interval between cycles outside the peak window, in seconds
    #[serde(default = "defaults::off_peak_interval")]
    pub off_peak_interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            peak_start_hour: defaults::peak_start(),
            peak_end_hour: defaults::peak_end(),
            peak_interval_secs: defaults::peak_interval(),
            off_peak_interval_secs: defaults::off_peak_interval(),
        }
    }
}

/// Credential bundle loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable holding `uuid#token#noncestr#sign`
    #[serde(default = "defaults::auth_env_var")]
    pub env_var: String,

    /// Delay between credential reload attempts during recovery, in seconds
    #[serde(default = "defaults::auth_retry_delay")]
    pub retry_delay_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            env_var: defaults::auth_env_var(),
            retry_delay_secs: defaults::auth_retry_delay(),
        }
    }
}

/// Notification dispatch settings.
///
/// Absent URL disables notifications entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook endpoint accepting `{title, content, to, token, priority}`
    #[serde(default)]
    pub url: Option<String>,

    /// Access token forwarded in the webhook payload
    #[serde(default)]
    pub token: Option<String>,
}

impl NotifyConfig {
    /// Apply environment overrides used by the hosting panel.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("QlNotifyUrl") {
            if !url.is_empty() {
                self.url = Some(url);
            }
        }
        if let Ok(token) = std::env::var("QlToken") {
            if !token.is_empty() {
                self.token = Some(token);
            }
        }
    }
}

mod defaults {
    // Source defaults
    pub fn base_url() -> String {
        "https://ariya-api.dongfeng-nissan.com.cn/nissan-partner-audit-service/api/task/v2/list"
            .into()
    }
    pub fn categories() -> Vec<u32> {
        vec![2, 3]
    }
    pub fn page_size() -> u32 {
        20
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (iPhone; CPU iPhone OS 18_6 like Mac OS X) AppleWebKit/605.1.15 \
         (KHTML, like Gecko) Mobile/15E148/NissanOneApp"
            .into()
    }

    // Schedule defaults
    pub fn peak_start() -> u32 {
        9
    }
    pub fn peak_end() -> u32 {
        12
    }
    pub fn peak_interval() -> u64 {
        30 * 60
    }
    pub fn off_peak_interval() -> u64 {
        3 * 60 * 60
    }

    // Auth defaults
    pub fn auth_env_var() -> String {
        "DFRC".into()
    }
    pub fn auth_retry_delay() -> u64 {
        30
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_categories() {
        let mut config = Config::default();
        config.source.categories.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_url() {
        let mut config = Config::default();
        config.source.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_peak_window() {
        let mut config = Config::default();
        config.schedule.peak_start_hour = 12;
        config.schedule.peak_end_hour = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_schedule_matches_documented_values() {
        let schedule = ScheduleConfig::default();
        assert_eq!(schedule.peak_start_hour, 9);
        assert_eq!(schedule.peak_end_hour, 12);
        assert_eq!(schedule.peak_interval_secs, 1800);
        assert_eq!(schedule.off_peak_interval_secs, 10800);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [schedule]
            peak_interval_secs = 600
            "#,
        )
        .unwrap();
        assert_eq!(config.schedule.peak_interval_secs, 600);
        assert_eq!(config.schedule.peak_start_hour, 9);
        assert_eq!(config.source.page_size, 20);
    }
}
