//! Configuration module
//!
//! Client configuration: where the backend lives, request timeouts, the
//! post-upload settle delay and the upload pre-check limits.

use std::env;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const SETTLE_DELAY_MS: u64 = 3000;
const MAX_UPLOAD_MB: usize = 10;
const ALLOWED_CONTENT_TYPES: &str = "image/jpeg,image/png,image/gif";
const EVENT_CAPACITY: usize = 64;

/// Gallery client configuration
#[derive(Clone, Debug)]
pub struct GalleryConfig {
    /// Backend API base URL, without a trailing slash
    pub api_url: String,
    pub request_timeout_secs: u64,
    /// Wait after a successful transfer before reloading the catalog
    pub settle_delay_ms: u64,
    pub max_upload_bytes: usize,
    /// Lower-cased MIME types accepted for upload
    pub allowed_content_types: Vec<String>,
    /// Buffer size of the change-notification channel
    pub event_capacity: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            settle_delay_ms: SETTLE_DELAY_MS,
            max_upload_bytes: MAX_UPLOAD_MB * 1024 * 1024,
            allowed_content_types: split_list(ALLOWED_CONTENT_TYPES),
            event_capacity: EVENT_CAPACITY,
        }
    }
}

impl GalleryConfig {
    /// Load configuration from `.env` and the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("GALLERY_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or(defaults.api_url)
            .trim()
            .trim_end_matches('/')
            .to_string();

        let request_timeout_secs =
            parse_var(&lookup, "GALLERY_REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS)?;
        let settle_delay_ms = parse_var(&lookup, "GALLERY_SETTLE_DELAY_MS", SETTLE_DELAY_MS)?;
        let max_upload_mb = parse_var(&lookup, "GALLERY_MAX_UPLOAD_MB", MAX_UPLOAD_MB)?;
        let event_capacity = parse_var(&lookup, "GALLERY_EVENT_CAPACITY", EVENT_CAPACITY)?;

        let allowed_content_types = lookup("GALLERY_ALLOWED_CONTENT_TYPES")
            .map(|value| split_list(&value))
            .unwrap_or(defaults.allowed_content_types);

        let config = Self {
            api_url,
            request_timeout_secs,
            settle_delay_ms,
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            allowed_content_types,
            event_capacity,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "GALLERY_API_URL must be an http:// or https:// URL, got '{}'",
                self.api_url
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "GALLERY_REQUEST_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!(
                "GALLERY_MAX_UPLOAD_MB must be greater than zero"
            ));
        }

        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "GALLERY_ALLOWED_CONTENT_TYPES must list at least one content type"
            ));
        }

        if self.event_capacity == 0 {
            return Err(anyhow::anyhow!(
                "GALLERY_EVENT_CAPACITY must be greater than zero"
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn is_allowed_content_type(&self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_lowercase();
        self.allowed_content_types.iter().any(|t| *t == content_type)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
