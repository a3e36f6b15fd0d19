use std::env;
use std::time::Duration;

use crate::error::{Result, SpongeError};

pub const DEFAULT_API_URL_BASE: &str = "https://exbio.wzw.tum.de/sponge-api/";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "SPONGE_API_URL";
/// Environment variable holding the request timeout in whole seconds
pub const TIMEOUT_ENV: &str = "SPONGE_API_TIMEOUT_SECS";

/// Static settings shared by every request a client issues.
///
/// Built once and handed to [`crate::SpongeClient`]; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_url_base: String,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url_base: DEFAULT_API_URL_BASE.to_string(),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            timeout: None,
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn new(api_url_base: impl Into<String>) -> Self {
        Self::default().with_base_url(api_url_base)
    }

    /// Load `.env` (if any) and apply `SPONGE_API_URL` / `SPONGE_API_TIMEOUT_SECS`
    /// on top of the defaults.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }
        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                SpongeError::Config(format!("{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"))
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Endpoint paths are appended verbatim, so the base always ends in `/`.
    #[must_use]
    pub fn with_base_url(mut self, api_url_base: impl Into<String>) -> Self {
        let mut base = api_url_base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.api_url_base = base;
        self
    }

    /// Add a header, replacing any existing one with the same (case-insensitive) name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url_base, path)
    }
}
