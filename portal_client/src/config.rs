use std::env;
use std::time::Duration;

/// Connection settings for [`crate::PortalClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the `/api` prefix, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    pub geolocation_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api".into(),
            request_timeout: Duration::from_secs(30),
            geolocation_timeout: Duration::from_secs(10),
        }
    }
}

fn secs(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    /// Reads `PORTAL_API_URL`, `PORTAL_REQUEST_TIMEOUT_SECS` and
    /// `PORTAL_GEOLOCATION_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Self {
            base_url: env::var("PORTAL_API_URL")
                .map(|u| u.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.base_url),
            request_timeout: secs("PORTAL_REQUEST_TIMEOUT_SECS").unwrap_or(defaults.request_timeout),
            geolocation_timeout: secs("PORTAL_GEOLOCATION_TIMEOUT_SECS").unwrap_or(defaults.geolocation_timeout),
        }
    }

    pub fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.geolocation_timeout = timeout;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
