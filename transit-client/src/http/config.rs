//! Client configuration and base-URL detection.

use std::time::Duration;

use url::{Host, Url};

use super::error::ClientError;

/// Port the backend listens on, both locally and when deployed.
pub const BACKEND_PORT: u16 = 5000;

/// Base URL used when the dashboard is served from a loopback host.
pub const LOCAL_BASE_URL: &str = "http://localhost:5000/api";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the transit HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every endpoint is appended to, e.g. `https://host:5000/api`
    pub base_url: String,
    /// How long a request may take before it is cancelled
    pub timeout: Duration,
    /// Whether to honour proxy settings from the environment
    pub use_system_proxy: bool,
}

impl ClientConfig {
    /// Create a config with an explicit base URL and the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_trailing_slash(base_url.into()),
            timeout: DEFAULT_TIMEOUT,
            use_system_proxy: true,
        }
    }

    /// Create a config whose base URL is derived from the origin the
    /// dashboard page is served from.
    pub fn from_page_origin(origin: &str) -> Result<Self, ClientError> {
        Ok(Self::new(detect_base_url(origin)?))
    }

    /// Set a custom timeout (for testing).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connect directly, ignoring `HTTP_PROXY` and friends.
    pub fn without_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(LOCAL_BASE_URL)
    }
}

/// Resolve the backend base URL for a page origin.
///
/// Loopback hosts map to the local development backend. Anything else keeps
/// the page's scheme and hostname and talks to [`BACKEND_PORT`].
pub fn detect_base_url(origin: &str) -> Result<String, ClientError> {
    let page =
        Url::parse(origin).map_err(|e| ClientError::InvalidBaseUrl(format!("{origin}: {e}")))?;

    let host = page
        .host()
        .ok_or_else(|| ClientError::InvalidBaseUrl(format!("{origin}: no hostname")))?;

    if is_loopback(&host) {
        return Ok(LOCAL_BASE_URL.to_string());
    }

    Ok(format!(
        "{}://{}:{}/api",
        page.scheme(),
        host,
        BACKEND_PORT
    ))
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => name.eq_ignore_ascii_case("localhost"),
        Host::Ipv4(addr) => addr.is_loopback(),
        Host::Ipv6(addr) => addr.is_loopback(),
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
