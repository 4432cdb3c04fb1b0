//! Suite configuration loaded via OrthoConfig.
//!
//! Every field is optional; accessors fall back to the constants below, which
//! describe the public JSONPlaceholder and ReqRes deployments.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::error::ConfigError;

/// Base URL of the primary target.
pub const PRIMARY_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
/// Base URL of the secondary, API-key authenticated target.
pub const SECONDARY_BASE_URL: &str = "https://reqres.in/api";
/// API key sent to the secondary target.
pub const API_KEY: &str = "reqres-free-v1";
/// Header carrying [`API_KEY`].
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Login that the secondary target accepts.
pub const VALID_EMAIL: &str = "eve.holt@reqres.in";
/// Password matching [`VALID_EMAIL`].
pub const VALID_PASSWORD: &str = "cityslicka";
/// Login that the secondary target rejects.
pub const INVALID_EMAIL: &str = "invalid@test.com";

const DEFAULT_MAX_RESPONSE_TIME_MS: u64 = 3_000;
const DEFAULT_ACCEPTABLE_RESPONSE_TIME_MS: u64 = 1_000;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Configuration values controlling where and how the suite sends requests.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "API_SUITE")]
pub struct SuiteSettings {
    /// Override for the primary base URL.
    pub primary_base_url: Option<String>,
    /// Override for the secondary base URL.
    pub secondary_base_url: Option<String>,
    /// Run scenarios that need the secondary target.
    #[ortho_config(default = false)]
    pub secondary_enabled: bool,
    /// Override for the secondary API key.
    pub api_key: Option<String>,
    /// Override for the API key header name.
    pub api_key_header: Option<String>,
    /// Upper bound asserted on response times, in milliseconds.
    pub max_response_time_ms: Option<u64>,
    /// Response time regarded as healthy, in milliseconds.
    pub acceptable_response_time_ms: Option<u64>,
    /// Per-request transport timeout, in milliseconds.
    pub request_timeout_ms: Option<u64>,
}

impl SuiteSettings {
    /// Settings with every override unset and the secondary target disabled.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            primary_base_url: None,
            secondary_base_url: None,
            secondary_enabled: false,
            api_key: None,
            api_key_header: None,
            max_response_time_ms: None,
            acceptable_response_time_ms: None,
            request_timeout_ms: None,
        }
    }

    /// Load settings from the environment and configuration files.
    ///
    /// Command-line parsing is left to the caller, so only the binary name is
    /// forwarded to the loader.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source cannot be parsed.
    pub fn load_for(binary: &str) -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from(binary)]).map_err(|error| ConfigError::Load {
            message: error.to_string(),
        })
    }

    /// Return the primary base URL, falling back to [`PRIMARY_BASE_URL`].
    #[must_use]
    pub fn primary_base_url(&self) -> &str {
        self.primary_base_url.as_deref().unwrap_or(PRIMARY_BASE_URL)
    }

    /// Return the secondary base URL, falling back to [`SECONDARY_BASE_URL`].
    #[must_use]
    pub fn secondary_base_url(&self) -> &str {
        self.secondary_base_url
            .as_deref()
            .unwrap_or(SECONDARY_BASE_URL)
    }

    /// Whether scenarios needing the secondary target should run.
    #[must_use]
    pub const fn secondary_enabled(&self) -> bool {
        self.secondary_enabled
    }

    /// Return the API key, falling back to [`API_KEY`].
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or(API_KEY)
    }

    /// Return the API key header name, falling back to [`API_KEY_HEADER`].
    #[must_use]
    pub fn api_key_header(&self) -> &str {
        self.api_key_header.as_deref().unwrap_or(API_KEY_HEADER)
    }

    /// Upper bound asserted on response times.
    #[must_use]
    pub fn max_response_time(&self) -> Duration {
        Duration::from_millis(
            self.max_response_time_ms
                .unwrap_or(DEFAULT_MAX_RESPONSE_TIME_MS),
        )
    }

    /// Response time regarded as healthy.
    #[must_use]
    pub fn acceptable_response_time(&self) -> Duration {
        Duration::from_millis(
            self.acceptable_response_time_ms
                .unwrap_or(DEFAULT_ACCEPTABLE_RESPONSE_TIME_MS),
        )
    }

    /// Per-request transport timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS))
    }
}
