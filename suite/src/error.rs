//! Error types for configuration, transport, assertions, and scenarios.

use fixtures::FixtureError;
use thiserror::Error;

/// Errors in configured endpoints or headers.
///
/// Primary-target and client errors abort start-up before any scenario runs;
/// a misconfigured secondary target only fails the scenarios that switch to
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Configuration sources could not be loaded.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader error message.
        message: String,
    },
    /// A configured base URL is not an absolute HTTP URL.
    #[error("invalid base URL {url:?}: {message}")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
        /// Parser error message.
        message: String,
    },
    /// A configured header name or value is not valid HTTP.
    #[error("invalid header {name:?}: {message}")]
    InvalidHeader {
        /// Offending header name.
        name: String,
        /// Parser error message.
        message: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {message}")]
    HttpClient {
        /// Builder error message.
        message: String,
    },
}

/// Errors raised while dispatching a request or reading its response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request URL could not be assembled.
    #[error("invalid request URL: {message}")]
    InvalidUrl {
        /// Description of the problem.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request timed out: {message}")]
    Timeout {
        /// Transport error message.
        message: String,
    },
    /// No connection could be established.
    #[error("connection failed: {message}")]
    Connect {
        /// Transport error message.
        message: String,
    },
    /// Any other transport failure.
    #[error("transport failure: {message}")]
    Transport {
        /// Transport error message.
        message: String,
    },
    /// The request body could not be encoded, or the response body read.
    #[error("body error: {message}")]
    Body {
        /// Description of the problem.
        message: String,
    },
}

/// A single failed check against a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{subject}: expected {expected}, got {actual}")]
pub struct AssertionFailure {
    /// What was checked, e.g. `status code` or `body field "id"`.
    pub subject: String,
    /// Description of the expected value.
    pub expected: String,
    /// Rendering of the observed value.
    pub actual: String,
}

impl AssertionFailure {
    /// Build a failure from its three parts.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Why a scenario failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    /// A request could not be completed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// A response check failed.
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),
    /// A fixture could not be generated.
    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),
    /// The scenario needs a target whose configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The scenario panicked.
    #[error("scenario panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}
