//! Reqwest-backed API client with a switchable, scenario-scoped target.
//!
//! The client owns transport details only: URL assembly, default headers,
//! timeout and error mapping. Checks on the result live in
//! [`crate::assertion`].

use std::fmt::Display;
use std::ops::{Deref, DerefMut};
use std::time::Instant;

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::SuiteSettings;
use crate::error::{ConfigError, TransportError};
use crate::response::ApiResponse;
use crate::target::{Target, TargetKind};

/// Request payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// A structured record serialised as JSON.
    Json(Value),
    /// Verbatim text, which may be malformed JSON.
    Raw(String),
}

/// Everything needed to dispatch one request against the current target.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    method: Method,
    path: String,
    path_params: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
    body: RequestBody,
}

impl RequestSpec {
    /// A request with the given method and path template, e.g. `/users/{id}`.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// A `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A `PUT` request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// A `PATCH` request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// A `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Bind the `{name}` placeholder in the path template.
    #[must_use]
    pub fn path_param(mut self, name: &str, value: impl Display) -> Self {
        self.path_params.push((name.to_owned(), value.to_string()));
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query_param(mut self, name: &str, value: impl Display) -> Self {
        self.query_params.push((name.to_owned(), value.to_string()));
        self
    }

    /// Send `record` as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Body`] when `record` cannot be represented
    /// as JSON.
    pub fn json(mut self, record: &impl Serialize) -> Result<Self, TransportError> {
        let value = serde_json::to_value(record).map_err(|error| TransportError::Body {
            message: format!("failed to encode request body: {error}"),
        })?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Send `text` verbatim.
    #[must_use]
    pub fn raw_body(mut self, text: impl Into<String>) -> Self {
        self.body = RequestBody::Raw(text.into());
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path template as written.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Request payload.
    #[must_use]
    pub const fn body(&self) -> &RequestBody {
        &self.body
    }
}

/// HTTP client bound to one current [`Target`].
///
/// Clones share the underlying connection pool but switch targets
/// independently, so each scenario can own one. The secondary target is
/// resolved up front but its errors only surface when a caller switches to
/// it, so a run confined to the primary target never trips over them.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    primary: Target,
    secondary: Result<Target, ConfigError>,
    current: Target,
}

impl ApiClient {
    /// Build a client on the primary target.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the primary target is misconfigured or
    /// the HTTP client cannot be constructed.
    pub fn new(settings: &SuiteSettings) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|error| ConfigError::HttpClient {
                message: error.to_string(),
            })?;
        let primary = Target::primary(settings)?;
        let secondary = Target::secondary(settings);
        if let Err(error) = &secondary {
            debug!(%error, "secondary target unavailable");
        }
        Ok(Self {
            http,
            current: primary.clone(),
            primary,
            secondary,
        })
    }

    /// The target requests currently go to.
    #[must_use]
    pub const fn target(&self) -> &Target {
        &self.current
    }

    /// Send subsequent requests to the primary target.
    pub fn use_primary(&mut self) {
        self.current = self.primary.clone();
    }

    /// Send subsequent requests to the secondary target.
    ///
    /// # Errors
    ///
    /// Returns the secondary target's [`ConfigError`]; the current target is
    /// left unchanged.
    pub fn use_secondary(&mut self) -> Result<(), ConfigError> {
        self.current = self.secondary.clone()?;
        Ok(())
    }

    /// Switch to the secondary target until the returned guard drops.
    ///
    /// The previous target is restored on drop, including early returns and
    /// unwinding.
    ///
    /// # Errors
    ///
    /// Returns the secondary target's [`ConfigError`] without switching.
    pub fn secondary_scope(&mut self) -> Result<SecondaryScope<'_>, ConfigError> {
        let previous = self.current.clone();
        self.use_secondary()?;
        Ok(SecondaryScope {
            client: self,
            previous: Some(previous),
        })
    }

    /// Dispatch `spec` against the current target and capture the response.
    ///
    /// Non-success statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the URL cannot be built, the request
    /// cannot be sent, or the body cannot be read.
    pub async fn request(&self, spec: RequestSpec) -> Result<ApiResponse, TransportError> {
        let url = self
            .current
            .resolve(&spec.path, &spec.path_params, &spec.query_params)?;
        let target = self.current.kind();
        debug!(?target, method = %spec.method, %url, "sending request");

        let outgoing = self
            .http
            .request(spec.method.clone(), url.clone())
            .headers(self.current.headers().clone());
        let outgoing_with_body = match spec.body {
            RequestBody::Empty => outgoing,
            RequestBody::Json(value) => outgoing.json(&value),
            RequestBody::Raw(text) => outgoing.body(text),
        };

        let started = Instant::now();
        let response = outgoing_with_body
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(map_transport_error)?;
        let elapsed = started.elapsed();

        debug!(
            ?target,
            method = %spec.method,
            %url,
            status = status.as_u16(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "received response"
        );
        Ok(ApiResponse::new(status.as_u16(), headers, body, elapsed))
    }

    /// Whether the current target is `kind`.
    #[must_use]
    pub fn is_on(&self, kind: TargetKind) -> bool {
        self.current.kind() == kind
    }
}

/// Guard returned by [`ApiClient::secondary_scope`].
#[derive(Debug)]
pub struct SecondaryScope<'a> {
    client: &'a mut ApiClient,
    previous: Option<Target>,
}

impl Deref for SecondaryScope<'_> {
    type Target = ApiClient;

    fn deref(&self) -> &Self::Target {
        self.client
    }
}

impl DerefMut for SecondaryScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.client
    }
}

impl Drop for SecondaryScope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.client.current = previous;
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    let message = error.to_string();
    if error.is_timeout() {
        TransportError::Timeout { message }
    } else if error.is_connect() {
        TransportError::Connect { message }
    } else if error.is_builder() {
        TransportError::InvalidUrl { message }
    } else if error.is_body() || error.is_decode() {
        TransportError::Body { message }
    } else {
        TransportError::Transport { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn client() -> ApiClient {
        ApiClient::new(&SuiteSettings::builtin()).expect("client builds")
    }

    #[rstest]
    fn starts_on_the_primary_target(client: ApiClient) {
        assert!(client.is_on(TargetKind::Primary));
        assert_eq!(
            client.target().base_url().as_str(),
            "https://jsonplaceholder.typicode.com/"
        );
    }

    #[rstest]
    fn switching_back_restores_the_exact_target(mut client: ApiClient) {
        let original = client.target().clone();
        client.use_secondary().expect("secondary target configured");
        assert!(client.is_on(TargetKind::Secondary));
        assert_ne!(client.target(), &original);
        client.use_primary();
        assert_eq!(client.target(), &original);
    }

    #[rstest]
    fn secondary_scope_reverts_on_drop(mut client: ApiClient) {
        let original = client.target().clone();
        {
            let scope = client.secondary_scope().expect("secondary target configured");
            assert!(scope.is_on(TargetKind::Secondary));
            assert!(scope.target().headers().contains_key("x-api-key"));
        }
        assert_eq!(client.target(), &original);
    }

    #[rstest]
    fn secondary_scope_restores_whatever_was_current(mut client: ApiClient) {
        client.use_secondary().expect("secondary target configured");
        drop(client.secondary_scope().expect("secondary target configured"));
        assert!(client.is_on(TargetKind::Secondary));
    }

    #[rstest]
    fn clones_switch_independently(client: ApiClient) {
        let mut other = client.clone();
        other.use_secondary().expect("secondary target configured");
        assert!(client.is_on(TargetKind::Primary));
        assert!(other.is_on(TargetKind::Secondary));
    }

    #[test]
    fn bad_secondary_key_only_fails_the_switch() {
        let settings = SuiteSettings {
            api_key: Some("bad\nkey".to_owned()),
            ..SuiteSettings::builtin()
        };
        let mut client = ApiClient::new(&settings).expect("primary target is valid");

        let error = client.use_secondary().expect_err("secondary key is invalid");
        assert!(matches!(error, ConfigError::InvalidHeader { .. }));
        assert!(client.is_on(TargetKind::Primary));
        assert!(client.secondary_scope().is_err());
        assert!(client.is_on(TargetKind::Primary));
    }

    #[test]
    fn request_spec_collects_params_and_body() {
        let spec = RequestSpec::put("/users/{id}")
            .path_param("id", 1)
            .query_param("userId", 7)
            .json(&json!({ "name": "John Updated" }))
            .expect("json body");
        assert_eq!(spec.method(), &Method::PUT);
        assert_eq!(spec.path(), "/users/{id}");
        assert_eq!(spec.path_params, vec![("id".to_owned(), "1".to_owned())]);
        assert_eq!(
            spec.query_params,
            vec![("userId".to_owned(), "7".to_owned())]
        );
        assert_eq!(
            spec.body(),
            &RequestBody::Json(json!({ "name": "John Updated" }))
        );
    }

    #[test]
    fn raw_bodies_are_kept_verbatim() {
        let spec = RequestSpec::post("/users").raw_body("{invalid json}");
        assert_eq!(spec.body(), &RequestBody::Raw("{invalid json}".to_owned()));
    }
}
