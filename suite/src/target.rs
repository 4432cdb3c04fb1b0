//! Request targets: a base URL plus the default headers sent with it.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::config::SuiteSettings;
use crate::error::{ConfigError, TransportError};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Which configured service a [`Target`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// The default JSONPlaceholder-style service.
    Primary,
    /// The API-key authenticated service.
    Secondary,
}

/// Immutable request context: where requests go and which headers they carry.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    kind: TargetKind,
    base_url: Url,
    headers: HeaderMap,
}

impl Target {
    /// The primary target with JSON content negotiation headers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the configured URL is not
    /// an absolute HTTP(S) URL.
    pub fn primary(settings: &SuiteSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            kind: TargetKind::Primary,
            base_url: parse_base_url(settings.primary_base_url())?,
            headers: json_headers(),
        })
    }

    /// The secondary target: JSON headers plus the API key header.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] or
    /// [`ConfigError::InvalidHeader`] for malformed configuration.
    pub fn secondary(settings: &SuiteSettings) -> Result<Self, ConfigError> {
        let header_name = settings.api_key_header();
        let name = HeaderName::from_bytes(header_name.as_bytes()).map_err(|error| {
            ConfigError::InvalidHeader {
                name: header_name.to_owned(),
                message: error.to_string(),
            }
        })?;
        let value =
            HeaderValue::from_str(settings.api_key()).map_err(|error| ConfigError::InvalidHeader {
                name: header_name.to_owned(),
                message: error.to_string(),
            })?;

        let mut headers = json_headers();
        headers.insert(name, value);
        Ok(Self {
            kind: TargetKind::Secondary,
            base_url: parse_base_url(settings.secondary_base_url())?,
            headers,
        })
    }

    /// Which service this target points at.
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every request.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Join a path template onto the base URL.
    ///
    /// Template segments written as `{name}` are replaced by the matching
    /// entry in `path_params`, percent-encoded as a single path segment.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidUrl`] when a placeholder has no
    /// matching parameter.
    pub fn resolve(
        &self,
        template: &str,
        path_params: &[(String, String)],
        query_params: &[(String, String)],
    ) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| TransportError::InvalidUrl {
                message: format!("{} cannot be a base URL", self.base_url),
            })?;
            segments.pop_if_empty();
            for segment in template.split('/').filter(|segment| !segment.is_empty()) {
                segments.push(substitute(segment, path_params)?);
            }
        }
        if !query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(query_params);
        }
        Ok(url)
    }
}

fn substitute<'a>(
    segment: &'a str,
    path_params: &'a [(String, String)],
) -> Result<&'a str, TransportError> {
    let Some(name) = segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Ok(segment);
    };
    path_params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| TransportError::InvalidUrl {
            message: format!("missing path parameter {name:?}"),
        })
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
    headers
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidBaseUrl {
        url: raw.to_owned(),
        message,
    };
    let url = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid("expected an absolute http(s) URL".to_owned()));
    }
    Ok(url)
}
