//! Captured HTTP responses and JSON path lookup.
//!
//! Paths use dotted keys and bracket indexes, e.g. `address.street`,
//! `[0].userId` or `items[2].name`. The pseudo-field `size()` yields the
//! length of an array, object, or string and may only appear last.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use serde_json::Value;
use thiserror::Error;

const SIZE_FIELD: &str = "size()";

/// A malformed JSON path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid JSON path {path:?}: {reason}")]
pub struct PathError {
    /// The path as written.
    pub path: String,
    /// What is wrong with it.
    pub reason: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
    Size,
}

/// Status, headers, body, and timing of one completed request.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    headers: HeaderMap,
    body: String,
    elapsed: Duration,
    json: Option<Value>,
}

impl ApiResponse {
    /// Capture a response. The body is parsed as JSON when possible.
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, body: String, elapsed: Duration) -> Self {
        let json = serde_json::from_str(&body).ok();
        Self {
            status,
            headers,
            body,
            elapsed,
            json,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Round-trip time from dispatch until the body was read.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Header value by case-insensitive name. Non-UTF-8 values read as absent.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// The `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    /// Raw body text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parsed body, or `None` when the body is not JSON.
    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    /// Look up a field by JSON path.
    ///
    /// Returns `Ok(None)` when the body is not JSON or the path does not
    /// resolve.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when `path` is malformed.
    pub fn field(&self, path: &str) -> Result<Option<Value>, PathError> {
        let segments = parse_path(path)?;
        Ok(self
            .json
            .as_ref()
            .and_then(|root| resolve(root, &segments)))
    }
}

fn parse_path(path: &str) -> Result<Vec<Segment>, PathError> {
    let error = |reason| PathError {
        path: path.to_owned(),
        reason,
    };
    let mut segments = Vec::new();
    if path.is_empty() {
        return Ok(segments);
    }

    for part in path.split('.') {
        if part == SIZE_FIELD {
            segments.push(Segment::Size);
            continue;
        }
        if segments.last() == Some(&Segment::Size) {
            return Err(error("size() must be the last segment"));
        }
        let (key, mut indexes) = part.find('[').map_or((part, ""), |at| part.split_at(at));
        if key.is_empty() && indexes.is_empty() {
            return Err(error("empty segment"));
        }
        if !key.is_empty() {
            segments.push(Segment::Key(key.to_owned()));
        }
        while !indexes.is_empty() {
            let (index, rest) = indexes
                .strip_prefix('[')
                .and_then(|inner| inner.split_once(']'))
                .ok_or_else(|| error("unbalanced brackets"))?;
            let position = index
                .parse::<usize>()
                .map_err(|_| error("index must be a non-negative integer"))?;
            segments.push(Segment::Index(position));
            indexes = rest;
        }
    }
    Ok(segments)
}

fn resolve(root: &Value, segments: &[Segment]) -> Option<Value> {
    let mut current = root;
    for segment in segments {
        match segment {
            Segment::Key(key) => current = current.get(key.as_str())?,
            Segment::Index(index) => current = current.get(*index)?,
            Segment::Size => return size_of(current),
        }
    }
    Some(current.clone())
}

fn size_of(value: &Value) -> Option<Value> {
    let size = match value {
        Value::Array(items) => items.len(),
        Value::Object(fields) => fields.len(),
        Value::String(text) => text.chars().count(),
        _ => return None,
    };
    Some(Value::from(size))
}
