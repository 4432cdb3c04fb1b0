//! Fluent, fail-fast checks over an [`ApiResponse`].
//!
//! Each check returns `Result<Self, AssertionFailure>`, so checks chain with
//! `?` and a scenario stops at the first mismatch:
//!
//! ```
//! use std::time::Duration;
//!
//! use api_suite::{ApiResponse, AssertionFailure, Matcher};
//! use reqwest::header::HeaderMap;
//!
//! fn check(response: &ApiResponse) -> Result<(), AssertionFailure> {
//!     response
//!         .then()
//!         .status_code(200)?
//!         .body("id", Matcher::equals(1))?
//!         .body("name", Matcher::NotEmpty)?;
//!     Ok(())
//! }
//!
//! let response = ApiResponse::new(
//!     200,
//!     HeaderMap::new(),
//!     r#"{"id":1,"name":"Leanne Graham"}"#.to_owned(),
//!     Duration::from_millis(12),
//! );
//! assert!(check(&response).is_ok());
//! ```

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::error::AssertionFailure;
use crate::response::ApiResponse;

const MISSING: &str = "<missing>";
const PREVIEW_CHAR_LIMIT: usize = 160;
const JSON_MEDIA_TYPE: &str = "application/json";

/// Predicate over a body field or header value.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Present, non-null, and not the empty string.
    NotEmpty,
    /// Equal to the given JSON value.
    Equals(Value),
    /// A string containing the given fragment.
    Contains(String),
    /// Present and not null.
    NotNull,
    /// Absent or null.
    IsNull,
    /// A number strictly greater than the bound.
    GreaterThan(f64),
    /// A number strictly less than the bound.
    LessThan(f64),
    /// At least one of the inner matchers holds.
    AnyOf(Vec<Matcher>),
}

impl Matcher {
    /// Shorthand for [`Matcher::Equals`].
    #[must_use]
    pub fn equals(value: impl Into<Value>) -> Self {
        Self::Equals(value.into())
    }

    /// Shorthand for [`Matcher::Contains`].
    #[must_use]
    pub fn contains(fragment: impl Into<String>) -> Self {
        Self::Contains(fragment.into())
    }

    /// Whether `value` satisfies this matcher; `None` means absent.
    #[must_use]
    pub fn matches(&self, value: Option<&Value>) -> bool {
        match self {
            Self::NotEmpty => value.is_some_and(|found| match found {
                Value::Null => false,
                Value::String(text) => !text.is_empty(),
                _ => true,
            }),
            Self::Equals(expected) => value == Some(expected),
            Self::Contains(fragment) => value
                .and_then(Value::as_str)
                .is_some_and(|text| text.contains(fragment.as_str())),
            Self::NotNull => value.is_some_and(|found| !found.is_null()),
            Self::IsNull => value.is_none_or(Value::is_null),
            Self::GreaterThan(bound) => value
                .and_then(Value::as_f64)
                .is_some_and(|number| number > *bound),
            Self::LessThan(bound) => value
                .and_then(Value::as_f64)
                .is_some_and(|number| number < *bound),
            Self::AnyOf(options) => options.iter().any(|option| option.matches(value)),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEmpty => f.write_str("a non-empty value"),
            Self::Equals(expected) => write!(f, "{expected}"),
            Self::Contains(fragment) => write!(f, "a string containing {fragment:?}"),
            Self::NotNull => f.write_str("a non-null value"),
            Self::IsNull => f.write_str("null or absent"),
            Self::GreaterThan(bound) => write!(f, "a number greater than {bound}"),
            Self::LessThan(bound) => write!(f, "a number less than {bound}"),
            Self::AnyOf(options) => {
                f.write_str("any of [")?;
                for (position, option) in options.iter().enumerate() {
                    if position > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{option}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl ApiResponse {
    /// Start a chain of checks against this response.
    #[must_use]
    pub const fn then(&self) -> ResponseAssert<'_> {
        ResponseAssert { response: self }
    }
}

/// Chainable checks over one response.
#[derive(Debug, Clone, Copy)]
pub struct ResponseAssert<'a> {
    response: &'a ApiResponse,
}

impl<'a> ResponseAssert<'a> {
    /// The response under test.
    #[must_use]
    pub const fn response(&self) -> &'a ApiResponse {
        self.response
    }

    /// Status code equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] on mismatch.
    pub fn status_code(self, expected: u16) -> Result<Self, AssertionFailure> {
        self.status_in(&[expected])
    }

    /// Status code is one of `accepted`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] when the status is not listed.
    pub fn status_in(self, accepted: &[u16]) -> Result<Self, AssertionFailure> {
        let status = self.response.status();
        if accepted.contains(&status) {
            return Ok(self);
        }
        let expected = match accepted {
            [single] => single.to_string(),
            _ => format!("one of {accepted:?}"),
        };
        Err(AssertionFailure::new(
            "status code",
            expected,
            format!("{status} with body {}", preview(self.response.text())),
        ))
    }

    /// `Content-Type` names a JSON media type.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] when the header is absent or not JSON.
    pub fn content_type_json(self) -> Result<Self, AssertionFailure> {
        let content_type = self.response.content_type();
        if content_type.is_some_and(|value| value.to_ascii_lowercase().contains(JSON_MEDIA_TYPE)) {
            return Ok(self);
        }
        Err(AssertionFailure::new(
            "content type",
            JSON_MEDIA_TYPE,
            content_type.unwrap_or(MISSING),
        ))
    }

    /// Header `name` satisfies `matcher`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] on mismatch; an absent header renders as
    /// `<missing>`.
    pub fn header(self, name: &str, matcher: Matcher) -> Result<Self, AssertionFailure> {
        let value = self
            .response
            .header(name)
            .map(|text| Value::String(text.to_owned()));
        if matcher.matches(value.as_ref()) {
            return Ok(self);
        }
        Err(AssertionFailure::new(
            format!("header {name:?}"),
            matcher.to_string(),
            self.response.header(name).map_or_else(|| MISSING.to_owned(), preview),
        ))
    }

    /// Body field at `path` satisfies `matcher`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] on mismatch or for a malformed path; an
    /// unresolved path renders as `<missing>`.
    pub fn body(self, path: &str, matcher: Matcher) -> Result<Self, AssertionFailure> {
        let subject = format!("body field {path:?}");
        let value = self
            .response
            .field(path)
            .map_err(|error| AssertionFailure::new(&subject, matcher.to_string(), error.to_string()))?;
        if matcher.matches(value.as_ref()) {
            return Ok(self);
        }
        Err(AssertionFailure::new(
            subject,
            matcher.to_string(),
            value.map_or_else(|| MISSING.to_owned(), |found| preview(&found.to_string())),
        ))
    }

    /// Round-trip time is strictly below `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] when the response took `limit` or longer.
    pub fn time_below(self, limit: Duration) -> Result<Self, AssertionFailure> {
        let elapsed = self.response.elapsed();
        if elapsed < limit {
            return Ok(self);
        }
        Err(AssertionFailure::new(
            "response time",
            format!("less than {} ms", limit.as_millis()),
            format!("{} ms", elapsed.as_millis()),
        ))
    }
}

fn preview(text: &str) -> String {
    let compact = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let shortened = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{shortened}...")
    } else {
        shortened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn created() -> ApiResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert("x-powered-by", HeaderValue::from_static("Express"));
        let body = json!({
            "id": 11,
            "name": "John Doe",
            "email": "john.doe@example.com",
            "nickname": "",
            "manager": null,
            "company": { "name": "ABC Company" }
        });
        ApiResponse::new(201, headers, body.to_string(), Duration::from_millis(40))
    }

    #[rstest]
    #[case(Matcher::NotEmpty, Some(json!("x")), true)]
    #[case(Matcher::NotEmpty, Some(json!("")), false)]
    #[case(Matcher::NotEmpty, Some(Value::Null), false)]
    #[case(Matcher::NotEmpty, Some(json!(0)), true)]
    #[case(Matcher::NotEmpty, None, false)]
    #[case(Matcher::NotNull, Some(json!(false)), true)]
    #[case(Matcher::NotNull, None, false)]
    #[case(Matcher::IsNull, None, true)]
    #[case(Matcher::IsNull, Some(Value::Null), true)]
    #[case(Matcher::IsNull, Some(json!(1)), false)]
    #[case(Matcher::equals(1), Some(json!(1)), true)]
    #[case(Matcher::equals("1"), Some(json!(1)), false)]
    #[case(Matcher::contains("test post"), Some(json!("a test post body")), true)]
    #[case(Matcher::contains("test post"), Some(json!(42)), false)]
    #[case(Matcher::GreaterThan(0.0), Some(json!(3)), true)]
    #[case(Matcher::GreaterThan(3.0), Some(json!(3)), false)]
    #[case(Matcher::LessThan(3000.0), Some(json!(12.5)), true)]
    #[case(Matcher::LessThan(3000.0), Some(json!("12")), false)]
    #[case(
        Matcher::AnyOf(vec![Matcher::equals(200), Matcher::equals(403)]),
        Some(json!(403)),
        true
    )]
    #[case(Matcher::AnyOf(Vec::new()), Some(json!(403)), false)]
    fn matchers_evaluate_values(
        #[case] matcher: Matcher,
        #[case] value: Option<Value>,
        #[case] expected: bool,
    ) {
        assert_eq!(matcher.matches(value.as_ref()), expected, "{matcher}");
    }

    #[rstest]
    fn passing_checks_chain(created: ApiResponse) {
        let result = created
            .then()
            .status_code(201)
            .and_then(|check| check.status_in(&[200, 201]))
            .and_then(ResponseAssert::content_type_json)
            .and_then(|check| check.header("X-Powered-By", Matcher::NotEmpty))
            .and_then(|check| check.body("name", Matcher::equals("John Doe")))
            .and_then(|check| check.body("company.name", Matcher::equals("ABC Company")))
            .and_then(|check| check.body("id", Matcher::NotNull))
            .and_then(|check| check.body("manager", Matcher::IsNull))
            .and_then(|check| check.time_below(Duration::from_secs(3)));
        assert!(result.is_ok(), "{result:?}");
    }

    #[rstest]
    fn status_mismatch_reports_status_and_body(created: ApiResponse) {
        let failure = created.then().status_code(200).expect_err("201 is not 200");
        assert_eq!(failure.subject, "status code");
        assert_eq!(failure.expected, "200");
        assert!(failure.actual.starts_with("201 with body {"), "{}", failure.actual);
    }

    #[rstest]
    fn status_sets_are_listed(created: ApiResponse) {
        let failure = created
            .then()
            .status_in(&[200, 403, 404])
            .expect_err("201 not accepted");
        assert_eq!(failure.expected, "one of [200, 403, 404]");
    }

    #[rstest]
    fn missing_fields_are_reported_not_panicked(created: ApiResponse) {
        let failure = created
            .then()
            .body("address.street", Matcher::NotEmpty)
            .expect_err("no address in body");
        assert_eq!(failure.subject, "body field \"address.street\"");
        assert_eq!(failure.actual, MISSING);
    }

    #[rstest]
    fn empty_strings_fail_not_empty(created: ApiResponse) {
        let failure = created
            .then()
            .body("nickname", Matcher::NotEmpty)
            .expect_err("empty nickname");
        assert_eq!(failure.actual, "\"\"");
    }

    #[rstest]
    fn malformed_paths_fail_the_check(created: ApiResponse) {
        let failure = created
            .then()
            .body("a..b", Matcher::NotNull)
            .expect_err("malformed path");
        assert!(failure.actual.contains("invalid JSON path"), "{}", failure.actual);
    }

    #[rstest]
    fn missing_headers_render_as_missing(created: ApiResponse) {
        let failure = created
            .then()
            .header("Cache-Control", Matcher::NotEmpty)
            .expect_err("no cache header");
        assert_eq!(failure.actual, MISSING);
    }

    #[rstest]
    fn slow_responses_fail_time_checks(created: ApiResponse) {
        let failure = created
            .then()
            .time_below(Duration::from_millis(40))
            .expect_err("40 ms is not below 40 ms");
        assert_eq!(failure.expected, "less than 40 ms");
        assert_eq!(failure.actual, "40 ms");
    }

    #[test]
    fn non_json_content_types_fail() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/html"));
        let response = ApiResponse::new(500, headers, String::new(), Duration::ZERO);
        let failure = response
            .then()
            .content_type_json()
            .expect_err("html is not json");
        assert_eq!(failure.actual, "text/html");
    }

    #[test]
    fn long_values_are_truncated_in_failures() {
        let body = json!({ "name": "a".repeat(500) }).to_string();
        let response = ApiResponse::new(201, HeaderMap::new(), body, Duration::ZERO);
        let failure = response
            .then()
            .body("name", Matcher::equals("b"))
            .expect_err("mismatch");
        assert!(failure.actual.ends_with("..."));
        assert_eq!(failure.actual.chars().count(), PREVIEW_CHAR_LIMIT + 3);
    }

    #[test]
    fn any_of_renders_every_option() {
        let matcher = Matcher::AnyOf(vec![Matcher::equals(200), Matcher::NotNull]);
        assert_eq!(matcher.to_string(), "any of [200, a non-null value]");
    }
}
