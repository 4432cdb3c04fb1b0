//! Error types for the fixtures crate.
//!
//! Generation itself cannot fail; these variants cover invalid inputs that
//! are rejected before any value is produced.

use thiserror::Error;

/// Errors returned by [`FixtureGenerator`](crate::FixtureGenerator) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// A fixture count was negative or too large for this platform.
    #[error("fixture count must be between 0 and usize::MAX, got {count}")]
    InvalidCount {
        /// The rejected count.
        count: i64,
    },

    /// A password policy has an unusable length range.
    #[error(
        "invalid password policy: length range {min_len}..={max_len} \
         cannot hold {required} required character classes"
    )]
    InvalidPasswordPolicy {
        /// Requested minimum length.
        min_len: usize,
        /// Requested maximum length.
        max_len: usize,
        /// Number of character classes the policy requires.
        required: usize,
    },

    /// A fixture could not be rendered as JSON text.
    #[error("failed to serialise fixture: {message}")]
    Serialization {
        /// Serializer error message.
        message: String,
    },
}

impl From<serde_json::Error> for FixtureError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_count_formats_correctly() {
        let err = FixtureError::InvalidCount { count: -3 };
        assert_eq!(
            err.to_string(),
            "fixture count must be between 0 and usize::MAX, got -3"
        );
    }

    #[test]
    fn invalid_password_policy_formats_correctly() {
        let err = FixtureError::InvalidPasswordPolicy {
            min_len: 12,
            max_len: 8,
            required: 4,
        };
        assert_eq!(
            err.to_string(),
            "invalid password policy: length range 12..=8 cannot hold 4 required character classes"
        );
    }

    #[test]
    fn serialization_formats_correctly() {
        let err = FixtureError::Serialization {
            message: "key must be a string".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to serialise fixture: key must be a string"
        );
    }
}
