//! Randomised request-payload fixtures for API contract scenarios.
//!
//! This crate produces syntactically valid, schema-shaped records (users,
//! addresses, companies, logins, products) that scenarios post to a remote
//! API and then compare field by field against the echoed response.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Fresh randomised records per call, seeded from process randomness or
//!   from an explicit seed for reproducible runs
//! - Locale-flavoured person and address data via the `fake` crate
//! - A pluggable [`FieldSource`] per field kind
//! - Explicit invariant checks: alphanumeric usernames, valid email syntax,
//!   non-empty names
//!
//! # Example
//!
//! ```
//! use fixtures::{FixtureGenerator, is_valid_username};
//!
//! let mut generator = FixtureGenerator::seeded(2026);
//! let users = generator.generate_multiple(3).expect("non-negative count");
//!
//! assert_eq!(users.len(), 3);
//! assert!(users.iter().all(|user| is_valid_username(&user.username)));
//! ```

mod commerce;
mod error;
mod generator;
mod password;
mod records;
mod source;
mod validation;

pub use error::FixtureError;
pub use generator::{FixtureGenerator, VALID_USER_NAME_PREFIX, VALID_USERNAME_PREFIX};
pub use password::{DEFAULT_PASSWORD_MAX, DEFAULT_PASSWORD_MIN, PasswordPolicy};
pub use records::{
    AddressFixture, CompanyFixture, LoginFixture, ProductFixture, UserFixture, UserSummary,
};
pub use source::{FakeFieldSource, FakerLocale, FieldSource};
pub use validation::{is_valid_email, is_valid_username, sanitize_username};
