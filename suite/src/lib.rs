//! Black-box HTTP contract suite for JSONPlaceholder.
//!
//! The crate sends requests to a public REST service, and optionally to a
//! secondary API-key authenticated service, then checks status codes,
//! headers, bodies, and response times. Request payloads come from the
//! [`fixtures`] crate.
//!
//! # Overview
//!
//! - [`SuiteSettings`] resolves endpoints, the API key, and timing limits
//!   from the environment with built-in fallbacks.
//! - [`ApiClient`] dispatches [`RequestSpec`]s against a switchable
//!   [`Target`]; each scenario owns its own client, so target switches never
//!   leak between scenarios.
//! - [`ApiResponse::then`] starts a chain of fail-fast checks built from
//!   [`Matcher`]s.
//! - [`catalogue::all`] lists every [`Scenario`]; a [`Runner`] executes them
//!   and tallies a [`RunSummary`].

pub mod assertion;
pub mod catalogue;
pub mod client;
pub mod config;
pub mod error;
pub mod response;
pub mod runner;
pub mod scenario;
pub mod target;

pub use assertion::{Matcher, ResponseAssert};
pub use client::{ApiClient, RequestBody, RequestSpec, SecondaryScope};
pub use config::SuiteSettings;
pub use error::{AssertionFailure, ConfigError, ScenarioError, TransportError};
pub use response::{ApiResponse, PathError};
pub use runner::{Outcome, RunSummary, Runner, RunnerOptions, ScenarioReport};
pub use scenario::{Scenario, ScenarioContext, ScenarioFn, ScenarioFuture};
pub use target::{Target, TargetKind};
