//! The scenario catalogue, grouped by suite.
//!
//! Every scenario starts on the primary target in a fresh
//! [`ScenarioContext`](crate::scenario::ScenarioContext). Expectations mirror
//! the public JSONPlaceholder service, including its quirks: an empty object
//! body is accepted with `201` and malformed JSON is answered with `500`.

mod advanced;
mod authentication;
mod generated;
mod users;

use crate::scenario::Scenario;

/// Suite names in run order.
pub const SUITES: [&str; 4] = ["users", "authentication", "advanced", "generated"];

/// Every scenario, in run order.
#[must_use]
pub fn all() -> Vec<Scenario> {
    let mut scenarios = users::scenarios();
    scenarios.extend(authentication::scenarios());
    scenarios.extend(advanced::scenarios());
    scenarios.extend(generated::scenarios());
    scenarios
}
