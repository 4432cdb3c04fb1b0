//! Scenario definitions and the per-scenario context they run in.

use std::fmt;
use std::sync::Arc;

use fixtures::FixtureGenerator;
use futures_util::future::BoxFuture;

use crate::client::ApiClient;
use crate::config::SuiteSettings;
use crate::error::ScenarioError;

/// Future returned by a scenario body.
pub type ScenarioFuture<'a> = BoxFuture<'a, Result<(), ScenarioError>>;

/// A scenario body: build requests, dispatch them, check the responses.
pub type ScenarioFn = for<'a> fn(&'a mut ScenarioContext) -> ScenarioFuture<'a>;

/// One named contract check.
#[derive(Clone, Copy)]
pub struct Scenario {
    suite: &'static str,
    name: &'static str,
    needs_secondary: bool,
    run: ScenarioFn,
}

impl Scenario {
    /// A scenario that runs against the primary target.
    #[must_use]
    pub const fn new(suite: &'static str, name: &'static str, run: ScenarioFn) -> Self {
        Self {
            suite,
            name,
            needs_secondary: false,
            run,
        }
    }

    /// Mark the scenario as needing the secondary target, so it is skipped
    /// while that target is disabled.
    #[must_use]
    pub const fn requiring_secondary(mut self) -> Self {
        self.needs_secondary = true;
        self
    }

    /// Suite the scenario belongs to.
    #[must_use]
    pub const fn suite(&self) -> &'static str {
        self.suite
    }

    /// Scenario name, unique within its suite.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the scenario talks to the secondary target.
    #[must_use]
    pub const fn needs_secondary(&self) -> bool {
        self.needs_secondary
    }

    /// `suite::name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }

    /// Whether the qualified name contains `filter`.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        self.qualified_name().contains(filter)
    }

    /// Start the scenario body.
    pub fn run<'a>(&self, context: &'a mut ScenarioContext) -> ScenarioFuture<'a> {
        (self.run)(context)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .field("needs_secondary", &self.needs_secondary)
            .finish_non_exhaustive()
    }
}

/// State owned by one scenario run.
///
/// Every run gets a fresh context on the primary target, so target switches
/// never leak between scenarios.
#[derive(Debug)]
pub struct ScenarioContext {
    client: ApiClient,
    fixtures: FixtureGenerator,
    settings: Arc<SuiteSettings>,
}

impl ScenarioContext {
    /// Assemble a context. The client is reset to the primary target.
    #[must_use]
    pub fn new(
        mut client: ApiClient,
        fixtures: FixtureGenerator,
        settings: Arc<SuiteSettings>,
    ) -> Self {
        client.use_primary();
        Self {
            client,
            fixtures,
            settings,
        }
    }

    /// The scenario's client.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The scenario's client, for target switches.
    pub const fn client_mut(&mut self) -> &mut ApiClient {
        &mut self.client
    }

    /// The scenario's fixture generator.
    pub const fn fixtures(&mut self) -> &mut FixtureGenerator {
        &mut self.fixtures
    }

    /// Active settings.
    #[must_use]
    pub fn settings(&self) -> &SuiteSettings {
        &self.settings
    }
}
