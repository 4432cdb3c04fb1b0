//! Scenario execution and result aggregation.
//!
//! The runner isolates every scenario: a failure or panic is recorded
//! against that scenario only and the run continues. Reports keep catalogue
//! order regardless of concurrency.

use std::any::Any;
use std::fmt;
use std::io::{self, Write};
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use fixtures::FixtureGenerator;
use futures_util::{FutureExt, StreamExt, stream};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::config::SuiteSettings;
use crate::error::{ConfigError, ScenarioError};
use crate::scenario::{Scenario, ScenarioContext};

const SKIP_FILTERED: &str = "filtered out";
const SKIP_SECONDARY_DISABLED: &str = "secondary target disabled";

/// How a run is scoped and scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Only run scenarios whose `suite::name` contains this substring.
    pub filter: Option<String>,
    /// Maximum scenarios in flight. Values below one mean one.
    pub concurrency: usize,
    /// Base seed for fixture generators; scenario `n` uses `seed + n`.
    /// When unset the runner draws one at random and logs it.
    pub fixture_seed: Option<u64>,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            filter: None,
            concurrency: 1,
            fixture_seed: None,
        }
    }
}

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every check held.
    Passed,
    /// A request, check, fixture, or the scenario itself failed.
    Failed(ScenarioError),
    /// The scenario did not run.
    Skipped(String),
}

/// Named outcome with its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// `suite::name` of the scenario.
    pub name: String,
    /// What happened.
    pub outcome: Outcome,
    /// Wall-clock time spent in the scenario body.
    pub elapsed: Duration,
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.elapsed.as_millis();
        match &self.outcome {
            Outcome::Passed => write!(f, "PASS {} ({millis} ms)", self.name),
            Outcome::Failed(error) => write!(f, "FAIL {} ({millis} ms): {error}", self.name),
            Outcome::Skipped(reason) => write!(f, "SKIP {}: {reason}", self.name),
        }
    }
}

/// Aggregated results of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Scenarios that passed.
    pub passed: usize,
    /// Scenarios that failed.
    pub failed: usize,
    /// Scenarios that were skipped.
    pub skipped: usize,
    /// Every report, in catalogue order.
    pub reports: Vec<ScenarioReport>,
}

impl RunSummary {
    /// Tally `reports`.
    #[must_use]
    pub fn from_reports(reports: Vec<ScenarioReport>) -> Self {
        let mut summary = Self::default();
        for report in &reports {
            match report.outcome {
                Outcome::Passed => summary.passed += 1,
                Outcome::Failed(_) => summary.failed += 1,
                Outcome::Skipped(_) => summary.skipped += 1,
            }
        }
        summary.reports = reports;
        summary
    }

    /// Passed, failed, and skipped combined.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    /// Whether no scenario failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status for this run.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// Reports of failed scenarios.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.reports
            .iter()
            .filter(|report| matches!(report.outcome, Outcome::Failed(_)))
    }

    /// Write one line per scenario followed by the summary block.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn write_report(&self, mut out: impl Write) -> io::Result<()> {
        for report in &self.reports {
            writeln!(out, "{report}")?;
        }
        writeln!(out, "===== TEST EXECUTION SUMMARY =====")?;
        writeln!(out, "Passed tests: {}", self.passed)?;
        writeln!(out, "Failed tests: {}", self.failed)?;
        writeln!(out, "Skipped tests: {}", self.skipped)?;
        writeln!(out, "Total tests: {}", self.total())
    }
}

/// Runs scenarios against configured targets.
#[derive(Debug)]
pub struct Runner {
    settings: Arc<SuiteSettings>,
    client: ApiClient,
    options: RunnerOptions,
    fixture_seed: u64,
}

impl Runner {
    /// Build a runner and its shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a target is misconfigured.
    pub fn new(settings: SuiteSettings, options: RunnerOptions) -> Result<Self, ConfigError> {
        let client = ApiClient::new(&settings)?;
        let fixture_seed = options.fixture_seed.unwrap_or_else(rand::random);
        info!(fixture_seed, "fixture seed chosen; pass --seed to replay");
        Ok(Self {
            settings: Arc::new(settings),
            client,
            options,
            fixture_seed,
        })
    }

    /// Active options.
    #[must_use]
    pub const fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Base fixture seed of this run, drawn at random unless configured.
    #[must_use]
    pub const fn fixture_seed(&self) -> u64 {
        self.fixture_seed
    }

    /// Run `scenarios` and tally the outcomes.
    pub async fn run(&self, scenarios: &[Scenario]) -> RunSummary {
        let reports = stream::iter(scenarios.iter().enumerate())
            .map(|(position, scenario)| self.run_one(position, scenario))
            .buffered(self.options.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;
        let summary = RunSummary::from_reports(reports);
        info!(
            passed = summary.passed,
            failed = summary.failed,
            skipped = summary.skipped,
            "run finished"
        );
        summary
    }

    async fn run_one(&self, position: usize, scenario: &Scenario) -> ScenarioReport {
        let name = scenario.qualified_name();
        if let Some(reason) = self.skip_reason(scenario) {
            debug!(scenario = %name, reason, "scenario skipped");
            return ScenarioReport {
                name,
                outcome: Outcome::Skipped(reason.to_owned()),
                elapsed: Duration::ZERO,
            };
        }

        let fixtures = self.fixtures_for(position);
        info!(scenario = %name, fixture_seed = fixtures.seed(), "scenario started");
        let mut context =
            ScenarioContext::new(self.client.clone(), fixtures, Arc::clone(&self.settings));

        let started = Instant::now();
        let result = AssertUnwindSafe(scenario.run(&mut context))
            .catch_unwind()
            .await;
        let elapsed = started.elapsed();

        let outcome = match result {
            Ok(Ok(())) => Outcome::Passed,
            Ok(Err(error)) => Outcome::Failed(error),
            Err(payload) => Outcome::Failed(ScenarioError::Panicked {
                message: panic_message(&*payload),
            }),
        };
        match &outcome {
            Outcome::Passed => info!(scenario = %name, "scenario passed"),
            Outcome::Failed(error) => warn!(scenario = %name, %error, "scenario failed"),
            Outcome::Skipped(_) => {}
        }
        ScenarioReport {
            name,
            outcome,
            elapsed,
        }
    }

    fn skip_reason(&self, scenario: &Scenario) -> Option<&'static str> {
        if self
            .options
            .filter
            .as_deref()
            .is_some_and(|filter| !scenario.matches(filter))
        {
            return Some(SKIP_FILTERED);
        }
        if scenario.needs_secondary() && !self.settings.secondary_enabled() {
            return Some(SKIP_SECONDARY_DISABLED);
        }
        None
    }

    fn fixtures_for(&self, position: usize) -> FixtureGenerator {
        let offset = u64::try_from(position).unwrap_or(u64::MAX);
        FixtureGenerator::seeded(self.fixture_seed.wrapping_add(offset))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssertionFailure;
    use crate::scenario::ScenarioFuture;
    use rstest::{fixture, rstest};

    fn passes(_context: &mut ScenarioContext) -> ScenarioFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    fn fails(_context: &mut ScenarioContext) -> ScenarioFuture<'_> {
        Box::pin(async {
            Err(ScenarioError::from(AssertionFailure::new(
                "status code",
                "200",
                "404",
            )))
        })
    }

    fn explode() {
        panic!("scenario exploded");
    }

    fn panics(_context: &mut ScenarioContext) -> ScenarioFuture<'_> {
        Box::pin(async {
            explode();
            Ok(())
        })
    }

    fn records_seed(context: &mut ScenarioContext) -> ScenarioFuture<'_> {
        Box::pin(async move {
            let seed = context.fixtures().seed();
            Err(ScenarioError::from(AssertionFailure::new(
                "seed",
                "",
                seed.to_string(),
            )))
        })
    }

    fn catalogue() -> Vec<Scenario> {
        vec![
            Scenario::new("demo", "passes", passes),
            Scenario::new("demo", "fails", fails),
            Scenario::new("demo", "panics", panics),
            Scenario::new("demo", "secondary", passes).requiring_secondary(),
        ]
    }

    #[fixture]
    fn runner() -> Runner {
        Runner::new(SuiteSettings::builtin(), RunnerOptions::default()).expect("runner builds")
    }

    #[rstest]
    #[tokio::test]
    async fn failures_and_panics_are_isolated(runner: Runner) {
        let summary = runner.run(&catalogue()).await;

        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 4);
        assert!(!summary.is_success());

        let names: Vec<_> = summary.reports.iter().map(|report| report.name.as_str()).collect();
        assert_eq!(
            names,
            ["demo::passes", "demo::fails", "demo::panics", "demo::secondary"]
        );
        let panicked = summary
            .reports
            .iter()
            .find(|report| report.name == "demo::panics")
            .expect("panicking scenario reported");
        assert_eq!(
            panicked.outcome,
            Outcome::Failed(ScenarioError::Panicked {
                message: "scenario exploded".to_owned()
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn concurrency_keeps_catalogue_order() {
        let options = RunnerOptions {
            concurrency: 3,
            ..RunnerOptions::default()
        };
        let runner = Runner::new(SuiteSettings::builtin(), options).expect("runner builds");
        let summary = runner.run(&catalogue()).await;
        let names: Vec<_> = summary.reports.iter().map(|report| report.name.as_str()).collect();
        assert_eq!(
            names,
            ["demo::passes", "demo::fails", "demo::panics", "demo::secondary"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn filtered_scenarios_are_skipped() {
        let options = RunnerOptions {
            filter: Some("passes".to_owned()),
            ..RunnerOptions::default()
        };
        let runner = Runner::new(SuiteSettings::builtin(), options).expect("runner builds");
        let summary = runner.run(&catalogue()).await;
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.skipped, 3);
        assert!(summary.is_success());
        assert!(summary.reports.iter().any(|report| report.outcome
            == Outcome::Skipped(SKIP_FILTERED.to_owned())));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_seeds_follow_catalogue_position() {
        let options = RunnerOptions {
            fixture_seed: Some(100),
            ..RunnerOptions::default()
        };
        let runner = Runner::new(SuiteSettings::builtin(), options).expect("runner builds");
        let scenarios = [
            Scenario::new("seed", "first", records_seed),
            Scenario::new("seed", "second", records_seed),
        ];
        let summary = runner.run(&scenarios).await;
        assert_eq!(recorded_seeds(&summary), ["100", "101"]);
    }

    fn recorded_seeds(summary: &RunSummary) -> Vec<String> {
        summary
            .failures()
            .map(|report| match &report.outcome {
                Outcome::Failed(ScenarioError::Assertion(failure)) => failure.actual.clone(),
                other => panic!("unexpected outcome: {other:?}"),
            })
            .collect()
    }

    #[rstest]
    #[tokio::test]
    async fn unseeded_runs_draw_one_base_seed(runner: Runner) {
        let base = runner.fixture_seed();
        let scenarios = [
            Scenario::new("seed", "first", records_seed),
            Scenario::new("seed", "second", records_seed),
        ];

        let summary = runner.run(&scenarios).await;

        assert_eq!(
            recorded_seeds(&summary),
            [base.to_string(), base.wrapping_add(1).to_string()]
        );
    }

    #[test]
    fn report_ends_with_the_summary_block() {
        let summary = RunSummary::from_reports(vec![
            ScenarioReport {
                name: "users::get_user_by_id".to_owned(),
                outcome: Outcome::Passed,
                elapsed: Duration::from_millis(12),
            },
            ScenarioReport {
                name: "authentication::secondary_login_with_valid_credentials".to_owned(),
                outcome: Outcome::Skipped(SKIP_SECONDARY_DISABLED.to_owned()),
                elapsed: Duration::ZERO,
            },
        ]);
        let mut out = Vec::new();
        summary.write_report(&mut out).expect("write to vec");
        let text = String::from_utf8(out).expect("utf-8 report");
        assert_eq!(
            text,
            concat!(
                "PASS users::get_user_by_id (12 ms)\n",
                "SKIP authentication::secondary_login_with_valid_credentials: secondary target disabled\n",
                "===== TEST EXECUTION SUMMARY =====\n",
                "Passed tests: 1\n",
                "Failed tests: 0\n",
                "Skipped tests: 1\n",
                "Total tests: 2\n",
            )
        );
    }

    #[rstest]
    #[case(Box::new("static message") as Box<dyn Any + Send>, "static message")]
    #[case(Box::new("owned message".to_owned()) as Box<dyn Any + Send>, "owned message")]
    #[case(Box::new(7_u8) as Box<dyn Any + Send>, "non-string panic payload")]
    fn panic_payloads_render_as_text(#[case] payload: Box<dyn Any + Send>, #[case] expected: &str) {
        assert_eq!(panic_message(&*payload), expected);
    }
}
