//! `api-suite` entry-point: runs the contract scenario catalogue and prints a
//! per-scenario report followed by the execution summary.

use std::io::{self, Write};
use std::process::ExitCode;

use api_suite::{ConfigError, Runner, RunnerOptions, Scenario, SuiteSettings, catalogue};
use clap::Parser;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

const BINARY_NAME: &str = "api-suite";

/// `api-suite` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "api-suite",
    about = "Run HTTP contract scenarios against JSONPlaceholder",
    version
)]
struct CliArgs {
    /// Only run scenarios whose `suite::name` contains this substring.
    #[arg(long, value_name = "substring")]
    filter: Option<String>,
    /// Maximum number of scenarios in flight.
    #[arg(long, value_name = "n", default_value_t = 1)]
    concurrency: usize,
    /// Base seed for fixture generation, to replay a previous run.
    #[arg(long, value_name = "seed")]
    seed: Option<u64>,
    /// Print scenario names and exit.
    #[arg(long)]
    list: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create Tokio runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to write report: {0}")]
    Output(#[source] io::Error),
}

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match run() {
        Ok(code) => code,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "{err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode, CliError> {
    let args = CliArgs::parse();
    let scenarios = catalogue::all();

    if args.list {
        let mut out = io::stdout().lock();
        for name in listed_names(&scenarios, args.filter.as_deref()) {
            writeln!(out, "{name}").map_err(CliError::Output)?;
        }
        return Ok(ExitCode::SUCCESS);
    }

    let settings = SuiteSettings::load_for(BINARY_NAME)?;
    let options = RunnerOptions {
        filter: args.filter,
        concurrency: args.concurrency,
        fixture_seed: args.seed,
    };
    let runner = Runner::new(settings, options)?;

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let summary = runtime.block_on(runner.run(&scenarios));

    summary
        .write_report(io::stdout().lock())
        .map_err(CliError::Output)?;
    Ok(summary.exit_code())
}

/// Qualified names `--list` prints, narrowed by `--filter` when given.
fn listed_names(scenarios: &[Scenario], filter: Option<&str>) -> Vec<String> {
    scenarios
        .iter()
        .filter(|scenario| filter.is_none_or(|wanted| scenario.matches(wanted)))
        .map(Scenario::qualified_name)
        .collect()
}
