//! Shared entry point of the benchmark executables.

use std::process::ExitCode;
use std::{env, io};

use argh::FromArgs;
use tracing_subscriber::EnvFilter;

use crate::{RunInput, Scenario, run};

/// Runs one micro-benchmark scenario and prints the comparison to stdout. Without options the
/// scenario runs at its published size.
#[derive(FromArgs)]
struct Args {
    /// number of records in each population
    #[argh(option)]
    elements: Option<usize>,

    /// number of timed passes over the population (pass-based scenarios only)
    #[argh(option)]
    iterations: Option<u32>,

    /// skip the warm-up run
    #[argh(switch)]
    skip_warmup: bool,
}

/// Parses the command line, runs the scenario and prints its report.
///
/// Log events go to stderr, filtered by `RUST_LOG` (default `warn`), so that stdout carries
/// only the report.
// Binary entry point - mutations would require subprocess testing which is impractical.
#[doc(hidden)]
#[cfg_attr(test, mutants::skip)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub fn main_for(scenario: Scenario) -> ExitCode {
    let env_args: Vec<String> = env::args().collect();
    let str_args: Vec<&str> = env_args.iter().map(String::as_str).collect();

    let program_name = str_args.first().copied().unwrap_or_else(|| scenario.name());

    let args: Args = match Args::from_args(&[program_name], str_args.get(1..).unwrap_or(&[])) {
        Ok(args) => args,
        Err(early_exit) => {
            println!("{}", early_exit.output);
            return if early_exit.status.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let input = RunInput {
        scenario,
        elements: args.elements,
        iterations: args.iterations,
        skip_warmup: args.skip_warmup,
    };

    match run(&input) {
        Ok(report) => {
            report.print_to_stdout();
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
