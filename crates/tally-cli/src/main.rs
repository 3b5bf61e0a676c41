use anyhow::Result;
use clap::{ArgAction, Parser};
use tally_config::Isolation;

mod commands;
mod logging;
mod reporter;

/// Tally: a minimal xUnit-style test engine that tests itself.
///
/// Runs the built-in self-test suite and prints one summary line,
/// "<run> run, <failed> failed".
///
/// EXAMPLES:
///     tally                          Run the self-test suite
///     tally --filter result          Only cases whose name contains "result"
///     tally --isolation test-body    Guard only the test method
///     tally --strict                 Exit 1 if any case failed
///
/// CONFIGURATION:
///     tally.toml [run] table, searched upward from the working directory.
///     TALLY_ISOLATION, TALLY_PARALLEL, TALLY_STRICT, NO_COLOR override it;
///     flags override both.
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version)]
struct Cli {
    /// Only run self-tests whose name contains this pattern
    #[arg(long, short = 'f')]
    filter: Option<String>,
    /// Failure isolation boundary (test-body or lifecycle)
    #[arg(long, value_parser = parse_isolation)]
    isolation: Option<Isolation>,
    /// Run cases on a thread pool instead of in order
    #[arg(long)]
    parallel: bool,
    /// Exit with status 1 when any case failed
    #[arg(long)]
    strict: bool,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn parse_isolation(value: &str) -> Result<Isolation, tally_config::ConfigError> {
    value.parse()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    logging::install_panic_hook();

    let cwd = std::env::current_dir()?;
    let config = tally_config::ConfigLoader::new().load_from_directory(&cwd)?;

    let args = commands::run::RunArgs {
        filter: cli.filter,
        isolation: cli.isolation,
        parallel: cli.parallel,
        strict: cli.strict,
        no_color: cli.no_color,
    };

    let outcome = commands::run::run(args, config.run)?;
    log::debug!(
        "{} of {} case(s) passed",
        outcome.result.passed_count(),
        outcome.result.run_count()
    );
    if let Some(code) = outcome.exit_code {
        std::process::exit(code);
    }

    Ok(())
}
