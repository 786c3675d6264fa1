//! Binary entry point for stalesweep.
//!
//! Scans a GitHub repository and prints the names of stale, deletable
//! branches, one per line. Deleting them is left to the operator.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr/print_stdout in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use stalesweep::config::HttpConfig;
use stalesweep::github::{GithubClient, RepoId};
use stalesweep::{StaleEvaluator, observability};
use std::collections::HashSet;
use std::process::ExitCode;

/// Stalesweep - finds stale, deletable branches in a GitHub repository.
#[derive(Parser)]
#[command(name = "stalesweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Repository to scan, as owner/name.
    #[arg(short, long)]
    repo: String,

    /// Access token with read access to branches, commits and pull requests.
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Minimum age of the head commit, in days, for a branch to count as stale.
    #[arg(short, long, default_value = "60")]
    age_days: u32,

    /// Branch names to never report (comma-separated, may repeat).
    #[arg(short, long, value_delimiter = ',')]
    ignore: Vec<String>,

    /// API endpoint (GitHub Enterprise installs).
    #[arg(long, default_value = GithubClient::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point.
fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    observability::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the scan and prints the result.
fn run(cli: Cli) -> stalesweep::Result<()> {
    let repo: RepoId = cli.repo.parse()?;
    tracing::info!(repo = %repo, age_days = cli.age_days, "Scanning for stale branches");

    let client = GithubClient::new(repo, cli.token)
        .with_endpoint(cli.endpoint)
        .with_http_config(HttpConfig::from_env());
    let ignore: HashSet<String> = cli.ignore.into_iter().collect();

    let deletable = StaleEvaluator::new(client).deletable_branches(cli.age_days, &ignore)?;

    for name in &deletable {
        println!("{name}");
    }

    Ok(())
}
