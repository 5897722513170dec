//! pkgmig - Package registry migration CLI tool
//!
//! Migrates published packages from a source registry to a target registry,
//! rewriting organization references in package manifests along the way.

use clap::Parser;
use pkgmig::cli::CliArgs;
use pkgmig::config::MigrationConfig;
use pkgmig::orchestrator::Orchestrator;
use pkgmig::output::{create_formatter, OutputConfig};
use pkgmig::report;
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    // Print run info in verbose mode
    if args.verbose {
        eprintln!("pkgmig v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Source: {} ({})", args.source_url, args.source_org);
        eprintln!("Target: {} ({})", args.target_url, args.target_org);
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let config = MigrationConfig::new(
        &args.source_url,
        &args.source_token,
        &args.target_url,
        &args.target_token,
        &args.source_org,
        &args.target_org,
        &args.work_dir,
    )?;

    let mut coordinates = report::read_coordinates_csv(&args.input)?;
    coordinates.retain(|c| args.should_process_package(&c.name));

    // Create and run the orchestrator; progress bars stay off in quiet
    // mode and when output is machine-parsed
    let orchestrator = Orchestrator::new(config, args.dry_run)?;
    let show_progress = !args.quiet && !args.json;
    let result = orchestrator
        .run_with_progress(coordinates, show_progress)
        .await;

    // Create output formatter based on CLI options
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run);
    let formatter = create_formatter(output_config);

    // Output results
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    // Return appropriate exit code
    if result.summary.has_failures() {
        // Partial success - some coordinates failed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
