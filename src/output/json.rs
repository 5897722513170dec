//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of migration results
//! - Structured per-coordinate outcome information

use crate::domain::{MigrationOutcome, MigrationSummary};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput {
    /// Whether this was a dry-run
    dry_run: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-coordinate outcomes
    packages: Vec<JsonPackage>,
    /// Report files written
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reports: Vec<String>,
    /// Warnings and export errors encountered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    /// Number of coordinates migrated
    succeeded: usize,
    /// Number of coordinates that failed
    failed: usize,
    /// Number of coordinates skipped
    skipped: usize,
}

/// JSON representation of one coordinate outcome
#[derive(Serialize)]
struct JsonPackage {
    /// Owning organization
    owner: String,
    /// Source repository
    repository: String,
    /// Package ecosystem
    r#type: String,
    /// Package name
    name: String,
    /// Version migrated
    version: String,
    /// Final state (success, failed, skipped)
    state: String,
    /// Lifecycle step reached
    step: String,
    /// Artifact filenames (only in verbose mode)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filenames: Vec<String>,
    /// Failure detail, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl JsonFormatter {
    /// Convert one outcome to its JSON representation
    fn outcome_to_json(&self, outcome: &MigrationOutcome) -> JsonPackage {
        let filenames = if self.verbosity == Verbosity::Verbose {
            outcome.filenames.clone()
        } else {
            Vec::new()
        };

        JsonPackage {
            owner: outcome.coordinate.owner.clone(),
            repository: outcome.coordinate.repository.clone(),
            r#type: outcome.coordinate.package_type.to_string(),
            name: outcome.coordinate.name.clone(),
            version: outcome.coordinate.version.clone(),
            state: outcome.state.to_string(),
            step: outcome.step.to_string(),
            filenames,
            error: outcome.error.clone(),
        }
    }

    fn summary_to_json(summary: &MigrationSummary) -> JsonSummary {
        JsonSummary {
            succeeded: summary.succeeded(),
            failed: summary.failed(),
            skipped: summary.skipped(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            dry_run: result.summary.dry_run,
            summary: Self::summary_to_json(&result.summary),
            packages: result
                .summary
                .outcomes
                .iter()
                .map(|o| self.outcome_to_json(o))
                .collect(),
            reports: result
                .report_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            errors: result.errors.clone(),
        };

        let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_summary(
        &self,
        summary: &MigrationSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&Self::summary_to_json(summary))
            .map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }

    fn format_outcome(
        &self,
        outcome: &MigrationOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.outcome_to_json(outcome))
            .map_err(std::io::Error::other)?;

        writeln!(writer, "{}", json)?;

        Ok(())
    }
}
