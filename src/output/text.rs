//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Per-coordinate migration result display with colors
//! - Failure display naming the failing lifecycle step
//! - Summary with success/failed/skipped breakdown
//! - Report path and warning display

use crate::domain::{MigrationOutcome, MigrationSummary, ResultState};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether this is a dry-run
    dry_run: bool,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    /// Get the dry-run prefix if applicable
    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            if self.color {
                format!("{} ", "(dry-run)".cyan())
            } else {
                "(dry-run) ".to_string()
            }
        } else {
            String::new()
        }
    }

    /// Status marker for one outcome
    fn state_marker(&self, state: ResultState) -> String {
        match (state, self.color) {
            (ResultState::Success, true) => "✓".green().to_string(),
            (ResultState::Success, false) => "+".to_string(),
            (ResultState::Failed, true) => "✗".red().to_string(),
            (ResultState::Failed, false) => "!".to_string(),
            (ResultState::Skipped, true) => "-".dimmed().to_string(),
            (ResultState::Skipped, false) => "-".to_string(),
        }
    }

    /// Format one outcome line, plus detail lines in verbose mode
    fn format_outcome_line(
        &self,
        outcome: &MigrationOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let marker = self.state_marker(outcome.state);
        let coordinate = outcome.coordinate.to_string();

        match outcome.state {
            ResultState::Success => {
                if self.color {
                    writeln!(writer, "  {} {}", marker, coordinate.bright_white())?;
                } else {
                    writeln!(writer, "  {} {}", marker, coordinate)?;
                }
            }
            ResultState::Failed => {
                let error = outcome.error.as_deref().unwrap_or("unknown error");
                if self.color {
                    writeln!(
                        writer,
                        "  {} {} {} {}",
                        marker,
                        coordinate.bright_white(),
                        format!("[{}]", outcome.step).red(),
                        error.dimmed()
                    )?;
                } else {
                    writeln!(
                        writer,
                        "  {} {} [{}] {}",
                        marker, coordinate, outcome.step, error
                    )?;
                }
            }
            ResultState::Skipped => {
                if self.color {
                    writeln!(writer, "  {} {}", marker, coordinate.dimmed())?;
                } else {
                    writeln!(writer, "  {} {} (skipped)", marker, coordinate)?;
                }
            }
        }

        if self.verbosity == Verbosity::Verbose {
            for filename in &outcome.filenames {
                if self.color {
                    writeln!(writer, "      {}", filename.dimmed())?;
                } else {
                    writeln!(writer, "      {}", filename)?;
                }
            }
        }

        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show summary
        if self.verbosity == Verbosity::Quiet {
            return self.format_summary(&result.summary, writer);
        }

        if !result.summary.outcomes.is_empty() {
            writeln!(writer, "{}Packages:", self.dry_run_prefix())?;
            for outcome in &result.summary.outcomes {
                self.format_outcome_line(outcome, writer)?;
            }
            writeln!(writer)?;
        }

        // Format warnings and export errors if any
        if !result.errors.is_empty() {
            if self.color {
                writeln!(writer, "{}:", "Warnings".yellow().bold())?;
            } else {
                writeln!(writer, "Warnings:")?;
            }
            for error in &result.errors {
                if self.color {
                    writeln!(writer, "  {} {}", "!".yellow(), error)?;
                } else {
                    writeln!(writer, "  - {}", error)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_summary(&result.summary, writer)?;

        // Verbose: show where reports were written
        if self.verbosity == Verbosity::Verbose && !result.report_paths.is_empty() {
            writeln!(writer)?;
            if self.color {
                writeln!(writer, "{}:", "Reports".dimmed())?;
            } else {
                writeln!(writer, "Reports:")?;
            }
            for path in &result.report_paths {
                writeln!(writer, "  {}", path.display())?;
            }
        }

        Ok(())
    }

    fn format_summary(
        &self,
        summary: &MigrationSummary,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();
        let succeeded = summary.succeeded();
        let failed = summary.failed();
        let skipped = summary.skipped();

        if self.verbosity == Verbosity::Quiet {
            if summary.total() == 0 {
                if self.color {
                    writeln!(writer, "{}{}", prefix, "No packages".dimmed())?;
                } else {
                    writeln!(writer, "{}No packages", prefix)?;
                }
            } else if self.color {
                writeln!(
                    writer,
                    "{}{} migrated, {} failed",
                    prefix,
                    succeeded.to_string().green(),
                    failed.to_string().red()
                )?;
            } else {
                writeln!(writer, "{}{} migrated, {} failed", prefix, succeeded, failed)?;
            }
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}{}:", prefix, "Summary".bold())?;
            writeln!(
                writer,
                "  {} package(s) migrated",
                succeeded.to_string().green()
            )?;
            if failed > 0 {
                writeln!(writer, "  {} package(s) failed", failed.to_string().red())?;
            }
            if skipped > 0 {
                writeln!(
                    writer,
                    "  {} package(s) skipped",
                    skipped.to_string().dimmed()
                )?;
            }
        } else {
            writeln!(writer, "{}Summary:", prefix)?;
            writeln!(writer, "  {} package(s) migrated", succeeded)?;
            if failed > 0 {
                writeln!(writer, "  {} package(s) failed", failed)?;
            }
            if skipped > 0 {
                writeln!(writer, "  {} package(s) skipped", skipped)?;
            }
        }

        Ok(())
    }

    fn format_outcome(
        &self,
        outcome: &MigrationOutcome,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        self.format_outcome_line(outcome, writer)
    }
}
