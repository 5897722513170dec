//! Batch migration summary

use serde::{Deserialize, Serialize};

use super::{MigrationOutcome, ResultState};

/// Aggregated result of migrating a batch of coordinates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSummary {
    /// Whether this run was a dry-run
    pub dry_run: bool,
    /// One outcome per coordinate, in input order
    pub outcomes: Vec<MigrationOutcome>,
}

impl MigrationSummary {
    /// Creates an empty summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            outcomes: Vec::new(),
        }
    }

    /// Records one coordinate's outcome
    pub fn add_outcome(&mut self, outcome: MigrationOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of successful migrations
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == ResultState::Success)
            .count()
    }

    /// Number of failed migrations
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == ResultState::Failed)
            .count()
    }

    /// Number of skipped migrations
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state == ResultState::Skipped)
            .count()
    }

    /// Total number of coordinates processed
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if any migration failed
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Iterates over failed outcomes only
    pub fn failures(&self) -> impl Iterator<Item = &MigrationOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.state == ResultState::Failed)
    }
}
