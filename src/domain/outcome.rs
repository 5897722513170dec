//! Migration step outcome types

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PackageCoordinate;

/// Outcome of one migration operation
///
/// Terminal per invocation: the orchestrator, not the provider, decides
/// whether a failed operation is ever retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultState {
    /// The operation completed
    Success,
    /// The operation failed; an error carries the detail
    Failed,
    /// The operation was not attempted (dry-run, or an earlier step failed)
    Skipped,
}

impl ResultState {
    /// Returns true for Success
    pub fn is_success(&self) -> bool {
        matches!(self, ResultState::Success)
    }

    /// Returns true for Failed
    pub fn is_failed(&self) -> bool {
        matches!(self, ResultState::Failed)
    }
}

impl fmt::Display for ResultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultState::Success => write!(f, "success"),
            ResultState::Failed => write!(f, "failed"),
            ResultState::Skipped => write!(f, "skipped"),
        }
    }
}

/// Lifecycle step a migration can fail at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStep {
    /// Registry reachability check
    Connect,
    /// Resolving a version to concrete artifact filenames
    FetchPackageFiles,
    /// Fetching an artifact into the working directory
    Download,
    /// Transform and publish of an artifact
    Upload,
    /// All steps finished
    Complete,
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationStep::Connect => write!(f, "connect"),
            MigrationStep::FetchPackageFiles => write!(f, "fetch package files"),
            MigrationStep::Download => write!(f, "download"),
            MigrationStep::Upload => write!(f, "upload"),
            MigrationStep::Complete => write!(f, "complete"),
        }
    }
}

/// Per-coordinate migration record consumed by reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationOutcome {
    /// The coordinate this outcome refers to
    pub coordinate: PackageCoordinate,
    /// Final state of the migration
    pub state: ResultState,
    /// The furthest step reached
    pub step: MigrationStep,
    /// Artifact filenames resolved for the version, if fetch succeeded
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub filenames: Vec<String>,
    /// Error detail when the state is Failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MigrationOutcome {
    /// Creates a successful outcome
    pub fn success(coordinate: PackageCoordinate, filenames: Vec<String>) -> Self {
        Self {
            coordinate,
            state: ResultState::Success,
            step: MigrationStep::Complete,
            filenames,
            error: None,
        }
    }

    /// Creates a failed outcome recording the step that failed
    pub fn failed(
        coordinate: PackageCoordinate,
        step: MigrationStep,
        error: impl Into<String>,
    ) -> Self {
        Self {
            coordinate,
            state: ResultState::Failed,
            step,
            filenames: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// Creates a skipped outcome (dry-run)
    ///
    /// Skipping happens after the version resolved, so the furthest step
    /// reached is the fetch.
    pub fn skipped(coordinate: PackageCoordinate) -> Self {
        Self {
            coordinate,
            state: ResultState::Skipped,
            step: MigrationStep::FetchPackageFiles,
            filenames: Vec::new(),
            error: None,
        }
    }

    /// Attaches the resolved filenames to a failed outcome
    pub fn with_filenames(mut self, filenames: Vec<String>) -> Self {
        self.filenames = filenames;
        self
    }
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => write!(
                f,
                "{}: {} at {} ({})",
                self.coordinate, self.state, self.step, err
            ),
            None => write!(f, "{}: {}", self.coordinate, self.state),
        }
    }
}
