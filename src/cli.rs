//! CLI argument parsing module for pkgmig

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Package registry migration tool
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pkgmig",
    version,
    about = "Migrate packages between registries"
)]
pub struct CliArgs {
    /// CSV file listing packages to migrate (owner,repository,type,name,version)
    pub input: PathBuf,

    // Registry endpoints
    /// Base URL of the source registry
    #[arg(long)]
    pub source_url: String,

    /// Base URL of the target registry
    #[arg(long)]
    pub target_url: String,

    /// Auth token for the source registry
    #[arg(long, env = "PKGMIG_SOURCE_TOKEN", hide_env_values = true)]
    pub source_token: String,

    /// Auth token for the target registry
    #[arg(long, env = "PKGMIG_TARGET_TOKEN", hide_env_values = true)]
    pub target_token: String,

    // Organizations
    /// Organization packages are migrated from
    #[arg(long)]
    pub source_org: String,

    /// Organization packages are migrated to
    #[arg(long)]
    pub target_org: String,

    // General options
    /// Working directory for downloads, staging, and reports
    #[arg(long, default_value = "./migration-packages")]
    pub work_dir: PathBuf,

    /// Dry run mode - resolve and report without downloading or publishing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Package filters
    /// Exclude specific packages by name (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Migrate only specific packages by name (can be specified multiple times)
    #[arg(long, action = ArgAction::Append)]
    pub only: Vec<String>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Check if a package should be migrated based on filters
    pub fn should_process_package(&self, name: &str) -> bool {
        // If --only is specified, only process those packages
        if !self.only.is_empty() {
            return self.only.iter().any(|p| p == name);
        }
        // If --exclude is specified, skip those packages
        if self.exclude.iter().any(|p| p == name) {
            return false;
        }
        true
    }
}
