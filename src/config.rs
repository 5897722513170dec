//! Explicit migration configuration
//!
//! Providers receive a `MigrationConfig` at construction instead of reading
//! ambient global state, so every operation's inputs are fully determined by
//! its arguments.

use std::path::PathBuf;

use crate::domain::{EndpointFlavor, RegistryEndpoint};
use crate::error::UrlError;

/// Configuration shared by every provider instance for one migration run
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Registry packages are migrated from
    pub source: RegistryEndpoint,
    /// Registry packages are migrated to
    pub target: RegistryEndpoint,
    /// Organization name on the source registry
    pub source_org: String,
    /// Organization name on the target registry
    pub target_org: String,
    /// Root directory under which per-coordinate working directories live
    pub work_root: PathBuf,
}

impl MigrationConfig {
    /// Creates a new configuration, validating both endpoint URLs
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_url: impl Into<String>,
        source_token: impl Into<String>,
        target_url: impl Into<String>,
        target_token: impl Into<String>,
        source_org: impl Into<String>,
        target_org: impl Into<String>,
        work_root: impl Into<PathBuf>,
    ) -> Result<Self, UrlError> {
        Ok(Self {
            source: RegistryEndpoint::new(source_url, EndpointFlavor::Source, source_token)?,
            target: RegistryEndpoint::new(target_url, EndpointFlavor::Target, target_token)?,
            source_org: source_org.into(),
            target_org: target_org.into(),
            work_root: work_root.into(),
        })
    }

    /// Returns true when source and target organizations match
    ///
    /// When they match, manifest rewriting is a no-op rather than an error.
    pub fn organizations_match(&self) -> bool {
        self.source_org == self.target_org
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(source_org: &str, target_org: &str) -> MigrationConfig {
        MigrationConfig::new(
            "https://npm.source.example.com",
            "src-token",
            "https://npm.target.example.com",
            "tgt-token",
            source_org,
            target_org,
            "/tmp/pkgmig-work",
        )
        .unwrap()
    }

    #[test]
    fn test_config_new() {
        let cfg = config("acme", "acme-labs");
        assert_eq!(cfg.source.flavor, EndpointFlavor::Source);
        assert_eq!(cfg.target.flavor, EndpointFlavor::Target);
        assert_eq!(cfg.source.token, "src-token");
        assert_eq!(cfg.target.token, "tgt-token");
        assert_eq!(cfg.work_root, PathBuf::from("/tmp/pkgmig-work"));
    }

    #[test]
    fn test_config_rejects_malformed_source() {
        let err = MigrationConfig::new(
            "::nope::",
            "t",
            "https://ok.example.com",
            "t",
            "a",
            "b",
            "/tmp",
        )
        .unwrap_err();
        assert!(format!("{}", err).contains("malformed registry base URL"));
    }

    #[test]
    fn test_organizations_match() {
        assert!(config("acme", "acme").organizations_match());
        assert!(!config("acme", "acme-labs").organizations_match());
    }
}
