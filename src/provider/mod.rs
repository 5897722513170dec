//! Provider contract for registry flavors
//!
//! This module provides:
//! - The polymorphic migration capability trait every registry implements
//! - Shared resolve-URL-then-transfer scaffolding
//! - A factory mapping package types to concrete providers

mod npm;

pub use npm::NpmProvider;

use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::config::MigrationConfig;
use crate::domain::{PackageCoordinate, PackageType};
use crate::error::{ConfigError, FilesystemError, MigrationError, UrlError};
use crate::registry::TransferClient;
use crate::report;

/// Migration capability set every registry flavor supplies
///
/// One instance serves one migration run; configuration (endpoints, tokens,
/// organizations) is fixed at construction so every operation's behavior is
/// determined by its arguments.
#[async_trait]
pub trait Provider: Send + Sync {
    /// The ecosystem this provider handles
    fn package_type(&self) -> PackageType;

    /// The configuration this provider was built with
    fn config(&self) -> &MigrationConfig;

    /// Establish/validate registry reachability
    ///
    /// A no-op is permitted for stateless HTTP registries.
    async fn connect(&self) -> Result<(), MigrationError>;

    /// Resolve a version to one or more concrete artifact filenames
    ///
    /// Some ecosystems map one version to several files; each filename is
    /// then downloaded and uploaded independently.
    async fn fetch_package_files(
        &self,
        coordinate: &PackageCoordinate,
    ) -> Result<Vec<String>, MigrationError>;

    /// Fetch one artifact into the coordinate's working directory
    ///
    /// Returns the local path of the downloaded file.
    async fn download(
        &self,
        coordinate: &PackageCoordinate,
        filename: &str,
    ) -> Result<PathBuf, MigrationError>;

    /// Rewrite ownership references in a manifest file in place
    ///
    /// No-op when source and target organizations match. Used standalone
    /// and as the transform step inside upload.
    fn rename(&self, manifest_path: &Path) -> Result<(), MigrationError>;

    /// Transform and publish one downloaded artifact
    ///
    /// Runs the full archive transform pipeline; returns non-fatal warnings
    /// (cleanup failures) on success.
    async fn upload(
        &self,
        coordinate: &PackageCoordinate,
        filename: &str,
    ) -> Result<Vec<String>, MigrationError>;

    /// Write a migration report for one owner
    ///
    /// The shared default writes CSV rows under `<workRoot>/reports`;
    /// flavors may override with an ecosystem-specific side channel.
    fn export(
        &self,
        owner: &str,
        summary: &crate::domain::MigrationSummary,
    ) -> Result<PathBuf, MigrationError> {
        let dir = self.config().work_root.join("reports");
        let path = report::write_csv_report(&dir, owner, summary)?;
        Ok(path)
    }
}

/// Resolves a URL, then runs a transfer against it
///
/// Shared scaffolding so concrete providers differ only in URL shape and
/// transform, not in the transfer mechanics.
pub(crate) async fn resolve_and_transfer<T, R, F, Fut>(
    resolve: R,
    transfer: F,
) -> Result<T, MigrationError>
where
    R: FnOnce() -> Result<String, UrlError>,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<T, MigrationError>>,
{
    let url = resolve()?;
    transfer(url).await
}

/// Creates the coordinate's working directory under the configured root
pub(crate) fn ensure_working_dir(
    config: &MigrationConfig,
    coordinate: &PackageCoordinate,
) -> Result<PathBuf, FilesystemError> {
    let dir = coordinate.working_dir(&config.work_root);
    std::fs::create_dir_all(&dir).map_err(|e| FilesystemError::create_dir(&dir, e))?;
    Ok(dir)
}

/// Create a provider for the given package type
///
/// Only npm is implemented today; sibling ecosystems share the same
/// contract shape but their manifest locations and publish tooling are
/// unconfirmed, so they are rejected with a typed error.
pub fn create_provider(
    package_type: PackageType,
    config: MigrationConfig,
    client: TransferClient,
) -> Result<Box<dyn Provider>, ConfigError> {
    match package_type {
        PackageType::Npm => Ok(Box::new(NpmProvider::new(config, client))),
        other => Err(ConfigError::UnsupportedPackageType {
            package_type: other,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PackageCoordinate;

    fn config() -> MigrationConfig {
        MigrationConfig::new(
            "https://npm.source.example.com",
            "src-token",
            "https://npm.target.example.com",
            "tgt-token",
            "acme",
            "acme-labs",
            "/tmp/pkgmig-test",
        )
        .unwrap()
    }

    #[test]
    fn test_create_provider_npm() {
        let provider =
            create_provider(PackageType::Npm, config(), TransferClient::new().unwrap()).unwrap();
        assert_eq!(provider.package_type(), PackageType::Npm);
    }

    #[test]
    fn test_create_provider_unsupported() {
        for package_type in [
            PackageType::Maven,
            PackageType::Nuget,
            PackageType::Rubygems,
            PackageType::Container,
        ] {
            let err = create_provider(package_type, config(), TransferClient::new().unwrap())
                .err()
                .unwrap();
            assert!(matches!(err, ConfigError::UnsupportedPackageType { .. }));
        }
    }

    #[tokio::test]
    async fn test_resolve_and_transfer_propagates_url_error() {
        let result: Result<(), MigrationError> = resolve_and_transfer(
            || {
                Err(UrlError::MalformedBase {
                    url: "bad".to_string(),
                    message: "nope".to_string(),
                })
            },
            |_url| async { Ok(()) },
        )
        .await;
        assert!(matches!(result, Err(MigrationError::Url(_))));
    }

    #[tokio::test]
    async fn test_resolve_and_transfer_passes_url_through() {
        let result: Result<String, MigrationError> = resolve_and_transfer(
            || Ok("https://npm.example.com/@acme/widget".to_string()),
            |url| async move { Ok(url) },
        )
        .await;
        assert_eq!(result.unwrap(), "https://npm.example.com/@acme/widget");
    }

    #[test]
    fn test_ensure_working_dir_creates_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config();
        cfg.work_root = dir.path().to_path_buf();
        let coord = PackageCoordinate::new("acme", "widget", PackageType::Npm, "widget", "1.0.0");

        let work_dir = ensure_working_dir(&cfg, &coord).unwrap();
        assert!(work_dir.is_dir());
        assert!(work_dir.ends_with("acme/npm/widget/widget/1.0.0"));
    }
}
