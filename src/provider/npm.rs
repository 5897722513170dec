//! npm registry provider
//!
//! Fetches version metadata from the source npm registry, downloads the
//! version's tarball, and republishes it to the target registry through
//! `npm publish` with a staged `.npmrc`.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::MigrationConfig;
use crate::domain::{PackageCoordinate, PackageType};
use crate::error::{MigrationError, NetworkError};
use crate::pipeline::{ArchivePipeline, StagedCredentials, ToolCommand};
use crate::registry::{urls, TransferClient};
use crate::rewrite;

use super::{ensure_working_dir, resolve_and_transfer, Provider};

/// Manifest location inside an extracted npm tarball
const MANIFEST_REL_PATH: &str = "package/package.json";

/// Directory name npm tarballs extract into
const EXTRACTED_DIR: &str = "package";

/// npm package metadata response
#[derive(Debug, Deserialize)]
struct NpmPackageMetadata {
    /// Available versions keyed by version string
    versions: HashMap<String, NpmVersionMetadata>,
}

/// Per-version metadata
#[derive(Debug, Deserialize)]
struct NpmVersionMetadata {
    /// Distribution info carrying the tarball URL
    dist: NpmDistInfo,
}

/// Distribution info for one version
#[derive(Debug, Deserialize)]
struct NpmDistInfo {
    /// Fully-qualified tarball download URL
    tarball: String,
}

/// npm flavor of the Provider contract
pub struct NpmProvider {
    config: MigrationConfig,
    client: TransferClient,
    /// Publish command override, used by tests to substitute a stub
    publish_override: Option<ToolCommand>,
}

impl NpmProvider {
    /// Create a new npm provider
    pub fn new(config: MigrationConfig, client: TransferClient) -> Self {
        Self {
            config,
            client,
            publish_override: None,
        }
    }

    /// Replace the publish command (for testing)
    pub fn with_publish_command(mut self, command: ToolCommand) -> Self {
        self.publish_override = Some(command);
        self
    }

    /// Builds the `.npmrc` staged next to the artifact before publish
    ///
    /// Two lines: an auth-token line scoped to the target registry host and
    /// a registry line scoped to the owner.
    fn npmrc(&self, owner: &str) -> StagedCredentials {
        let content = format!(
            "//{}/:_authToken={}\nregistry={}/{}",
            self.config.target.host(),
            self.config.target.token,
            self.config.target.base_url.trim_end_matches('/'),
            owner
        );
        StagedCredentials {
            filename: ".npmrc".to_string(),
            content,
        }
    }

    /// Builds the npm publish command for one repackaged artifact
    fn publish_command(&self, artifact: &str, npmrc: &Path) -> ToolCommand {
        if let Some(command) = &self.publish_override {
            return command.clone();
        }
        ToolCommand::new(
            "npm",
            vec![
                "publish".to_string(),
                artifact.to_string(),
                format!(
                    "--registry={}",
                    self.config.target.base_url.trim_end_matches('/')
                ),
                "--verbose".to_string(),
                "--ignore-scripts".to_string(),
                "--no-engine-strict".to_string(),
                "--userconfig".to_string(),
                npmrc.display().to_string(),
            ],
        )
    }

    /// Builds the transform pipeline for one coordinate
    fn pipeline(&self, coordinate: &PackageCoordinate) -> ArchivePipeline {
        ArchivePipeline::new(
            coordinate.working_dir(&self.config.work_root),
            &self.config.source_org,
            &self.config.target_org,
            self.npmrc(&coordinate.owner),
            MANIFEST_REL_PATH,
            EXTRACTED_DIR,
        )
    }
}

#[async_trait]
impl Provider for NpmProvider {
    fn package_type(&self) -> PackageType {
        PackageType::Npm
    }

    fn config(&self) -> &MigrationConfig {
        &self.config
    }

    async fn connect(&self) -> Result<(), MigrationError> {
        // Stateless HTTP registry: nothing to establish
        Ok(())
    }

    async fn fetch_package_files(
        &self,
        coordinate: &PackageCoordinate,
    ) -> Result<Vec<String>, MigrationError> {
        let body = resolve_and_transfer(
            || urls::fetch_url(&self.config.source, coordinate),
            |url| async move {
                let bytes = self
                    .client
                    .fetch_metadata(&url, &self.config.source.token)
                    .await?;
                Ok((url, bytes))
            },
        )
        .await;
        let (url, bytes) = body?;

        let metadata: NpmPackageMetadata = serde_json::from_slice(&bytes)
            .map_err(|e| NetworkError::invalid_response(&url, e.to_string()))?;

        let version = metadata.versions.get(&coordinate.version).ok_or_else(|| {
            NetworkError::invalid_response(
                &url,
                format!("version {} not present in metadata", coordinate.version),
            )
        })?;

        let filename = tarball_filename(&version.dist.tarball)
            .map_err(|message| NetworkError::invalid_response(&url, message))?;

        Ok(vec![filename])
    }

    async fn download(
        &self,
        coordinate: &PackageCoordinate,
        filename: &str,
    ) -> Result<PathBuf, MigrationError> {
        let work_dir = ensure_working_dir(&self.config, coordinate)?;
        // Downloads land under the canonical local name, whatever the
        // registry called the file
        let destination = work_dir.join(coordinate.artifact_filename());

        resolve_and_transfer(
            || urls::download_url(&self.config.source, coordinate, filename),
            |url| {
                let destination = destination.clone();
                async move {
                    self.client
                        .download_artifact(&url, &destination, &self.config.source.token)
                        .await
                }
            },
        )
        .await?;

        Ok(destination)
    }

    fn rename(&self, manifest_path: &Path) -> Result<(), MigrationError> {
        if self.config.organizations_match() {
            return Ok(());
        }
        rewrite::rewrite_file(
            manifest_path,
            &self.config.source_org,
            &self.config.target_org,
        )?;
        Ok(())
    }

    async fn upload(
        &self,
        coordinate: &PackageCoordinate,
        _filename: &str,
    ) -> Result<Vec<String>, MigrationError> {
        let pipeline = self.pipeline(coordinate);
        let artifact = coordinate.artifact_filename();
        let publish = self.publish_command(&artifact, &pipeline.credentials_path());

        // The pipeline blocks on tar and npm subprocesses; within one
        // coordinate there is no parallelism to preserve
        let warnings = pipeline.run(&artifact, &publish)?;
        Ok(warnings)
    }
}

/// Extracts the filename from a tarball URL's path
fn tarball_filename(tarball_url: &str) -> Result<String, String> {
    let parsed = reqwest::Url::parse(tarball_url)
        .map_err(|e| format!("malformed tarball URL '{}': {}", tarball_url, e))?;
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .ok_or_else(|| format!("tarball URL '{}' has no filename", tarball_url))
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
            "/tmp/pkgmig-npm-test",
        )
        .unwrap()
    }

    fn provider(source_org: &str, target_org: &str) -> NpmProvider {
        NpmProvider::new(config(source_org, target_org), TransferClient::new().unwrap())
    }

    #[test]
    fn test_package_type() {
        assert_eq!(provider("a", "b").package_type(), PackageType::Npm);
    }

    #[test]
    fn test_npmrc_content() {
        let p = provider("acme", "acme-labs");
        let creds = p.npmrc("acme");
        assert_eq!(creds.filename, ".npmrc");
        assert_eq!(
            creds.content,
            "//npm.target.example.com/:_authToken=tgt-token\nregistry=https://npm.target.example.com/acme"
        );
    }

    #[test]
    fn test_publish_command() {
        let p = provider("acme", "acme-labs");
        let cmd = p.publish_command("widget-1.0.0.tgz", Path::new("/work/.npmrc"));
        assert_eq!(cmd.program, "npm");
        assert_eq!(cmd.args[0], "publish");
        assert_eq!(cmd.args[1], "widget-1.0.0.tgz");
        assert!(cmd
            .args
            .contains(&"--registry=https://npm.target.example.com".to_string()));
        assert!(cmd.args.contains(&"--ignore-scripts".to_string()));
        assert!(cmd.args.contains(&"--userconfig".to_string()));
        assert!(cmd.args.contains(&"/work/.npmrc".to_string()));
    }

    #[test]
    fn test_publish_command_override() {
        let stub = ToolCommand::new("true", vec![]);
        let p = provider("a", "b").with_publish_command(stub);
        let cmd = p.publish_command("x.tgz", Path::new("/x/.npmrc"));
        assert_eq!(cmd.program, "true");
    }

    #[test]
    fn test_rename_noop_when_orgs_match() {
        let p = provider("acme", "acme");
        // Path does not exist; the short-circuit must not touch it
        p.rename(Path::new("/nonexistent/package.json")).unwrap();
    }

    #[test]
    fn test_rename_rewrites_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("package.json");
        std::fs::write(&manifest, r#"{"name": "@acme/widget"}"#).unwrap();

        let p = provider("acme", "acme-labs");
        p.rename(&manifest).unwrap();

        let content = std::fs::read_to_string(&manifest).unwrap();
        assert_eq!(content, r#"{"name": "@acme-labs/widget"}"#);
    }

    #[test]
    fn test_rename_missing_manifest_fails() {
        let p = provider("acme", "acme-labs");
        let err = p.rename(Path::new("/nonexistent/package.json")).unwrap_err();
        assert!(matches!(err, MigrationError::Transform(_)));
    }

    #[test]
    fn test_tarball_filename() {
        assert_eq!(
            tarball_filename("https://npm.example.com/download/@acme/widget/1.0.0/widget-1.0.0.tgz")
                .unwrap(),
            "widget-1.0.0.tgz"
        );
    }

    #[test]
    fn test_tarball_filename_malformed_url() {
        assert!(tarball_filename("not a url").is_err());
    }

    #[test]
    fn test_metadata_parsing() {
        let json = r#"{
            "name": "@acme/widget",
            "dist-tags": {"latest": "1.0.0"},
            "versions": {
                "1.0.0": {
                    "name": "@acme/widget",
                    "dist": {
                        "shasum": "abc",
                        "tarball": "https://npm.example.com/download/@acme/widget/1.0.0/widget-1.0.0.tgz"
                    }
                }
            }
        }"#;
        let metadata: NpmPackageMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.versions.len(), 1);
        assert!(metadata.versions["1.0.0"].dist.tarball.ends_with("widget-1.0.0.tgz"));
    }

    #[tokio::test]
    async fn test_connect_is_noop() {
        provider("a", "b").connect().await.unwrap();
    }
}
