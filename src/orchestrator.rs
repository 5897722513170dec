//! Migration orchestrator
//!
//! Drives each package coordinate through the provider lifecycle:
//! connect → fetch package files → download → upload → export. The first
//! failing step is terminal for that coordinate in this pass; the batch
//! always continues to the next coordinate. Retry policy, if any, belongs
//! to the loop invoking the orchestrator, never to the orchestrator itself.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::MigrationConfig;
use crate::domain::{
    MigrationOutcome, MigrationStep, MigrationSummary, PackageCoordinate, PackageType,
};
use crate::progress::Progress;
use crate::provider::{create_provider, Provider};
use crate::registry::TransferClient;
use crate::report;

/// Orchestrator for one migration run
pub struct Orchestrator {
    /// Shared configuration handed to every provider
    config: MigrationConfig,
    /// HTTP client shared across providers
    client: TransferClient,
    /// Resolve and report without downloading or publishing
    dry_run: bool,
}

/// Result of running the orchestrator over a batch
pub struct OrchestratorResult {
    /// Per-coordinate outcomes
    pub summary: MigrationSummary,
    /// Report files written by export
    pub report_paths: Vec<PathBuf>,
    /// Non-fatal warnings and export errors
    pub errors: Vec<String>,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(config: MigrationConfig, dry_run: bool) -> Result<Self, crate::error::NetworkError> {
        let client = TransferClient::new()?;
        Ok(Self {
            config,
            client,
            dry_run,
        })
    }

    /// Create an orchestrator with a custom transfer client (for testing)
    pub fn with_client(config: MigrationConfig, client: TransferClient, dry_run: bool) -> Self {
        Self {
            config,
            client,
            dry_run,
        }
    }

    /// Drives one coordinate through the provider lifecycle
    ///
    /// Connect is assumed done; this entry point is safe to call from an
    /// external concurrent driver since each coordinate owns its working
    /// directory.
    pub async fn migrate(
        &self,
        provider: &dyn Provider,
        coordinate: PackageCoordinate,
    ) -> (MigrationOutcome, Vec<String>) {
        let mut warnings = Vec::new();

        let filenames = match provider.fetch_package_files(&coordinate).await {
            Ok(filenames) => filenames,
            Err(e) => {
                return (
                    MigrationOutcome::failed(
                        coordinate,
                        MigrationStep::FetchPackageFiles,
                        e.to_string(),
                    ),
                    warnings,
                )
            }
        };

        if self.dry_run {
            let outcome = MigrationOutcome::skipped(coordinate).with_filenames(filenames);
            return (outcome, warnings);
        }

        // Each filename is attempted independently; one failure never
        // prevents trying the others
        let mut first_failure: Option<(MigrationStep, String)> = None;
        for filename in &filenames {
            if let Err(e) = provider.download(&coordinate, filename).await {
                first_failure.get_or_insert((MigrationStep::Download, e.to_string()));
                continue;
            }
            match provider.upload(&coordinate, filename).await {
                Ok(mut upload_warnings) => warnings.append(&mut upload_warnings),
                Err(e) => {
                    first_failure.get_or_insert((MigrationStep::Upload, e.to_string()));
                }
            }
        }

        let outcome = match first_failure {
            None => MigrationOutcome::success(coordinate, filenames),
            Some((step, error)) => {
                MigrationOutcome::failed(coordinate, step, error).with_filenames(filenames)
            }
        };
        (outcome, warnings)
    }

    /// Runs the full batch, one coordinate at a time
    pub async fn run(&self, coordinates: Vec<PackageCoordinate>) -> OrchestratorResult {
        self.run_with_progress(coordinates, false).await
    }

    /// Runs the full batch with optional progress display
    pub async fn run_with_progress(
        &self,
        coordinates: Vec<PackageCoordinate>,
        show_progress: bool,
    ) -> OrchestratorResult {
        let mut summary = MigrationSummary::new(self.dry_run);
        let mut errors = Vec::new();
        let mut providers: HashMap<PackageType, Box<dyn Provider>> = HashMap::new();

        let mut progress = Progress::new(show_progress);
        progress.start(coordinates.len() as u64, "Migrating packages");

        for coordinate in coordinates {
            progress.set_message(&format!("Migrating {}", coordinate));

            let provider = match self
                .provider_for(&mut providers, coordinate.package_type)
                .await
            {
                Ok(provider) => provider,
                Err(e) => {
                    summary.add_outcome(MigrationOutcome::failed(
                        coordinate,
                        MigrationStep::Connect,
                        e,
                    ));
                    progress.inc();
                    continue;
                }
            };

            let (outcome, mut warnings) = self.migrate(provider, coordinate).await;
            summary.add_outcome(outcome);
            errors.append(&mut warnings);
            progress.inc();
        }
        progress.finish_and_clear();

        let report_paths = if self.dry_run {
            Vec::new()
        } else {
            self.export_reports(&providers, &summary, &mut errors)
        };

        OrchestratorResult {
            summary,
            report_paths,
            errors,
        }
    }

    /// Returns the cached provider for a package type, connecting on first use
    async fn provider_for<'a>(
        &self,
        providers: &'a mut HashMap<PackageType, Box<dyn Provider>>,
        package_type: PackageType,
    ) -> Result<&'a dyn Provider, String> {
        if !providers.contains_key(&package_type) {
            let provider = create_provider(package_type, self.config.clone(), self.client.clone())
                .map_err(|e| e.to_string())?;
            // Connect once per registry flavor
            provider.connect().await.map_err(|e| e.to_string())?;
            providers.insert(package_type, provider);
        }
        Ok(providers[&package_type].as_ref())
    }

    /// Exports one CSV and one JSON report per (provider, owner) pair
    fn export_reports(
        &self,
        providers: &HashMap<PackageType, Box<dyn Provider>>,
        summary: &MigrationSummary,
        errors: &mut Vec<String>,
    ) -> Vec<PathBuf> {
        let mut report_paths = Vec::new();
        let mut exported: Vec<(PackageType, String)> = Vec::new();

        for outcome in &summary.outcomes {
            let key = (
                outcome.coordinate.package_type,
                outcome.coordinate.owner.clone(),
            );
            if exported.contains(&key) {
                continue;
            }
            let Some(provider) = providers.get(&key.0) else {
                continue;
            };

            match provider.export(&key.1, summary) {
                Ok(path) => report_paths.push(path),
                Err(e) => errors.push(format!("export failed for {}: {}", key.1, e)),
            }
            let json_dir = self.config.work_root.join("reports");
            match report::write_json_report(&json_dir, &key.1, summary) {
                Ok(path) => report_paths.push(path),
                Err(e) => errors.push(format!("export failed for {}: {}", key.1, e)),
            }
            exported.push(key);
        }

        report_paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResultState;
    use crate::error::{MigrationError, NetworkError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn config(work_root: &std::path::Path) -> MigrationConfig {
        MigrationConfig::new(
            // Nothing listens on port 1; network steps fail fast
            "http://127.0.0.1:1",
            "src-token",
            "http://127.0.0.1:1",
            "tgt-token",
            "acme",
            "acme-labs",
            work_root,
        )
        .unwrap()
    }

    fn coordinate(package_type: PackageType) -> PackageCoordinate {
        PackageCoordinate::new("acme", "widget", package_type, "widget", "1.0.0")
    }

    /// Provider returning scripted filenames, with per-filename download
    /// failures and a record of every call
    struct ScriptedProvider {
        config: MigrationConfig,
        filenames: Vec<String>,
        download_failures: HashMap<String, u16>,
        downloads: Mutex<Vec<String>>,
        uploads: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(config: MigrationConfig, filenames: &[&str]) -> Self {
            Self {
                config,
                filenames: filenames.iter().map(|f| f.to_string()).collect(),
                download_failures: HashMap::new(),
                downloads: Mutex::new(Vec::new()),
                uploads: Mutex::new(Vec::new()),
            }
        }

        fn fail_download(mut self, filename: &str, status: u16) -> Self {
            self.download_failures.insert(filename.to_string(), status);
            self
        }

        fn download_url(filename: &str) -> String {
            format!("http://127.0.0.1:1/download/@acme/widget/1.0.0/{}", filename)
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        fn package_type(&self) -> PackageType {
            PackageType::Npm
        }

        fn config(&self) -> &MigrationConfig {
            &self.config
        }

        async fn connect(&self) -> Result<(), MigrationError> {
            Ok(())
        }

        async fn fetch_package_files(
            &self,
            _coordinate: &PackageCoordinate,
        ) -> Result<Vec<String>, MigrationError> {
            Ok(self.filenames.clone())
        }

        async fn download(
            &self,
            _coordinate: &PackageCoordinate,
            filename: &str,
        ) -> Result<PathBuf, MigrationError> {
            self.downloads.lock().unwrap().push(filename.to_string());
            if let Some(status) = self.download_failures.get(filename) {
                let url = Self::download_url(filename);
                return Err(NetworkError::http_status(url, *status, "not found").into());
            }
            Ok(self.config.work_root.join(filename))
        }

        fn rename(&self, _manifest_path: &std::path::Path) -> Result<(), MigrationError> {
            Ok(())
        }

        async fn upload(
            &self,
            _coordinate: &PackageCoordinate,
            filename: &str,
        ) -> Result<Vec<String>, MigrationError> {
            self.uploads.lock().unwrap().push(filename.to_string());
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_unsupported_package_type_fails_at_connect() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(config(dir.path()), false).unwrap();

        let result = orchestrator.run(vec![coordinate(PackageType::Maven)]).await;

        assert_eq!(result.summary.total(), 1);
        let outcome = &result.summary.outcomes[0];
        assert_eq!(outcome.state, ResultState::Failed);
        assert_eq!(outcome.step, MigrationStep::Connect);
        assert!(outcome
            .error
            .as_deref()
            .unwrap()
            .contains("unsupported package type"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_terminal_for_coordinate() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(config(dir.path()), false).unwrap();

        let result = orchestrator.run(vec![coordinate(PackageType::Npm)]).await;

        let outcome = &result.summary.outcomes[0];
        assert_eq!(outcome.state, ResultState::Failed);
        assert_eq!(outcome.step, MigrationStep::FetchPackageFiles);
        // The error names the URL that was attempted
        assert!(outcome.error.as_deref().unwrap().contains("127.0.0.1:1"));
    }

    #[tokio::test]
    async fn test_one_coordinate_failure_never_aborts_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(config(dir.path()), false).unwrap();

        let result = orchestrator
            .run(vec![
                coordinate(PackageType::Maven),
                coordinate(PackageType::Npm),
            ])
            .await;

        assert_eq!(result.summary.total(), 2);
        assert_eq!(result.summary.failed(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_writes_no_reports() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(config(dir.path()), true).unwrap();

        let result = orchestrator.run(vec![coordinate(PackageType::Npm)]).await;

        assert!(result.report_paths.is_empty());
        assert!(result.summary.dry_run);
    }

    #[tokio::test]
    async fn test_reports_written_after_failed_run() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator = Orchestrator::new(config(dir.path()), false).unwrap();

        let result = orchestrator.run(vec![coordinate(PackageType::Npm)]).await;

        // The npm provider connected, so CSV and JSON reports exist even
        // though the migration itself failed
        assert_eq!(result.report_paths.len(), 2);
        for path in &result.report_paths {
            assert!(path.exists(), "missing report {}", path.display());
        }
    }

    #[tokio::test]
    async fn test_download_failure_does_not_stop_remaining_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        let provider = ScriptedProvider::new(
            cfg.clone(),
            &["widget-1.0.0.tgz", "widget-1.0.0-docs.tgz"],
        )
        .fail_download("widget-1.0.0.tgz", 500);
        let orchestrator =
            Orchestrator::with_client(cfg, TransferClient::new().unwrap(), false);

        let (outcome, warnings) = orchestrator
            .migrate(&provider, coordinate(PackageType::Npm))
            .await;

        // Both filenames were attempted; only the surviving one was uploaded
        assert_eq!(
            *provider.downloads.lock().unwrap(),
            vec!["widget-1.0.0.tgz", "widget-1.0.0-docs.tgz"]
        );
        assert_eq!(
            *provider.uploads.lock().unwrap(),
            vec!["widget-1.0.0-docs.tgz"]
        );

        // The first failure is the one recorded
        assert_eq!(outcome.state, ResultState::Failed);
        assert_eq!(outcome.step, MigrationStep::Download);
        assert!(outcome.error.as_deref().unwrap().contains("HTTP 500"));
        assert_eq!(outcome.filenames.len(), 2);
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn test_download_404_fails_coordinate_without_upload() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path());
        let provider = ScriptedProvider::new(cfg.clone(), &["widget-1.0.0.tgz"])
            .fail_download("widget-1.0.0.tgz", 404);
        let orchestrator =
            Orchestrator::with_client(cfg, TransferClient::new().unwrap(), false);

        let (outcome, _) = orchestrator
            .migrate(&provider, coordinate(PackageType::Npm))
            .await;

        assert_eq!(outcome.state, ResultState::Failed);
        assert_eq!(outcome.step, MigrationStep::Download);
        // The error names the URL that was attempted
        let error = outcome.error.as_deref().unwrap();
        assert!(error.contains("HTTP 404"));
        assert!(error.contains("/download/@acme/widget/1.0.0/widget-1.0.0.tgz"));
        assert!(provider.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_with_client_constructor() {
        let dir = tempfile::tempdir().unwrap();
        let client = TransferClient::new().unwrap();
        let orchestrator = Orchestrator::with_client(config(dir.path()), client, true);
        let result = orchestrator.run(Vec::new()).await;
        assert_eq!(result.summary.total(), 0);
    }
}
