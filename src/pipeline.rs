//! Archive transform pipeline
//!
//! Strictly sequential per-artifact state machine: stage credentials,
//! preserve the original archive, extract, rewrite the manifest, repackage,
//! clean up the extracted tree, publish. Each step's postcondition is the
//! next step's precondition; any step other than cleanup failing aborts the
//! pipeline immediately and nothing is retried here.
//!
//! Durable artifacts (the `.orig` archive and the publish log) are retained
//! on every path for post-hoc diagnosis; only the extracted tree is
//! transient.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{FilesystemError, MigrationError, SubprocessError, TransformError};
use crate::rewrite;

/// Suffix appended to the downloaded archive before extraction
const ORIG_SUFFIX: &str = ".orig";

/// Filename for captured publish output inside the working directory
const PUBLISH_LOG: &str = "publish.log";

/// An external tool invocation: program plus arguments
///
/// Providers assemble the full publish command line for their ecosystem so
/// the pipeline stays registry-agnostic (and tests can substitute a stub).
#[derive(Debug, Clone)]
pub struct ToolCommand {
    /// Program name, resolved via PATH
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
}

impl ToolCommand {
    /// Creates a new tool command
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Display form for error messages
    fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Credential file staged into the working directory before publish
#[derive(Debug, Clone)]
pub struct StagedCredentials {
    /// Filename relative to the working directory, e.g. `.npmrc`
    pub filename: String,
    /// Full file content, including the target token
    pub content: String,
}

/// The per-artifact transform pipeline
///
/// Owns one working directory exclusively for the duration of a migration
/// step; never shared across concurrent package migrations.
pub struct ArchivePipeline {
    work_dir: PathBuf,
    source_org: String,
    target_org: String,
    credentials: StagedCredentials,
    /// Manifest location relative to the working directory after extraction
    manifest_rel_path: PathBuf,
    /// Name of the directory the archive extracts into
    extracted_dir: String,
}

impl ArchivePipeline {
    /// Creates a pipeline over one working directory
    pub fn new(
        work_dir: impl Into<PathBuf>,
        source_org: impl Into<String>,
        target_org: impl Into<String>,
        credentials: StagedCredentials,
        manifest_rel_path: impl Into<PathBuf>,
        extracted_dir: impl Into<String>,
    ) -> Self {
        Self {
            work_dir: work_dir.into(),
            source_org: source_org.into(),
            target_org: target_org.into(),
            credentials,
            manifest_rel_path: manifest_rel_path.into(),
            extracted_dir: extracted_dir.into(),
        }
    }

    /// Returns the working directory
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the publish log path inside the working directory
    pub fn publish_log_path(&self) -> PathBuf {
        self.work_dir.join(PUBLISH_LOG)
    }

    /// Returns the staged credential file path
    pub fn credentials_path(&self) -> PathBuf {
        self.work_dir.join(&self.credentials.filename)
    }

    /// Step 1: write the ecosystem credential file into the working directory
    pub fn stage_credentials(&self) -> Result<PathBuf, FilesystemError> {
        let path = self.credentials_path();
        fs::write(&path, &self.credentials.content)
            .map_err(|e| FilesystemError::write(&path, e))?;
        Ok(path)
    }

    /// Step 2: rename the downloaded archive to its `.orig` audit copy
    ///
    /// The `.orig` file is never deleted; it is the rollback source and
    /// forensic artifact for the migration.
    pub fn preserve_original(&self, filename: &str) -> Result<PathBuf, FilesystemError> {
        let from = self.work_dir.join(filename);
        let to = self.work_dir.join(format!("{}{}", filename, ORIG_SUFFIX));
        fs::rename(&from, &to).map_err(|e| FilesystemError::rename(&from, &to, e))?;
        Ok(to)
    }

    /// Step 3: unpack the `.orig` archive into the working directory
    pub fn extract(&self, orig_filename: &str) -> Result<(), SubprocessError> {
        let cmd = ToolCommand::new("tar", vec!["-xzf".to_string(), orig_filename.to_string()]);
        run_tool(&cmd, &self.work_dir, None)
    }

    /// Step 4: rewrite the manifest in place inside the extracted tree
    ///
    /// No-op when source and target organizations match; the archive is
    /// republished byte-identical in that case.
    pub fn transform_manifest(&self) -> Result<(), TransformError> {
        if self.source_org == self.target_org {
            return Ok(());
        }
        let manifest = self.work_dir.join(&self.manifest_rel_path);
        rewrite::rewrite_file(&manifest, &self.source_org, &self.target_org)
    }

    /// Step 5: repack the extracted tree under the original archive name
    ///
    /// The publish step expects the original filename, not `.orig`.
    pub fn repackage(&self, filename: &str) -> Result<(), SubprocessError> {
        let cmd = ToolCommand::new(
            "tar",
            vec![
                "-czf".to_string(),
                filename.to_string(),
                format!("{}/", self.extracted_dir),
            ],
        );
        run_tool(&cmd, &self.work_dir, None)
    }

    /// Step 6: remove the extracted tree
    ///
    /// The repackaged artifact already exists by now, so a failure here is
    /// reported to the caller as a warning rather than aborting the run.
    pub fn cleanup_extracted(&self) -> Result<(), FilesystemError> {
        let dir = self.work_dir.join(&self.extracted_dir);
        fs::remove_dir_all(&dir).map_err(|e| FilesystemError::remove(&dir, e))
    }

    /// Step 7: run the publish tool, capturing combined output to the log
    ///
    /// A non-zero exit surfaces as a SubprocessError carrying the log path.
    pub fn publish(&self, command: &ToolCommand) -> Result<(), SubprocessError> {
        run_tool(command, &self.work_dir, Some(&self.publish_log_path()))
    }

    /// Runs the full pipeline for one artifact
    ///
    /// Returns non-fatal warnings (cleanup failures) on success; the first
    /// failing step's error otherwise. Steps never proceed past a failure.
    pub fn run(
        &self,
        filename: &str,
        publish_command: &ToolCommand,
    ) -> Result<Vec<String>, MigrationError> {
        let mut warnings = Vec::new();

        self.stage_credentials()?;
        let orig = self.preserve_original(filename)?;
        let orig_name = orig
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}{}", filename, ORIG_SUFFIX));
        self.extract(&orig_name)?;
        self.transform_manifest()?;
        self.repackage(filename)?;
        if let Err(e) = self.cleanup_extracted() {
            warnings.push(e.to_string());
        }
        self.publish(publish_command)?;

        Ok(warnings)
    }
}

/// Runs an external tool in a working directory
///
/// With a log path, stdout and stderr are combined into that file;
/// otherwise output is discarded. Returns a structured error carrying the
/// command line, exit status, and log location.
fn run_tool(
    command: &ToolCommand,
    work_dir: &Path,
    log: Option<&Path>,
) -> Result<(), SubprocessError> {
    let display = command.display();
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args).current_dir(work_dir);
    // Publish clients must talk to the registry directly
    cmd.env("HTTPS_PROXY", "");

    match log {
        Some(log_path) => {
            let log_file = File::create(log_path)
                .map_err(|e| SubprocessError::spawn_failed(display.clone(), e))?;
            let log_clone = log_file
                .try_clone()
                .map_err(|e| SubprocessError::spawn_failed(display.clone(), e))?;
            cmd.stdout(Stdio::from(log_file));
            cmd.stderr(Stdio::from(log_clone));

            let status = cmd
                .status()
                .map_err(|e| SubprocessError::spawn_failed(display.clone(), e))?;
            if !status.success() {
                return Err(SubprocessError::command_failed(
                    display,
                    status.code().unwrap_or(-1),
                    Some(log_path.to_path_buf()),
                ));
            }
        }
        None => {
            let status = cmd
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map_err(|e| SubprocessError::spawn_failed(display.clone(), e))?;
            if !status.success() {
                return Err(SubprocessError::command_failed(
                    display,
                    status.code().unwrap_or(-1),
                    None,
                ));
            }
        }
    }

    Ok(())
}
