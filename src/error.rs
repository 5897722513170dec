//! Application error types using thiserror
//!
//! Error hierarchy:
//! - NetworkError: HTTP transfer failures against either registry
//! - TransformError: Manifest rewriting failures inside an extracted archive
//! - SubprocessError: Archive/publish tool invocation failures
//! - FilesystemError: Working directory operation failures
//! - UrlError: Registry URL resolution failures
//! - ConfigError: Input/configuration failures

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::PackageType;

/// Application-level error type
#[derive(Error, Debug)]
pub enum MigrationError {
    /// HTTP transfer related errors
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Manifest transformation related errors
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// External tool invocation related errors
    #[error(transparent)]
    Subprocess(#[from] SubprocessError),

    /// Working directory related errors
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// URL resolution related errors
    #[error(transparent)]
    Url(#[from] UrlError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to HTTP transfers against a registry
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Non-2xx HTTP response
    #[error("HTTP {status} from {url}: {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    /// Transport-level failure (DNS, connect, TLS, timeout)
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Response body could not be read or decoded
    #[error("invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
}

/// Errors related to rewriting the manifest inside an extracted archive
#[derive(Error, Debug)]
pub enum TransformError {
    /// Manifest file not found at its expected path
    #[error("manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Failed to read the manifest
    #[error("failed to read manifest {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the rewritten manifest
    #[error("failed to write manifest {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to archive/publish tool invocation
#[derive(Error, Debug)]
pub enum SubprocessError {
    /// The tool could not be spawned at all
    #[error("failed to run '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool exited with a non-zero status
    #[error("'{command}' exited with status {status}{}", log_hint(.log))]
    CommandFailed {
        command: String,
        status: i32,
        log: Option<PathBuf>,
    },
}

fn log_hint(log: &Option<PathBuf>) -> String {
    match log {
        Some(path) => format!(" (see {})", path.display()),
        None => String::new(),
    }
}

/// Errors related to working directory operations
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create a directory
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to rename a file
    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a file
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to remove a file or directory
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to registry URL resolution
#[derive(Error, Debug)]
pub enum UrlError {
    /// Base URL could not be parsed
    #[error("malformed registry base URL '{url}': {message}")]
    MalformedBase { url: String, message: String },
}

/// Errors related to configuration and input
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No provider exists for this package type yet
    #[error("unsupported package type: {package_type}")]
    UnsupportedPackageType { package_type: PackageType },

    /// Input CSV row is malformed
    #[error("invalid coordinate row {line} in {path}: {message}")]
    InvalidInputRow {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Input file could not be read
    #[error("failed to read input file {path}: {source}")]
    InputReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NetworkError {
    /// Creates a new HttpStatus error
    pub fn http_status(url: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        NetworkError::HttpStatus {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    /// Creates a new Transport error
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        NetworkError::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(url: impl Into<String>, message: impl Into<String>) -> Self {
        NetworkError::InvalidResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Returns the URL this error refers to
    pub fn url(&self) -> &str {
        match self {
            NetworkError::HttpStatus { url, .. } => url,
            NetworkError::Transport { url, .. } => url,
            NetworkError::InvalidResponse { url, .. } => url,
        }
    }
}

impl TransformError {
    /// Creates a new ManifestNotFound error
    pub fn manifest_not_found(path: impl Into<PathBuf>) -> Self {
        TransformError::ManifestNotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransformError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new WriteError
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransformError::WriteError {
            path: path.into(),
            source,
        }
    }
}

impl SubprocessError {
    /// Creates a new SpawnFailed error
    pub fn spawn_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        SubprocessError::SpawnFailed {
            command: command.into(),
            source,
        }
    }

    /// Creates a new CommandFailed error
    pub fn command_failed(command: impl Into<String>, status: i32, log: Option<PathBuf>) -> Self {
        SubprocessError::CommandFailed {
            command: command.into(),
            status,
            log,
        }
    }

    /// Returns the captured log file path, if one was written
    pub fn log_path(&self) -> Option<&PathBuf> {
        match self {
            SubprocessError::CommandFailed { log, .. } => log.as_ref(),
            SubprocessError::SpawnFailed { .. } => None,
        }
    }
}

impl FilesystemError {
    /// Creates a new CreateDir error
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FilesystemError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Rename error
    pub fn rename(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        FilesystemError::Rename {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    /// Creates a new Read error
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FilesystemError::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Write error
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FilesystemError::Write {
            path: path.into(),
            source,
        }
    }

    /// Creates a new Remove error
    pub fn remove(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FilesystemError::Remove {
            path: path.into(),
            source,
        }
    }
}
