//! Coordinate input and migration report persistence
//!
//! This module provides:
//! - CSV input of package coordinates (owner,repository,type,name,version)
//! - CSV report export consumed by Provider::export
//! - JSON report export for machine processing

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{MigrationSummary, PackageCoordinate, PackageType};
use crate::error::{ConfigError, FilesystemError};

/// CSV header accepted (and produced) for coordinate rows
const COORDINATE_HEADER: &str = "owner,repository,type,name,version";

/// Reads package coordinates from a CSV file
///
/// One coordinate per line, five comma-separated fields; a leading header
/// row matching the canonical column names is skipped. Blank lines are
/// ignored; any other malformed row is an error naming the line number.
pub fn read_coordinates_csv(path: &Path) -> Result<Vec<PackageCoordinate>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::InputReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut coordinates = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if line_number == 1 && trimmed.eq_ignore_ascii_case(COORDINATE_HEADER) {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(|f| f.trim()).collect();
        if fields.len() != 5 {
            return Err(ConfigError::InvalidInputRow {
                path: path.to_path_buf(),
                line: line_number,
                message: format!("expected 5 fields, found {}", fields.len()),
            });
        }

        let package_type =
            PackageType::parse(fields[2]).ok_or_else(|| ConfigError::InvalidInputRow {
                path: path.to_path_buf(),
                line: line_number,
                message: format!("unknown package type '{}'", fields[2]),
            })?;

        if fields[0].is_empty() || fields[3].is_empty() || fields[4].is_empty() {
            return Err(ConfigError::InvalidInputRow {
                path: path.to_path_buf(),
                line: line_number,
                message: "owner, name, and version must be non-empty".to_string(),
            });
        }

        coordinates.push(PackageCoordinate::new(
            fields[0],
            fields[1],
            package_type,
            fields[3],
            fields[4],
        ));
    }

    Ok(coordinates)
}

/// CSV cells must stay single-field; commas and newlines collapse to spaces
fn sanitize_cell(value: &str) -> String {
    value.replace([',', '\n', '\r'], " ")
}

/// Writes the CSV migration report for one owner
///
/// Returns the written file path.
pub fn write_csv_report(
    dir: &Path,
    owner: &str,
    summary: &MigrationSummary,
) -> Result<PathBuf, FilesystemError> {
    fs::create_dir_all(dir).map_err(|e| FilesystemError::create_dir(dir, e))?;
    let path = dir.join(format!("{}-packages.csv", owner));

    let timestamp = Utc::now().to_rfc3339();
    let mut lines = vec![format!("timestamp,{},state,step,error", COORDINATE_HEADER)];
    for outcome in summary
        .outcomes
        .iter()
        .filter(|o| o.coordinate.owner == owner)
    {
        let coord = &outcome.coordinate;
        lines.push(format!(
            "{},{},{},{},{},{},{},{},{}",
            timestamp,
            sanitize_cell(&coord.owner),
            sanitize_cell(&coord.repository),
            coord.package_type,
            sanitize_cell(&coord.name),
            sanitize_cell(&coord.version),
            outcome.state,
            outcome.step,
            sanitize_cell(outcome.error.as_deref().unwrap_or("")),
        ));
    }

    let mut content = lines.join("\n");
    content.push('\n');
    fs::write(&path, content).map_err(|e| FilesystemError::write(&path, e))?;
    Ok(path)
}

/// Writes the JSON migration report for one owner
pub fn write_json_report(
    dir: &Path,
    owner: &str,
    summary: &MigrationSummary,
) -> Result<PathBuf, FilesystemError> {
    fs::create_dir_all(dir).map_err(|e| FilesystemError::create_dir(dir, e))?;
    let path = dir.join(format!("{}-packages.json", owner));

    let owned: Vec<_> = summary
        .outcomes
        .iter()
        .filter(|o| o.coordinate.owner == owner)
        .collect();
    let json = serde_json::to_vec_pretty(&owned)
        .map_err(|e| FilesystemError::write(&path, std::io::Error::other(e)))?;
    fs::write(&path, json).map_err(|e| FilesystemError::write(&path, e))?;
    Ok(path)
}
