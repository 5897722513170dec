//! Registry URL resolution
//!
//! Pure string/path composition: no network I/O happens here. Base URLs may
//! or may not carry a trailing slash; joined URLs never end up with
//! duplicate or missing separators either way.

use crate::domain::{PackageCoordinate, RegistryEndpoint};
use crate::error::UrlError;

/// Joins path segments onto a base URL
///
/// The base must parse as an absolute URL; a malformed base is surfaced,
/// not recovered.
fn join(base: &str, segments: &[&str]) -> Result<String, UrlError> {
    reqwest::Url::parse(base).map_err(|e| UrlError::MalformedBase {
        url: base.to_string(),
        message: e.to_string(),
    })?;

    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    Ok(url)
}

/// URL for fetching a package's version metadata from the source registry
///
/// Shape: `<sourceBase>/@<owner>/<name>`
pub fn fetch_url(
    endpoint: &RegistryEndpoint,
    coordinate: &PackageCoordinate,
) -> Result<String, UrlError> {
    let scope = format!("@{}", coordinate.owner);
    join(&endpoint.base_url, &[&scope, &coordinate.name])
}

/// URL for downloading one artifact from the source registry
///
/// Shape: `<sourceBase>/download/@<owner>/<name>/<version>/<filename>`
pub fn download_url(
    endpoint: &RegistryEndpoint,
    coordinate: &PackageCoordinate,
    filename: &str,
) -> Result<String, UrlError> {
    let scope = format!("@{}", coordinate.owner);
    join(
        &endpoint.base_url,
        &[
            "download",
            &scope,
            &coordinate.name,
            &coordinate.version,
            filename,
        ],
    )
}

/// URL for uploading one artifact to the target registry
///
/// Shape: `<targetBase>/@<owner>/<repository>/<name>/<version>/<filename>`
pub fn upload_url(
    endpoint: &RegistryEndpoint,
    coordinate: &PackageCoordinate,
    filename: &str,
) -> Result<String, UrlError> {
    let scope = format!("@{}", coordinate.owner);
    join(
        &endpoint.base_url,
        &[
            &scope,
            &coordinate.repository,
            &coordinate.name,
            &coordinate.version,
            filename,
        ],
    )
}
