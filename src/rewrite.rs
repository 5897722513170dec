//! Manifest ownership rewriting
//!
//! Rewrites scope and repository URL references inside a package manifest
//! when the source and target organizations differ. The substitution is
//! byte-level and literal: the manifest is never parsed, so formatting,
//! key order, and every unrelated byte survive the rewrite exactly. This
//! keeps the transform format-agnostic across ecosystems (JSON, XML, ...).

use std::fs;
use std::path::Path;

use crate::error::TransformError;

/// Replaces every occurrence of `needle` in `haystack` with `replacement`
///
/// Operates on raw bytes so non-UTF-8 content passes through untouched.
fn replace_all(haystack: &[u8], needle: &[u8], replacement: &[u8]) -> Vec<u8> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return haystack.to_vec();
    }

    let mut out = Vec::with_capacity(haystack.len());
    let mut i = 0;
    while i < haystack.len() {
        if haystack[i..].starts_with(needle) {
            out.extend_from_slice(replacement);
            i += needle.len();
        } else {
            out.push(haystack[i]);
            i += 1;
        }
    }
    out
}

/// Rewrites ownership references from `source_org` to `target_org`
///
/// Two literal substitutions, all occurrences each:
/// - the scope prefix `@<source_org>/` → `@<target_org>/`
/// - the repository URL prefix `https://github.com/<source_org>/` →
///   `https://github.com/<target_org>/`
///
/// Identity when the organizations match. Pure and total: the rewrite
/// itself cannot fail.
pub fn rewrite(manifest: &[u8], source_org: &str, target_org: &str) -> Vec<u8> {
    if source_org == target_org {
        return manifest.to_vec();
    }

    let old_scope = format!("@{}/", source_org);
    let new_scope = format!("@{}/", target_org);
    let rewritten = replace_all(manifest, old_scope.as_bytes(), new_scope.as_bytes());

    // todo: GHES repository hosts are not supported yet
    let old_repo = format!("https://github.com/{}/", source_org);
    let new_repo = format!("https://github.com/{}/", target_org);
    replace_all(&rewritten, old_repo.as_bytes(), new_repo.as_bytes())
}

/// Rewrites a manifest file in place
///
/// Failures come only from the surrounding read/write I/O, never from the
/// rewrite itself.
pub fn rewrite_file(path: &Path, source_org: &str, target_org: &str) -> Result<(), TransformError> {
    if !path.exists() {
        return Err(TransformError::manifest_not_found(path));
    }

    let content = fs::read(path).map_err(|e| TransformError::read_error(path, e))?;
    let rewritten = rewrite(&content, source_org, target_org);
    fs::write(path, rewritten).map_err(|e| TransformError::write_error(path, e))?;

    Ok(())
}
