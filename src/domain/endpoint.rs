//! Registry endpoint description

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::UrlError;

/// Which side of the migration an endpoint sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointFlavor {
    /// Registry packages are migrated from
    Source,
    /// Registry packages are migrated to
    Target,
}

impl fmt::Display for EndpointFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointFlavor::Source => write!(f, "source"),
            EndpointFlavor::Target => write!(f, "target"),
        }
    }
}

/// One registry the migration talks to: base URL, flavor, and bearer token
///
/// The token is an opaque string, never inspected. Two endpoints exist per
/// migration, one source and one target.
#[derive(Debug, Clone)]
pub struct RegistryEndpoint {
    /// Base URL of the registry, e.g. `https://npm.pkg.github.com`
    pub base_url: String,
    /// Source or target side
    pub flavor: EndpointFlavor,
    /// Bearer token used for every request against this endpoint
    pub token: String,
}

impl RegistryEndpoint {
    /// Creates a new endpoint, validating that the base URL parses
    pub fn new(
        base_url: impl Into<String>,
        flavor: EndpointFlavor,
        token: impl Into<String>,
    ) -> Result<Self, UrlError> {
        let base_url = base_url.into();
        let parsed = reqwest::Url::parse(&base_url).map_err(|e| UrlError::MalformedBase {
            url: base_url.clone(),
            message: e.to_string(),
        })?;
        if !parsed.has_host() {
            return Err(UrlError::MalformedBase {
                url: base_url,
                message: "base URL has no host".to_string(),
            });
        }
        Ok(Self {
            base_url,
            flavor,
            token: token.into(),
        })
    }

    /// Returns the host portion of the base URL
    ///
    /// Used to scope the auth-token line of a staged credential file.
    pub fn host(&self) -> String {
        // new() guaranteed the URL parses with a host
        reqwest::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_default()
    }
}
