//! Package coordinate and package type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported package registry ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// npm packages (package.json inside a tgz)
    Npm,
    /// Maven packages (pom.xml inside a jar)
    Maven,
    /// NuGet packages (nuspec inside a nupkg)
    Nuget,
    /// RubyGems packages (gemspec inside a gem)
    Rubygems,
    /// Container images
    Container,
}

impl PackageType {
    /// Parses a package type from its lowercase registry name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Some(PackageType::Npm),
            "maven" => Some(PackageType::Maven),
            "nuget" => Some(PackageType::Nuget),
            "rubygems" => Some(PackageType::Rubygems),
            "container" => Some(PackageType::Container),
            _ => None,
        }
    }

    /// Returns the registry name for this package type
    pub fn name(&self) -> &'static str {
        match self {
            PackageType::Npm => "npm",
            PackageType::Maven => "maven",
            PackageType::Nuget => "nuget",
            PackageType::Rubygems => "rubygems",
            PackageType::Container => "container",
        }
    }

    /// Returns all supported package types
    pub fn all() -> &'static [PackageType] {
        &[
            PackageType::Npm,
            PackageType::Maven,
            PackageType::Nuget,
            PackageType::Rubygems,
            PackageType::Container,
        ]
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identity of one package version to migrate
///
/// The coordinate is the identity key for every migration operation and is
/// never mutated once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageCoordinate {
    /// Owning organization or user on the source registry
    pub owner: String,
    /// Repository the package belongs to
    pub repository: String,
    /// Registry ecosystem
    pub package_type: PackageType,
    /// Package name, without scope prefix
    pub name: String,
    /// Version string, treated as opaque
    pub version: String,
}

impl PackageCoordinate {
    /// Creates a new coordinate
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        package_type: PackageType,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            package_type,
            name: name.into(),
            version: version.into(),
        }
    }

    /// Returns the per-coordinate working directory under a work root
    ///
    /// Each coordinate gets its own directory so concurrent migrations never
    /// share filesystem state.
    pub fn working_dir(&self, work_root: &Path) -> PathBuf {
        work_root
            .join(&self.owner)
            .join(self.package_type.name())
            .join(&self.repository)
            .join(&self.name)
            .join(&self.version)
    }

    /// Returns the local artifact filename for this coordinate
    pub fn artifact_filename(&self) -> String {
        format!("{}-{}.tgz", self.name, self.version)
    }
}

impl fmt::Display for PackageCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {}@{}",
            self.owner, self.repository, self.name, self.version
        )
    }
}
