//! Core domain models for pkgmig
//!
//! This module contains the fundamental types used throughout the application:
//! - Package type definitions for supported registry ecosystems
//! - Package coordinates identifying one version to migrate
//! - Registry endpoint descriptions (base URL, flavor, token)
//! - Migration step outcomes
//! - Summary and result structures

mod coordinate;
mod endpoint;
mod outcome;
mod summary;

pub use coordinate::{PackageCoordinate, PackageType};
pub use endpoint::{EndpointFlavor, RegistryEndpoint};
pub use outcome::{MigrationOutcome, MigrationStep, ResultState};
pub use summary::MigrationSummary;
