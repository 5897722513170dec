//! pkgmig - Package registry migration library
//!
//! This library provides the core functionality for migrating published
//! packages between registries:
//! - Coordinate input and report persistence (CSV/JSON)
//! - Registry metadata fetch, artifact download, and publish
//! - Manifest organization rewriting inside repackaged archives

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod registry;
pub mod report;
pub mod rewrite;
