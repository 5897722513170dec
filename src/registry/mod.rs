//! Registry I/O primitives
//!
//! This module provides:
//! - Pure URL resolution for registry fetch/download/upload endpoints
//! - A single-attempt authenticated HTTP transfer client

mod transfer;
pub mod urls;

pub use transfer::TransferClient;
