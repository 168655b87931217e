//! Netherlink core library.
//!
//! Shared functionality for the panel server and its tooling:
//! - SQLite pool helpers and the common database error type
//! - Tracing/logging initialization
//! - Version-set parsing and normalization for launcher assets

pub mod db;
pub mod tracing_init;
pub mod version;

pub use db::DatabaseError;
pub use version::{VersionInput, normalize_versions, parse_version_input};
