//! Netherlink panel server.
//!
//! HTTP API for operating Minecraft launcher distribution: per-client
//! launcher configuration, manifest signing, public news, and HWID
//! telemetry and bans.

pub mod auth;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod routes;
pub mod state;
pub mod storage;

pub use error::ApiError;
pub use routes::app;
pub use state::{AppState, DEFAULT_JAVA_CDN_URL};
