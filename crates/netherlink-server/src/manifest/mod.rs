//! Manifest fetching and the resolution pipeline.

mod fetch;
mod resolve;

pub use fetch::{FetchError, ManifestFetcher, USER_AGENT};
pub use resolve::{ManifestResolver, ManifestSection, ResolveError, ResolvedManifests};
