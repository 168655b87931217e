//! Shared application state.

use std::time::Duration;

use crate::manifest::{ManifestFetcher, ManifestResolver};
use crate::storage::PanelDatabase;

/// Mojang's Java runtime catalog, served when no custom blob is configured.
pub const DEFAULT_JAVA_CDN_URL: &str = "https://launchermeta.mojang.com/v1/products/java-runtime/2ec0cc96c44e5a76b9c8b7c39df7210883d12871/all.json";

#[derive(Clone)]
pub struct AppState {
    pub db: PanelDatabase,
    pub fetcher: ManifestFetcher,
    pub resolver: ManifestResolver,
    pub java_cdn_url: String,
}

impl AppState {
    pub fn new(
        db: PanelDatabase,
        fetch_timeout: Duration,
        java_cdn_url: String,
    ) -> Result<Self, reqwest::Error> {
        let fetcher = ManifestFetcher::new(fetch_timeout)?;
        let resolver = ManifestResolver::new(db.clone(), fetcher.clone());
        Ok(Self {
            db,
            fetcher,
            resolver,
            java_cdn_url,
        })
    }
}
