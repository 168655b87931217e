//! Manifest resolution: asset lookup, version selection, and concurrent
//! fetch-and-sign of the mods and resource-pack manifests.

use netherlink_core::DatabaseError;
use netherlink_crypto::sign_or_placeholder;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::storage::PanelDatabase;

use super::fetch::{FetchError, ManifestFetcher};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// One signed manifest half of a resolution response.
#[derive(Debug, Serialize)]
pub struct ManifestSection {
    pub files: Map<String, Value>,
    pub signature: String,
}

/// The launcher-facing resolution response.
#[derive(Debug, Serialize)]
pub struct ResolvedManifests {
    pub base: String,
    pub mods: ManifestSection,
    pub rp: ManifestSection,
    /// Full ordered version list; the launcher picks from it.
    pub version: Vec<String>,
    pub server: Option<String>,
    pub social_media: Value,
}

#[derive(Clone)]
pub struct ManifestResolver {
    db: PanelDatabase,
    fetcher: ManifestFetcher,
}

impl ManifestResolver {
    pub fn new(db: PanelDatabase, fetcher: ManifestFetcher) -> Self {
        Self { db, fetcher }
    }

    /// Resolve `client_id` to a signed manifest response. Both manifest
    /// signings run concurrently; either fetch failing fails the whole
    /// resolution, while signing failures degrade to the placeholder inside
    /// the signer.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        client_id: &str,
        requested_version: Option<&str>,
    ) -> Result<ResolvedManifests, ResolveError> {
        let asset = self.db.get_asset(client_id).await?;
        let effective_version = requested_version
            .or_else(|| asset.default_version())
            .unwrap_or_default()
            .to_string();
        let urls = asset.effective_urls(&effective_version);
        debug!(version = %effective_version, base = %urls.base_url, "Resolved manifest URLs");

        let private_key = asset.private_key.as_deref().unwrap_or_default();
        let (mods, rp) = tokio::try_join!(
            self.signed_section(&urls.base_url, &urls.mods_manifest_url, private_key),
            self.signed_section(&urls.base_url, &urls.rp_manifest_url, private_key),
        )?;

        Ok(ResolvedManifests {
            base: urls.base_url,
            mods,
            rp,
            version: asset.versions,
            server: asset.server,
            social_media: asset.social_media,
        })
    }

    async fn signed_section(
        &self,
        base_url: &str,
        manifest_path: &str,
        private_key: &str,
    ) -> Result<ManifestSection, ResolveError> {
        // Plain concatenation: operators control both halves and may rely on
        // a base URL without a trailing slash.
        let url = format!("{base_url}{manifest_path}");
        let manifest = self.fetcher.fetch_json(&url).await?;
        let files = manifest
            .get("files")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let signature = sign_or_placeholder(manifest.to_string().as_bytes(), private_key);
        Ok(ManifestSection { files, signature })
    }
}
