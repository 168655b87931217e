//! Client for the public (launcher-facing) endpoints of a Netherlink panel.
//!
//! Admin endpoints are deliberately not wrapped here; launcher integrators
//! never hold API keys.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned error {0}: {1}")]
    Server(StatusCode, String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, PanelClientError>;

/// One signed manifest half of a resolution response.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestSection {
    pub files: Map<String, Value>,
    pub signature: String,
}

/// Everything a launcher needs to install and verify a client.
#[derive(Debug, Clone, Deserialize)]
pub struct LauncherAssets {
    pub base: String,
    pub mods: ManifestSection,
    pub rp: ManifestSection,
    pub version: Vec<String>,
    pub server: Option<String>,
    #[serde(default)]
    pub social_media: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    pub client_id: Option<String>,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Hardware telemetry reported on launcher login.
#[derive(Debug, Clone, Serialize)]
pub struct HwidReport {
    pub hwid: String,
    pub launcher_install_uuid: String,
    pub player_name: String,
    pub account_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Unix timestamp; the server stamps the request time when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_date: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinedMarker {
    pub hwid: String,
    pub created_at: i64,
}

#[derive(Serialize)]
struct ResolveRequest<'a> {
    client_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
}

#[derive(Serialize)]
struct HwidRef<'a> {
    hwid: &'a str,
}

#[derive(Deserialize)]
struct ReportAck {
    id: i64,
}

#[derive(Clone)]
pub struct PanelClient {
    base_url: String,
    client: Client,
}

impl PanelClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Resolve the signed manifest set for a client, optionally pinned to one
    /// of its published versions.
    pub async fn launcher_assets(
        &self,
        client_id: &str,
        version: Option<&str>,
    ) -> Result<LauncherAssets> {
        let url = format!("{}/public/assets/launcher", self.base_url);
        let req = ResolveRequest { client_id, version };
        let response = ensure_success(self.client.post(&url).json(&req).send().await?).await?;

        response.json().await.map_err(|e| {
            PanelClientError::Validation(format!("Failed to parse launcher assets: {e}"))
        })
    }

    /// Fetch the Java runtime catalog. The shape depends on what the panel is
    /// configured to serve, so the raw document is returned.
    pub async fn java_distribution(&self) -> Result<Value> {
        let url = format!("{}/public/assets/java", self.base_url);
        let response = ensure_success(self.client.get(&url).send().await?).await?;

        response.json().await.map_err(|e| {
            PanelClientError::Validation(format!("Failed to parse java distribution: {e}"))
        })
    }

    /// Fetch the news feed: global entries plus the given client's own.
    pub async fn news(&self, client_id: Option<&str>) -> Result<Vec<NewsItem>> {
        let url = format!("{}/public/news", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(client_id) = client_id {
            request = request.query(&[("client_id", client_id)]);
        }
        let response = ensure_success(request.send().await?).await?;

        response
            .json()
            .await
            .map_err(|e| PanelClientError::Validation(format!("Failed to parse news feed: {e}")))
    }

    /// Submit a login telemetry record and return its id.
    pub async fn report_hwid(&self, report: &HwidReport) -> Result<i64> {
        let url = format!("{}/public/hwid", self.base_url);
        let response = ensure_success(self.client.post(&url).json(report).send().await?).await?;

        let ack: ReportAck = response
            .json()
            .await
            .map_err(|e| PanelClientError::Validation(format!("Failed to parse hwid ack: {e}")))?;
        Ok(ack.id)
    }

    /// Record that this hardware id has joined the game server at least once.
    pub async fn confirm_join(&self, hwid: &str) -> Result<JoinedMarker> {
        let url = format!("{}/public/hwid/joined", self.base_url);
        let response =
            ensure_success(self.client.post(&url).json(&HwidRef { hwid }).send().await?).await?;

        response.json().await.map_err(|e| {
            PanelClientError::Validation(format!("Failed to parse joined marker: {e}"))
        })
    }

    /// Ban pre-check; `true` means the hardware id is banned.
    pub async fn is_hwid_banned(&self, hwid: &str) -> Result<bool> {
        let url = format!("{}/public/check-hwid", self.base_url);
        let response =
            ensure_success(self.client.get(&url).query(&[("hwid", hwid)]).send().await?).await?;

        response
            .json()
            .await
            .map_err(|e| PanelClientError::Validation(format!("Failed to parse ban check: {e}")))
    }

    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        ensure_success(self.client.get(&url).send().await?).await?;
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(PanelClientError::Server(status, text))
}
