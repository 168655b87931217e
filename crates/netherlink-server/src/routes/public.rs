//! Public launcher-facing routes. No authentication.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, FromRequestParts, Query, State};
use axum::http::request::Parts;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use netherlink_core::db::unix_timestamp;

use crate::error::ApiError;
use crate::manifest::ResolvedManifests;
use crate::state::AppState;
use crate::storage::{HwidJoined, JavaSource, NewHwidLog, NewsItem};

use super::require_field;

/// Client address for telemetry: first X-Forwarded-For entry when present,
/// else the socket peer address.
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if let Some(ip) = forwarded {
            return Ok(Self(ip));
        }
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip().to_string())
            .unwrap_or_default();
        Ok(Self(peer))
    }
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    client_id: Option<String>,
    version: Option<String>,
}

/// `POST /public/assets/launcher`, the launcher's main poll endpoint.
#[instrument(skip_all)]
pub async fn resolve_launcher_assets(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolvedManifests>, ApiError> {
    let client_id = require_field(request.client_id.as_deref(), "client_id")?;
    let version = request
        .version
        .as_deref()
        .map(str::trim)
        .filter(|version| !version.is_empty());
    let resolved = state.resolver.resolve(client_id, version).await?;
    Ok(Json(resolved))
}

/// `GET /public/assets/java`, pass-through of the configured Java
/// distribution: the stored blob for `custom`, a live CDN fetch otherwise.
pub async fn java_assets(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    if let Some(asset) = state.db.get_java_asset().await? {
        if asset.source == JavaSource::Custom {
            let data = asset
                .java_data
                .ok_or_else(|| ApiError::not_found("Java distribution data"))?;
            return Ok(Json(data));
        }
    }
    let catalog = state
        .fetcher
        .fetch_json(&state.java_cdn_url)
        .await
        .map_err(ApiError::Upstream)?;
    Ok(Json(catalog))
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    client_id: Option<String>,
}

/// `GET /public/news`
pub async fn news_feed(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<Vec<NewsItem>>, ApiError> {
    let client_id = query
        .client_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    Ok(Json(state.db.list_news(client_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct HwidLogRequest {
    hwid: Option<String>,
    launcher_install_uuid: Option<String>,
    player_name: Option<String>,
    account_type: Option<String>,
    login_date: Option<Value>,
    ip_address: Option<String>,
    #[serde(default)]
    has_joined_with_this_hwid: bool,
}

fn parse_login_date(value: Option<&Value>) -> Result<i64, ApiError> {
    const MESSAGE: &str = "login_date must be a unix timestamp or an RFC 3339 string";
    match value {
        None | Some(Value::Null) => Ok(unix_timestamp()),
        Some(Value::Number(number)) => number.as_i64().ok_or_else(|| ApiError::validation(MESSAGE)),
        Some(Value::String(raw)) => chrono::DateTime::parse_from_rfc3339(raw)
            .map(|date| date.timestamp())
            .map_err(|_| ApiError::validation(MESSAGE)),
        Some(_) => Err(ApiError::validation(MESSAGE)),
    }
}

/// `POST /public/hwid`, telemetry ingestion.
#[instrument(skip_all)]
pub async fn log_hwid(
    State(state): State<AppState>,
    ClientIp(peer_ip): ClientIp,
    Json(request): Json<HwidLogRequest>,
) -> Result<Json<Value>, ApiError> {
    let hwid = require_field(request.hwid.as_deref(), "hwid")?;
    let launcher_install_uuid = require_field(
        request.launcher_install_uuid.as_deref(),
        "launcher_install_uuid",
    )?;
    let player_name = require_field(request.player_name.as_deref(), "player_name")?;
    let account_type = require_field(request.account_type.as_deref(), "account_type")?;
    let login_date = parse_login_date(request.login_date.as_ref())?;
    let ip_address = request
        .ip_address
        .as_deref()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map_or(peer_ip, str::to_string);

    let id = state
        .db
        .log_hwid_event(&NewHwidLog {
            hwid,
            launcher_install_uuid,
            player_name,
            account_type,
            login_date,
            ip_address: &ip_address,
            has_joined_with_this_hwid: request.has_joined_with_this_hwid,
        })
        .await?;
    info!(hwid = %hwid, player = %player_name, "HWID event logged");
    Ok(Json(json!({"id": id})))
}

#[derive(Debug, Deserialize)]
pub struct JoinedRequest {
    hwid: Option<String>,
}

/// `POST /public/hwid/joined`
pub async fn mark_hwid_joined(
    State(state): State<AppState>,
    Json(request): Json<JoinedRequest>,
) -> Result<Json<HwidJoined>, ApiError> {
    let hwid = require_field(request.hwid.as_deref(), "hwid")?;
    Ok(Json(state.db.mark_hwid_joined(hwid).await?))
}

#[derive(Debug, Deserialize)]
pub struct CheckHwidQuery {
    hwid: Option<String>,
}

/// `GET /public/check-hwid`, the launcher's ban pre-check.
pub async fn check_hwid(
    State(state): State<AppState>,
    Query(query): Query<CheckHwidQuery>,
) -> Result<Json<bool>, ApiError> {
    let hwid = require_field(query.hwid.as_deref(), "hwid")?;
    Ok(Json(state.db.is_hwid_banned(hwid).await?))
}
