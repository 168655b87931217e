//! Admin routes. Every handler takes the `AdminKey` extractor, so a missing
//! or invalid bearer key rejects before any body parsing.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{AdminKey, hash_api_key};
use crate::error::ApiError;
use crate::registry;
use crate::state::AppState;
use crate::storage::{
    ApiKey, HwidBan, HwidSearchPage, HwidSearchParams, JavaAsset, JavaSource, LauncherAsset,
    NewsItem,
};

use super::require_field;

// ==== API keys ====

/// `GET /api/keys`, metadata only, never key material.
pub async fn list_keys(
    State(state): State<AppState>,
    _key: AdminKey,
) -> Result<Json<Vec<ApiKey>>, ApiError> {
    Ok(Json(state.db.list_api_keys().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateKeyRequest {
    name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedKey {
    /// Raw key, returned exactly once at creation.
    key: String,
    #[serde(flatten)]
    info: ApiKey,
}

/// `POST /api/keys`
#[instrument(skip_all)]
pub async fn create_key(
    State(state): State<AppState>,
    _key: AdminKey,
    Json(request): Json<CreateKeyRequest>,
) -> Result<(StatusCode, Json<CreatedKey>), ApiError> {
    let name = require_field(request.name.as_deref(), "name")?;
    let raw = Uuid::new_v4().to_string();
    let info = state.db.create_api_key(&hash_api_key(&raw), name).await?;
    info!(id = info.id, name = %info.name, "API key issued");
    Ok((StatusCode::CREATED, Json(CreatedKey { key: raw, info })))
}

/// `DELETE /api/keys/{id}`, soft deactivation.
pub async fn delete_key(
    State(state): State<AppState>,
    _key: AdminKey,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.db.deactivate_api_key(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("API key {id}")))
    }
}

// ==== Launcher assets ====

/// `GET /api/assets/launcher`
pub async fn list_assets(
    State(state): State<AppState>,
    _key: AdminKey,
) -> Result<Json<Vec<LauncherAsset>>, ApiError> {
    Ok(Json(state.db.list_assets().await?))
}

/// `GET /api/assets/launcher/{client_id}`
pub async fn get_asset(
    State(state): State<AppState>,
    _key: AdminKey,
    Path(client_id): Path<String>,
) -> Result<Json<LauncherAsset>, ApiError> {
    Ok(Json(state.db.get_asset(&client_id).await?))
}

/// `POST /api/assets/launcher`
#[instrument(skip_all)]
pub async fn create_asset(
    State(state): State<AppState>,
    _key: AdminKey,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<LauncherAsset>), ApiError> {
    let new_asset = registry::parse_new_asset(&body)?;
    if state.db.asset_exists(&new_asset.client_id).await? {
        return Err(ApiError::validation(format!(
            "client_id {} already exists",
            new_asset.client_id
        )));
    }
    let asset = state.db.create_asset(&new_asset).await?;
    info!(client_id = %asset.client_id, "Launcher asset created");
    Ok((StatusCode::CREATED, Json(asset)))
}

/// `PUT /api/assets/launcher/{client_id}`, partial update.
#[instrument(skip_all, fields(client_id = %client_id))]
pub async fn update_asset(
    State(state): State<AppState>,
    _key: AdminKey,
    Path(client_id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<LauncherAsset>, ApiError> {
    let mut asset = state.db.get_asset(&client_id).await?;
    registry::apply_asset_update(&mut asset, &body)?;
    Ok(Json(state.db.update_asset(&asset).await?))
}

/// `DELETE /api/assets/launcher/{client_id}`
pub async fn delete_asset(
    State(state): State<AppState>,
    _key: AdminKey,
    Path(client_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_asset(&client_id).await? {
        info!(client_id = %client_id, "Launcher asset deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Launcher asset {client_id}")))
    }
}

// ==== Java runtime ====

/// `GET /api/assets/java`
pub async fn get_java(
    State(state): State<AppState>,
    _key: AdminKey,
) -> Result<Json<JavaAsset>, ApiError> {
    state
        .db
        .get_java_asset()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Java asset"))
}

#[derive(Debug, Deserialize)]
pub struct PutJavaRequest {
    source: Option<String>,
    java_data: Option<Value>,
}

/// `PUT /api/assets/java`, upsert of the singleton.
pub async fn put_java(
    State(state): State<AppState>,
    _key: AdminKey,
    Json(request): Json<PutJavaRequest>,
) -> Result<Json<JavaAsset>, ApiError> {
    let source = require_field(request.source.as_deref(), "source")?;
    let source = JavaSource::parse(source)
        .ok_or_else(|| ApiError::validation("source must be \"cdn\" or \"custom\""))?;
    let java_data = match source {
        JavaSource::Custom => Some(request.java_data.ok_or_else(|| {
            ApiError::validation("java_data is required when source is custom")
        })?),
        JavaSource::Cdn => None,
    };
    Ok(Json(
        state.db.upsert_java_asset(source, java_data.as_ref()).await?,
    ))
}

// ==== News ====

/// `GET /api/news`, every item regardless of scope.
pub async fn list_news(
    State(state): State<AppState>,
    _key: AdminKey,
) -> Result<Json<Vec<NewsItem>>, ApiError> {
    Ok(Json(state.db.list_all_news().await?))
}

#[derive(Debug, Deserialize)]
pub struct NewsRequest {
    client_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    image: Option<String>,
}

impl NewsRequest {
    /// Empty or missing client_id means globally visible.
    fn scope(&self) -> Option<&str> {
        self.client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// `POST /api/news`
pub async fn create_news(
    State(state): State<AppState>,
    _key: AdminKey,
    Json(request): Json<NewsRequest>,
) -> Result<(StatusCode, Json<NewsItem>), ApiError> {
    let title = require_field(request.title.as_deref(), "title")?;
    let description = require_field(request.description.as_deref(), "description")?;
    let item = state
        .db
        .create_news(request.scope(), title, description, request.image.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /api/news/{id}`
pub async fn update_news(
    State(state): State<AppState>,
    _key: AdminKey,
    Path(id): Path<i64>,
    Json(request): Json<NewsRequest>,
) -> Result<Json<NewsItem>, ApiError> {
    let title = require_field(request.title.as_deref(), "title")?;
    let description = require_field(request.description.as_deref(), "description")?;
    let item = state
        .db
        .update_news(id, request.scope(), title, description, request.image.as_deref())
        .await?;
    Ok(Json(item))
}

/// `DELETE /api/news/{id}`
pub async fn delete_news(
    State(state): State<AppState>,
    _key: AdminKey,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.db.delete_news(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("News item {id}")))
    }
}

// ==== HWID administration ====

/// `POST /api/hwid/search`
pub async fn search_hwid(
    State(state): State<AppState>,
    _key: AdminKey,
    Json(params): Json<HwidSearchParams>,
) -> Result<Json<HwidSearchPage>, ApiError> {
    Ok(Json(state.db.search_hwid_logs(&params).await?))
}

/// `GET /api/hwid/bans`
pub async fn list_bans(
    State(state): State<AppState>,
    _key: AdminKey,
) -> Result<Json<Vec<HwidBan>>, ApiError> {
    Ok(Json(state.db.list_hwid_bans().await?))
}

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    hwid: Option<String>,
    reason: Option<String>,
}

/// `POST /api/hwid/bans`, upsert: re-banning refreshes reason and timestamp.
pub async fn create_ban(
    State(state): State<AppState>,
    _key: AdminKey,
    Json(request): Json<BanRequest>,
) -> Result<Json<HwidBan>, ApiError> {
    let hwid = require_field(request.hwid.as_deref(), "hwid")?;
    let ban = state.db.ban_hwid(hwid, request.reason.as_deref()).await?;
    info!(hwid = %ban.hwid, "HWID banned");
    Ok(Json(ban))
}

/// `DELETE /api/hwid/bans/{hwid}`
pub async fn delete_ban(
    State(state): State<AppState>,
    _key: AdminKey,
    Path(hwid): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.db.unban_hwid(&hwid).await? {
        info!(hwid = %hwid, "HWID unbanned");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("HWID ban {hwid}")))
    }
}
