//! Router assembly.

mod admin;
mod public;

use axum::Router;
use axum::routing::{delete, get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Reject empty-or-missing string fields with the validation envelope.
pub(crate) fn require_field<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{name} is required")))
}

/// Build the full panel router over `state`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(public::health))
        .route(
            "/public/assets/launcher",
            post(public::resolve_launcher_assets),
        )
        .route("/public/assets/java", get(public::java_assets))
        .route("/public/news", get(public::news_feed))
        .route("/public/hwid", post(public::log_hwid))
        .route("/public/hwid/joined", post(public::mark_hwid_joined))
        .route("/public/check-hwid", get(public::check_hwid))
        .route("/api/keys", get(admin::list_keys).post(admin::create_key))
        .route("/api/keys/{id}", delete(admin::delete_key))
        .route(
            "/api/assets/launcher",
            get(admin::list_assets).post(admin::create_asset),
        )
        .route(
            "/api/assets/launcher/{client_id}",
            get(admin::get_asset)
                .put(admin::update_asset)
                .delete(admin::delete_asset),
        )
        .route("/api/assets/java", get(admin::get_java).put(admin::put_java))
        .route("/api/news", get(admin::list_news).post(admin::create_news))
        .route(
            "/api/news/{id}",
            put(admin::update_news).delete(admin::delete_news),
        )
        .route("/api/hwid/search", post(admin::search_hwid))
        .route(
            "/api/hwid/bans",
            get(admin::list_bans).post(admin::create_ban),
        )
        .route("/api/hwid/bans/{hwid}", delete(admin::delete_ban))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
