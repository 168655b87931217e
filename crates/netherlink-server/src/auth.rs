//! Bearer-key authentication for admin routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sha2::{Digest, Sha256};

use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::ApiKey;

/// One-way digest stored and compared in place of raw API keys.
pub fn hash_api_key(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A request that presented a valid, active API key.
#[derive(Clone, Debug)]
pub struct AdminKey(pub ApiKey);

impl FromRequestParts<AppState> for AdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .map(|header| header.strip_prefix("Bearer ").unwrap_or(header).trim())
            .unwrap_or("");

        // Unknown and deactivated keys take the same path to the same
        // response; nothing about key existence leaks.
        let Some(key) = state.db.find_active_api_key(&hash_api_key(token)).await? else {
            return Err(ApiError::Unauthorized);
        };
        state.db.touch_api_key(key.id).await?;
        Ok(Self(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_hex() {
        // SHA-256 of the empty string.
        assert_eq!(
            hash_api_key(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(hash_api_key("secret"), hash_api_key("secret"));
    }

    #[test]
    fn distinct_keys_produce_distinct_hashes() {
        assert_ne!(hash_api_key("key-a"), hash_api_key("key-b"));
    }
}
