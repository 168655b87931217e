//! API key queries. Only key hashes are stored; raw keys exist in memory
//! for the single response that issues them.

use netherlink_core::DatabaseError;
use netherlink_core::db::unix_timestamp;

use super::db::PanelDatabase;
use super::models::ApiKey;

// ==== API key queries ====

impl PanelDatabase {
    pub async fn create_api_key(
        &self,
        key_hash: &str,
        name: &str,
    ) -> Result<ApiKey, DatabaseError> {
        let now = unix_timestamp();
        let result = sqlx::query(
            "INSERT INTO api_keys (key_hash, name, is_active, created_at) VALUES (?, ?, 1, ?)",
        )
        .bind(key_hash)
        .bind(name)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_api_key(result.last_insert_rowid()).await
    }

    /// Insert a key if its hash is not present yet. Used for the bootstrap
    /// admin key so restarts do not duplicate it.
    pub async fn ensure_api_key(&self, key_hash: &str, name: &str) -> Result<(), DatabaseError> {
        let now = unix_timestamp();
        sqlx::query(
            "INSERT INTO api_keys (key_hash, name, is_active, created_at) VALUES (?, ?, 1, ?) \
             ON CONFLICT(key_hash) DO NOTHING",
        )
        .bind(key_hash)
        .bind(name)
        .bind(now)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn get_api_key(&self, id: i64) -> Result<ApiKey, DatabaseError> {
        sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("API key {id}")))
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>, DatabaseError> {
        let keys = sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys ORDER BY created_at DESC")
            .fetch_all(self.pool())
            .await?;
        Ok(keys)
    }

    /// Look up a key by hash, active keys only. Inactive and unknown hashes
    /// are indistinguishable to the caller.
    pub async fn find_active_api_key(
        &self,
        key_hash: &str,
    ) -> Result<Option<ApiKey>, DatabaseError> {
        let key = sqlx::query_as::<_, ApiKey>(
            "SELECT * FROM api_keys WHERE key_hash = ? AND is_active = 1",
        )
        .bind(key_hash)
        .fetch_optional(self.pool())
        .await?;
        Ok(key)
    }

    pub async fn touch_api_key(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE api_keys SET last_used = ? WHERE id = ?")
            .bind(unix_timestamp())
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Soft delete: the row is kept so audit history survives, the key just
    /// stops validating.
    pub async fn deactivate_api_key(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE api_keys SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
