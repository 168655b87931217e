//! Launcher and Java asset queries.

use netherlink_core::DatabaseError;
use netherlink_core::db::unix_timestamp;
use serde_json::Value;

use super::db::PanelDatabase;
use super::models::{
    JavaAsset, JavaAssetRow, JavaSource, LauncherAsset, LauncherAssetRow, NewLauncherAsset,
    encode_json,
};

// ==== Launcher asset queries ====

impl PanelDatabase {
    pub async fn create_asset(
        &self,
        asset: &NewLauncherAsset,
    ) -> Result<LauncherAsset, DatabaseError> {
        let now = unix_timestamp();
        // The legacy `version` column mirrors the default entry so rows stay
        // readable by deployments that predate version sets.
        let default_version = asset.versions.first().cloned().unwrap_or_default();
        sqlx::query(
            "INSERT INTO launcher_assets (client_id, version, server, base_url, \
             mods_manifest_url, rp_manifest_url, private_key, social_media, versions, \
             version_configs, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&asset.client_id)
        .bind(&default_version)
        .bind(&asset.server)
        .bind(&asset.base_url)
        .bind(&asset.mods_manifest_url)
        .bind(&asset.rp_manifest_url)
        .bind(&asset.private_key)
        .bind(encode_json(&asset.social_media, "{}"))
        .bind(encode_json(&asset.versions, "[]"))
        .bind(encode_json(&asset.version_configs, "{}"))
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_asset(&asset.client_id).await
    }

    pub async fn get_asset(&self, client_id: &str) -> Result<LauncherAsset, DatabaseError> {
        let row =
            sqlx::query_as::<_, LauncherAssetRow>("SELECT * FROM launcher_assets WHERE client_id = ?")
                .bind(client_id)
                .fetch_optional(self.pool())
                .await?
                .ok_or_else(|| DatabaseError::NotFound(format!("Launcher asset {client_id}")))?;
        Ok(row.into_asset())
    }

    pub async fn asset_exists(&self, client_id: &str) -> Result<bool, DatabaseError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM launcher_assets WHERE client_id = ?")
                .bind(client_id)
                .fetch_optional(self.pool())
                .await?;
        Ok(row.is_some())
    }

    pub async fn list_assets(&self) -> Result<Vec<LauncherAsset>, DatabaseError> {
        let rows = sqlx::query_as::<_, LauncherAssetRow>(
            "SELECT * FROM launcher_assets ORDER BY created_at DESC",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(rows.into_iter().map(LauncherAssetRow::into_asset).collect())
    }

    /// Persist every mutable column of `asset` and return the stored row.
    pub async fn update_asset(&self, asset: &LauncherAsset) -> Result<LauncherAsset, DatabaseError> {
        let now = unix_timestamp();
        let default_version = asset.default_version().unwrap_or_default().to_string();
        let result = sqlx::query(
            "UPDATE launcher_assets SET version = ?, server = ?, base_url = ?, \
             mods_manifest_url = ?, rp_manifest_url = ?, private_key = ?, social_media = ?, \
             versions = ?, version_configs = ?, updated_at = ? WHERE client_id = ?",
        )
        .bind(&default_version)
        .bind(&asset.server)
        .bind(&asset.base_url)
        .bind(&asset.mods_manifest_url)
        .bind(&asset.rp_manifest_url)
        .bind(&asset.private_key)
        .bind(encode_json(&asset.social_media, "{}"))
        .bind(encode_json(&asset.versions, "[]"))
        .bind(encode_json(&asset.version_configs, "{}"))
        .bind(now)
        .bind(&asset.client_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!(
                "Launcher asset {}",
                asset.client_id
            )));
        }
        self.get_asset(&asset.client_id).await
    }

    pub async fn delete_asset(&self, client_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM launcher_assets WHERE client_id = ?")
            .bind(client_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ==== Java asset queries ====

impl PanelDatabase {
    pub async fn get_java_asset(&self) -> Result<Option<JavaAsset>, DatabaseError> {
        let row = sqlx::query_as::<_, JavaAssetRow>("SELECT * FROM java_assets WHERE id = 1")
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(JavaAssetRow::into_asset))
    }

    pub async fn upsert_java_asset(
        &self,
        source: JavaSource,
        java_data: Option<&Value>,
    ) -> Result<JavaAsset, DatabaseError> {
        let now = unix_timestamp();
        let encoded = java_data.map(|data| encode_json(data, "null"));
        sqlx::query(
            "INSERT INTO java_assets (id, source, java_data, updated_at) VALUES (1, ?, ?, ?) \
             ON CONFLICT(id) DO UPDATE SET source = excluded.source, \
             java_data = excluded.java_data, updated_at = excluded.updated_at",
        )
        .bind(source.as_str())
        .bind(&encoded)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_java_asset()
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Java asset".to_string()))
    }
}
