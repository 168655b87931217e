//! News queries.

use netherlink_core::DatabaseError;
use netherlink_core::db::unix_timestamp;

use super::db::PanelDatabase;
use super::models::NewsItem;

// ==== News queries ====

impl PanelDatabase {
    pub async fn create_news(
        &self,
        client_id: Option<&str>,
        title: &str,
        description: &str,
        image: Option<&str>,
    ) -> Result<NewsItem, DatabaseError> {
        let now = unix_timestamp();
        let result = sqlx::query(
            "INSERT INTO news (client_id, title, description, image, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(client_id)
        .bind(title)
        .bind(description)
        .bind(image)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_news(result.last_insert_rowid()).await
    }

    pub async fn get_news(&self, id: i64) -> Result<NewsItem, DatabaseError> {
        sqlx::query_as::<_, NewsItem>("SELECT * FROM news WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("News item {id}")))
    }

    /// Public feed: global items plus those scoped to `client_id`, newest
    /// first. With no client the feed is global items only.
    pub async fn list_news(&self, client_id: Option<&str>) -> Result<Vec<NewsItem>, DatabaseError> {
        let items = match client_id {
            Some(client_id) => {
                sqlx::query_as::<_, NewsItem>(
                    "SELECT * FROM news WHERE client_id IS NULL OR client_id = ? \
                     ORDER BY created_at DESC",
                )
                .bind(client_id)
                .fetch_all(self.pool())
                .await?
            }
            None => {
                sqlx::query_as::<_, NewsItem>(
                    "SELECT * FROM news WHERE client_id IS NULL ORDER BY created_at DESC",
                )
                .fetch_all(self.pool())
                .await?
            }
        };
        Ok(items)
    }

    /// Admin listing: every item regardless of scope.
    pub async fn list_all_news(&self) -> Result<Vec<NewsItem>, DatabaseError> {
        let items =
            sqlx::query_as::<_, NewsItem>("SELECT * FROM news ORDER BY created_at DESC")
                .fetch_all(self.pool())
                .await?;
        Ok(items)
    }

    pub async fn update_news(
        &self,
        id: i64,
        client_id: Option<&str>,
        title: &str,
        description: &str,
        image: Option<&str>,
    ) -> Result<NewsItem, DatabaseError> {
        let result = sqlx::query(
            "UPDATE news SET client_id = ?, title = ?, description = ?, image = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(client_id)
        .bind(title)
        .bind(description)
        .bind(image)
        .bind(unix_timestamp())
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("News item {id}")));
        }
        self.get_news(id).await
    }

    pub async fn delete_news(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
