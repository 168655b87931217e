//! SQLite database handle for the Netherlink panel.

use std::path::Path;

use sqlx::{Pool, Sqlite};
use tracing::info;

use netherlink_core::db::{DatabaseError, open_pool, open_pool_in_memory};

/// Panel database handle. Cheap to clone; each clone shares the pool.
#[derive(Clone)]
pub struct PanelDatabase {
    pool: Pool<Sqlite>,
}

impl PanelDatabase {
    pub async fn open(path: &Path) -> Result<Self, DatabaseError> {
        let pool = open_pool(path).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        let pool = open_pool_in_memory().await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        info!("Panel database migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
