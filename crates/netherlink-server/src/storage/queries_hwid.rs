//! HWID telemetry and ban queries.

use netherlink_core::DatabaseError;
use netherlink_core::db::unix_timestamp;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

use super::db::PanelDatabase;
use super::models::{HwidBan, HwidJoined, HwidLog};

pub const DEFAULT_SEARCH_LIMIT: i64 = 50;
pub const MAX_SEARCH_LIMIT: i64 = 200;

/// Field set for one telemetry event. The stored joined flag may end up
/// higher than the submitted one, never lower.
#[derive(Debug, Clone)]
pub struct NewHwidLog<'a> {
    pub hwid: &'a str,
    pub launcher_install_uuid: &'a str,
    pub player_name: &'a str,
    pub account_type: &'a str,
    pub login_date: i64,
    pub ip_address: &'a str,
    pub has_joined_with_this_hwid: bool,
}

/// Search filters. Text fields match as substrings, `account_type` and the
/// joined flag match exactly, the login range is inclusive on both ends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HwidSearchParams {
    pub hwid: Option<String>,
    pub launcher_install_uuid: Option<String>,
    pub player_name: Option<String>,
    pub account_type: Option<String>,
    pub ip_address: Option<String>,
    pub has_joined_with_this_hwid: Option<bool>,
    pub login_date_from: Option<i64>,
    pub login_date_to: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HwidSearchPage {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub logs: Vec<HwidLog>,
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, params: &HwidSearchParams) {
    builder.push(" WHERE 1 = 1");
    if let Some(hwid) = &params.hwid {
        builder.push(" AND hwid LIKE ");
        builder.push_bind(format!("%{hwid}%"));
    }
    if let Some(uuid) = &params.launcher_install_uuid {
        builder.push(" AND launcher_install_uuid LIKE ");
        builder.push_bind(format!("%{uuid}%"));
    }
    if let Some(player_name) = &params.player_name {
        builder.push(" AND player_name LIKE ");
        builder.push_bind(format!("%{player_name}%"));
    }
    if let Some(ip_address) = &params.ip_address {
        builder.push(" AND ip_address LIKE ");
        builder.push_bind(format!("%{ip_address}%"));
    }
    if let Some(account_type) = &params.account_type {
        builder.push(" AND account_type = ");
        builder.push_bind(account_type.clone());
    }
    if let Some(joined) = params.has_joined_with_this_hwid {
        builder.push(" AND has_joined_with_this_hwid = ");
        builder.push_bind(joined);
    }
    if let Some(from) = params.login_date_from {
        builder.push(" AND login_date >= ");
        builder.push_bind(from);
    }
    if let Some(to) = params.login_date_to {
        builder.push(" AND login_date <= ");
        builder.push_bind(to);
    }
}

// ==== HWID log queries ====

impl PanelDatabase {
    /// Append a telemetry event and return its row id. The stored joined
    /// flag ORs in the joined marker so the flag stays monotonic per hwid
    /// without a separate read.
    pub async fn log_hwid_event(&self, event: &NewHwidLog<'_>) -> Result<i64, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO hwid_logs (hwid, launcher_install_uuid, player_name, account_type, \
             login_date, ip_address, has_joined_with_this_hwid, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ? OR EXISTS(SELECT 1 FROM hwid_joined WHERE hwid = ?), ?)",
        )
        .bind(event.hwid)
        .bind(event.launcher_install_uuid)
        .bind(event.player_name)
        .bind(event.account_type)
        .bind(event.login_date)
        .bind(event.ip_address)
        .bind(event.has_joined_with_this_hwid)
        .bind(event.hwid)
        .bind(unix_timestamp())
        .execute(self.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn get_hwid_log(&self, id: i64) -> Result<HwidLog, DatabaseError> {
        sqlx::query_as::<_, HwidLog>("SELECT * FROM hwid_logs WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("HWID log {id}")))
    }

    pub async fn search_hwid_logs(
        &self,
        params: &HwidSearchParams,
    ) -> Result<HwidSearchPage, DatabaseError> {
        let limit = params
            .limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM hwid_logs");
        push_filters(&mut count, params);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool())
            .await?;

        let mut page = QueryBuilder::<Sqlite>::new("SELECT * FROM hwid_logs");
        push_filters(&mut page, params);
        page.push(" ORDER BY login_date DESC, id DESC LIMIT ");
        page.push_bind(limit);
        page.push(" OFFSET ");
        page.push_bind(offset);
        let logs = page
            .build_query_as::<HwidLog>()
            .fetch_all(self.pool())
            .await?;

        Ok(HwidSearchPage {
            total,
            limit,
            offset,
            logs,
        })
    }
}

// ==== HWID joined-marker queries ====

impl PanelDatabase {
    /// Record that `hwid` has joined a server at least once. Idempotent:
    /// repeat calls return the original marker unchanged.
    pub async fn mark_hwid_joined(&self, hwid: &str) -> Result<HwidJoined, DatabaseError> {
        sqlx::query(
            "INSERT INTO hwid_joined (hwid, created_at) VALUES (?, ?) \
             ON CONFLICT(hwid) DO NOTHING",
        )
        .bind(hwid)
        .bind(unix_timestamp())
        .execute(self.pool())
        .await?;

        sqlx::query_as::<_, HwidJoined>("SELECT * FROM hwid_joined WHERE hwid = ?")
            .bind(hwid)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("HWID joined marker {hwid}")))
    }
}

// ==== HWID ban queries ====

impl PanelDatabase {
    /// Ban `hwid`, or refresh the reason and timestamp when it is already
    /// banned.
    pub async fn ban_hwid(
        &self,
        hwid: &str,
        reason: Option<&str>,
    ) -> Result<HwidBan, DatabaseError> {
        sqlx::query(
            "INSERT INTO hwid_bans (hwid, reason, banned_at) VALUES (?, ?, ?) \
             ON CONFLICT(hwid) DO UPDATE SET reason = excluded.reason, \
             banned_at = excluded.banned_at",
        )
        .bind(hwid)
        .bind(reason)
        .bind(unix_timestamp())
        .execute(self.pool())
        .await?;

        self.get_hwid_ban(hwid).await
    }

    pub async fn get_hwid_ban(&self, hwid: &str) -> Result<HwidBan, DatabaseError> {
        sqlx::query_as::<_, HwidBan>("SELECT * FROM hwid_bans WHERE hwid = ?")
            .bind(hwid)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("HWID ban {hwid}")))
    }

    pub async fn unban_hwid(&self, hwid: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM hwid_bans WHERE hwid = ?")
            .bind(hwid)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn is_hwid_banned(&self, hwid: &str) -> Result<bool, DatabaseError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM hwid_bans WHERE hwid = ?")
            .bind(hwid)
            .fetch_optional(self.pool())
            .await?;
        Ok(row.is_some())
    }

    pub async fn list_hwid_bans(&self) -> Result<Vec<HwidBan>, DatabaseError> {
        let bans =
            sqlx::query_as::<_, HwidBan>("SELECT * FROM hwid_bans ORDER BY banned_at DESC")
                .fetch_all(self.pool())
                .await?;
        Ok(bans)
    }
}
