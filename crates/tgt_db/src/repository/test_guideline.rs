use sqlx::MySqlPool;
use tgt_core::models::TgStatus;

use crate::error::{Error, Result};
use crate::models::{AssignedUser, DashboardStats, TestGuidelineDetail, TestGuidelineSummary};

/// Paging and filtering for the TG list. Bounds are enforced by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListFilter {
    pub status: Option<TgStatus>,
    pub limit: i64,
    pub offset: i64,
}

/// Read-side projections over TG. Soft-deleted rows are never returned.
pub struct TestGuidelineRepository {
    pool: MySqlPool,
}

impl TestGuidelineRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Most recently updated first, with the Lead Expert's name joined in.
    pub async fn find_all(&self, filter: &ListFilter) -> Result<Vec<TestGuidelineSummary>> {
        let status = filter.status.map(|s| s.code());

        sqlx::query_as::<_, TestGuidelineSummary>(
            r#"
            SELECT
                tg.TG_ID AS id,
                tg.TG_Reference AS reference,
                tg.TG_Name AS name,
                tg.Status_Code AS status,
                tg.TG_LastUpdated AS last_updated,
                up.Full_Name AS lead_expert
            FROM TG tg
            LEFT JOIN Tg_Users tu ON tg.TG_ID = tu.TG_ID AND tu.Role_Code = 'LE'
            LEFT JOIN User_Profile up ON tu.User_ID = up.User_ID
            WHERE tg.Status_Code != 'DEL'
              AND (? IS NULL OR tg.Status_Code = ?)
            ORDER BY tg.TG_LastUpdated DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(status)
        .bind(status)
        .bind(filter.limit)
        .bind(filter.offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn count_all(&self, status: Option<TgStatus>) -> Result<i64> {
        let status = status.map(|s| s.code());

        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM TG
            WHERE Status_Code != 'DEL'
              AND (? IS NULL OR Status_Code = ?)
            "#,
        )
        .bind(status)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<TestGuidelineDetail>> {
        sqlx::query_as::<_, TestGuidelineDetail>(
            r#"
            SELECT
                tg.TG_ID AS id,
                tg.TG_Reference AS reference,
                tg.TG_Name AS name,
                tg.Language_Code AS language,
                tg.Status_Code AS status,
                tg.TG_LastUpdated AS last_updated,
                tg.LE_Draft_StartDate AS le_draft_start,
                tg.LE_Draft_EndDate AS le_draft_end,
                tg.IE_Comments_StartDate AS ie_comments_start,
                tg.IE_Comments_EndDate AS ie_comments_end,
                tg.LE_Checking_StartDate AS le_checking_start,
                tg.LE_Checking_EndDate AS le_checking_end
            FROM TG tg
            WHERE tg.TG_ID = ? AND tg.Status_Code != 'DEL'
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    pub async fn find_users_by_tg_id(&self, id: i32) -> Result<Vec<AssignedUser>> {
        sqlx::query_as::<_, AssignedUser>(
            r#"
            SELECT
                up.User_ID AS id,
                up.Full_Name AS full_name,
                up.PrimaryEmail AS email,
                tu.Role_Code AS role
            FROM Tg_Users tu
            JOIN User_Profile up ON tu.User_ID = up.User_ID
            WHERE tu.TG_ID = ?
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Counts per dashboard bucket. SUM over DECIMAL is cast back to an integer.
    pub async fn get_stats(&self) -> Result<DashboardStats> {
        sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                CAST(COALESCE(SUM(CASE WHEN Status_Code = 'LED' THEN 1 ELSE 0 END), 0) AS SIGNED) AS draft,
                CAST(COALESCE(SUM(CASE WHEN Status_Code = 'IEC' THEN 1 ELSE 0 END), 0) AS SIGNED) AS ie_comments,
                CAST(COALESCE(SUM(CASE WHEN Status_Code = 'LEC' THEN 1 ELSE 0 END), 0) AS SIGNED) AS le_checking,
                CAST(COALESCE(SUM(CASE WHEN Status_Code = 'ADO' THEN 1 ELSE 0 END), 0) AS SIGNED) AS adopted
            FROM TG
            WHERE Status_Code != 'DEL'
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }
}
