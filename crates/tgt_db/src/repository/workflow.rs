use chrono::NaiveDate;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tgt_core::models::{AssignmentRole, AssignmentStatus, TgStatus};
use tgt_core::reminders::{Phase, ReminderCandidate, Trigger};
use tgt_core::workflow::Transition;

use crate::error::{Error, Result};
use crate::models::{DueTg, ReminderRow};

/// Set-based writes and queries behind the daily jobs.
///
/// The run day is always bound as a parameter rather than read from
/// `CURRENT_DATE`, so a past day can be replayed.
#[derive(Clone)]
pub struct WorkflowRepository {
    pool: MySqlPool,
}

/// UPDATE for one transition, and how many times the run day is bound after the status.
fn transition_sql(transition: Transition) -> (&'static str, usize) {
    match transition {
        Transition::ToLeDraft => (
            r#"
            UPDATE TG
            SET TG_LastUpdated = CURRENT_TIMESTAMP, Status_Code = ?
            WHERE LE_Draft_StartDate = ? AND Status_Code != 'DEL'
            "#,
            1,
        ),
        Transition::ToIeComments => (
            r#"
            UPDATE TG
            SET TG_LastUpdated = CURRENT_TIMESTAMP, Status_Code = ?
            WHERE IE_Comments_StartDate = ? AND Status_Code != 'DEL'
            "#,
            1,
        ),
        Transition::ToLeChecking => (
            r#"
            UPDATE TG
            SET TG_LastUpdated = CURRENT_TIMESTAMP, Status_Code = ?
            WHERE LE_Checking_StartDate = ? AND Status_Code != 'DEL'
            "#,
            1,
        ),
        Transition::ToLeSignedOff => (
            r#"
            UPDATE TG
            SET TG_LastUpdated = CURRENT_TIMESTAMP, Status_Code = ?
            WHERE DATE(LE_Checking_EndDate) + INTERVAL 1 DAY = ? AND Status_Code != 'DEL'
            "#,
            1,
        ),
        Transition::ToStudy => (
            r#"
            UPDATE TG
            SET CPI_date = CURRENT_TIMESTAMP, Status_Code = ?
            WHERE (LE_Draft_EndDate = ? OR LE_Checking_EndDate = ?) AND Status_Code != 'DEL'
            "#,
            2,
        ),
    }
}

impl WorkflowRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn find_due_today(&self, today: NaiveDate) -> Result<Vec<DueTg>> {
        sqlx::query_as::<_, DueTg>(
            r#"
            SELECT TG_Reference AS reference, Status_Code AS status
            FROM TG
            WHERE (
                LE_Draft_StartDate = ? OR
                IE_Comments_StartDate = ? OR
                LE_Checking_StartDate = ? OR
                DATE(LE_Checking_EndDate) + INTERVAL 1 DAY = ? OR
                LE_Draft_EndDate = ? OR
                LE_Checking_EndDate = ?
            ) AND Status_Code != 'DEL'
            "#,
        )
        .bind(today)
        .bind(today)
        .bind(today)
        .bind(today)
        .bind(today)
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Returns the number of rows the UPDATE changed.
    pub async fn apply_transition(&self, transition: Transition, today: NaiveDate) -> Result<u64> {
        let (sql, date_binds) = transition_sql(transition);

        let mut query = sqlx::query(sql).bind(transition.target().code());
        for _ in 0..date_binds {
            query = query.bind(today);
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    pub async fn find_tg_ids_by_status(&self, statuses: &[TgStatus]) -> Result<Vec<i32>> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new("SELECT TG_ID FROM TG WHERE Status_Code IN (");
        let mut separated = builder.separated(", ");
        for status in statuses {
            separated.push_bind(status.code());
        }
        separated.push_unseparated(")");

        builder
            .build_query_scalar::<i32>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Marks every IE assignment on the given TGs inactive. Rows are kept.
    pub async fn deactivate_ie_users(&self, tg_ids: &[i32]) -> Result<u64> {
        if tg_ids.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<MySql> = QueryBuilder::new("UPDATE Tg_Users SET Status_Code = ");
        builder.push_bind(AssignmentStatus::Inactive.code());
        builder.push(" WHERE Role_Code = ");
        builder.push_bind(AssignmentRole::InterestedExpert.code());
        builder.push(" AND TG_ID IN (");
        let mut separated = builder.separated(", ");
        for id in tg_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");
        // Already-inactive rows are not rewritten, so a rerun reports zero.
        builder.push(" AND Status_Code != ");
        builder.push_bind(AssignmentStatus::Inactive.code());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Assignees to remind for one phase and trigger on `today`.
    pub async fn find_reminders(
        &self,
        phase: Phase,
        trigger: Trigger,
        today: NaiveDate,
    ) -> Result<Vec<ReminderCandidate>> {
        let Some(target) = trigger.target_date(today) else {
            return Ok(Vec::new());
        };

        // Column names come from the closed Phase table, never from input.
        let sql = format!(
            r#"
            SELECT
                tg.TG_ID AS tg_id,
                tg.TG_Reference AS tg_reference,
                tg.{start} AS start_date,
                tg.{end} AS end_date,
                up.User_ID AS user_id,
                up.PrimaryEmail AS email,
                up.FirstName AS first_name
            FROM TG tg
            JOIN Tg_Users tu ON tg.TG_ID = tu.TG_ID
            JOIN User_Profile up ON tu.User_ID = up.User_ID
            WHERE DATE(tg.{anchor}) = ?
              AND tg.Status_Code = ?
              AND tu.Role_Code = ?
            "#,
            start = phase.start_column(),
            end = phase.end_column(),
            anchor = trigger.date_column(phase),
        );

        let rows = sqlx::query_as::<_, ReminderRow>(&sql)
            .bind(target)
            .bind(phase.status().code())
            .bind(phase.role().code())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(rows.into_iter().map(ReminderCandidate::from).collect())
    }
}
