use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use tgt_core::reminders::ReminderCandidate;

/// A TG with at least one watched date falling on the run day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct DueTg {
    pub reference: String,
    pub status: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReminderRow {
    pub tg_id: i32,
    pub tg_reference: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub user_id: i32,
    pub email: Option<String>,
    pub first_name: Option<String>,
}

impl From<ReminderRow> for ReminderCandidate {
    fn from(row: ReminderRow) -> Self {
        ReminderCandidate {
            tg_id: row.tg_id,
            tg_reference: row.tg_reference,
            start_date: row.start_date,
            end_date: row.end_date,
            user_id: row.user_id,
            email: row.email,
            first_name: row.first_name,
        }
    }
}
