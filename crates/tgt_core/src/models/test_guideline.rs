use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::status::TgStatus;

/// One scheduled phase of a TG: (start date, end date). Either end may be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl PhaseWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }
}

// ---------------------------------------------------------------------------
// The schedule-bearing slice of a TG row.
// Only the fields the daily transitions read or write.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TgSchedule {
    pub id: i32,
    pub reference: String,
    pub status: TgStatus,

    pub le_draft: PhaseWindow,
    pub ie_comments: PhaseWindow,
    pub le_checking: PhaseWindow,

    /// TG_LastUpdated
    pub last_updated: Option<NaiveDateTime>,
    /// CPI_date, set when the TG moves to Study
    pub completed_at: Option<NaiveDateTime>,
}

impl TgSchedule {
    pub fn new(id: i32, reference: impl Into<String>, status: TgStatus) -> Self {
        Self {
            id,
            reference: reference.into(),
            status,
            le_draft: PhaseWindow::default(),
            ie_comments: PhaseWindow::default(),
            le_checking: PhaseWindow::default(),
            last_updated: None,
            completed_at: None,
        }
    }
}
