use chrono::NaiveDate;
use std::fmt;

use crate::models::{TgSchedule, TgStatus};
use crate::workflow::{day_after, Stamp};

/// The closed set of daily status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    ToLeDraft,
    ToIeComments,
    ToLeChecking,
    ToLeSignedOff,
    ToStudy,
}

impl Transition {
    /// Fixed evaluation order. Later entries overwrite earlier ones on the same row.
    pub const DAILY_ORDER: [Transition; 5] = [
        Transition::ToLeDraft,
        Transition::ToIeComments,
        Transition::ToLeChecking,
        Transition::ToLeSignedOff,
        Transition::ToStudy,
    ];

    pub fn target(&self) -> TgStatus {
        match self {
            Transition::ToLeDraft => TgStatus::LeDraft,
            Transition::ToIeComments => TgStatus::IeComments,
            Transition::ToLeChecking => TgStatus::LeChecking,
            Transition::ToLeSignedOff => TgStatus::LeSignedOff,
            Transition::ToStudy => TgStatus::Study,
        }
    }

    pub fn stamp(&self) -> Stamp {
        match self {
            Transition::ToStudy => Stamp::CompletedAt,
            _ => Stamp::LastUpdated,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Transition::ToLeDraft => "LE Draft",
            Transition::ToIeComments => "IE Comments",
            Transition::ToLeChecking => "LE Checking",
            Transition::ToLeSignedOff => "LE Signed Off",
            Transition::ToStudy => "Study",
        }
    }

    /// Date condition only, ignoring the current status.
    pub fn is_due(&self, tg: &TgSchedule, today: NaiveDate) -> bool {
        let on = |date: Option<NaiveDate>| date == Some(today);

        match self {
            // =================================================================
            // LE_Draft_StartDate == today -> LED
            // =================================================================
            Transition::ToLeDraft => on(tg.le_draft.start),

            // =================================================================
            // IE_Comments_StartDate == today -> IEC
            // =================================================================
            Transition::ToIeComments => on(tg.ie_comments.start),

            // =================================================================
            // LE_Checking_StartDate == today -> LEC
            // =================================================================
            Transition::ToLeChecking => on(tg.le_checking.start),

            // =================================================================
            // LE_Checking_EndDate + 1 day == today -> LES
            // =================================================================
            Transition::ToLeSignedOff => tg.le_checking.end.and_then(day_after) == Some(today),

            // =================================================================
            // LE_Draft_EndDate == today OR LE_Checking_EndDate == today -> STU
            // =================================================================
            Transition::ToStudy => on(tg.le_draft.end) || on(tg.le_checking.end),
        }
    }

    /// Full row predicate: the date condition on a row that is not soft-deleted.
    pub fn applies_to(&self, tg: &TgSchedule, today: NaiveDate) -> bool {
        !tg.status.is_deleted() && self.is_due(tg, today)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
