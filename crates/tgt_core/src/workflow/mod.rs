//! Date-driven TG status transitions.
//!
//! Each [`Transition`] is evaluated once per day as an independent set-based
//! update. They run in [`Transition::DAILY_ORDER`] with no exclusivity check:
//! a row matched by two transitions receives both, so the later one wins.

use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::models::{TgSchedule, TgStatus};

pub mod transitions;

pub use transitions::Transition;

/// Statuses in which Interested Experts lose their active assignment.
pub const IE_LOCKOUT_STATUSES: [TgStatus; 2] = [TgStatus::LeChecking, TgStatus::LeSignedOff];

/// Which timestamp a transition writes alongside the new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    /// TG_LastUpdated
    LastUpdated,
    /// CPI_date
    CompletedAt,
}

/// The six dates the daily run watches, for logging what is about to move.
/// In-memory stores use this; `tgt_db` evaluates the same rule in SQL.
pub fn has_date_today(tg: &TgSchedule, today: NaiveDate) -> bool {
    !tg.status.is_deleted()
        && Transition::DAILY_ORDER
            .iter()
            .any(|transition| transition.is_due(tg, today))
}

pub(crate) fn day_after(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(1))
}

/// Applies a transition's effect to an in-memory row.
/// Callers are expected to have checked [`Transition::applies_to`].
/// The MySQL path performs this inside the UPDATE instead.
pub fn apply(transition: Transition, tg: &mut TgSchedule, now: NaiveDateTime) {
    tg.status = transition.target();
    match transition.stamp() {
        Stamp::LastUpdated => tg.last_updated = Some(now),
        Stamp::CompletedAt => tg.completed_at = Some(now),
    }
}
