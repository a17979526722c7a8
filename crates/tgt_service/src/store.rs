use async_trait::async_trait;
use chrono::NaiveDate;
use tgt_core::models::TgStatus;
use tgt_core::reminders::{Phase, ReminderCandidate, Trigger};
use tgt_core::workflow::Transition;
use tgt_db::models::DueTg;
use tgt_db::{Result, WorkflowRepository};

/// What the daily jobs need from the relational store.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    async fn find_due_today(&self, today: NaiveDate) -> Result<Vec<DueTg>>;

    /// Applies one transition as a set-based update; returns the affected row count.
    async fn apply_transition(&self, transition: Transition, today: NaiveDate) -> Result<u64>;

    async fn find_tg_ids_by_status(&self, statuses: &[TgStatus]) -> Result<Vec<i32>>;

    async fn deactivate_ie_users(&self, tg_ids: &[i32]) -> Result<u64>;

    async fn find_reminders(
        &self,
        phase: Phase,
        trigger: Trigger,
        today: NaiveDate,
    ) -> Result<Vec<ReminderCandidate>>;
}

#[async_trait]
impl WorkflowStore for WorkflowRepository {
    async fn find_due_today(&self, today: NaiveDate) -> Result<Vec<DueTg>> {
        WorkflowRepository::find_due_today(self, today).await
    }

    async fn apply_transition(&self, transition: Transition, today: NaiveDate) -> Result<u64> {
        WorkflowRepository::apply_transition(self, transition, today).await
    }

    async fn find_tg_ids_by_status(&self, statuses: &[TgStatus]) -> Result<Vec<i32>> {
        WorkflowRepository::find_tg_ids_by_status(self, statuses).await
    }

    async fn deactivate_ie_users(&self, tg_ids: &[i32]) -> Result<u64> {
        WorkflowRepository::deactivate_ie_users(self, tg_ids).await
    }

    async fn find_reminders(
        &self,
        phase: Phase,
        trigger: Trigger,
        today: NaiveDate,
    ) -> Result<Vec<ReminderCandidate>> {
        WorkflowRepository::find_reminders(self, phase, trigger, today).await
    }
}
