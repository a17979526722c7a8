use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tgt_core::workflow::Transition;
use tracing::info;

use crate::TgService;

/// Rows moved by each transition in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateSummary {
    pub le_draft: u64,
    pub ie_comments: u64,
    pub le_checking: u64,
    pub le_signed_off: u64,
    pub study: u64,
}

impl StatusUpdateSummary {
    fn record(&mut self, transition: Transition, affected: u64) {
        let slot = match transition {
            Transition::ToLeDraft => &mut self.le_draft,
            Transition::ToIeComments => &mut self.ie_comments,
            Transition::ToLeChecking => &mut self.le_checking,
            Transition::ToLeSignedOff => &mut self.le_signed_off,
            Transition::ToStudy => &mut self.study,
        };
        *slot = affected;
    }
}

impl TgService {
    /// Runs every daily transition for `today`, in order.
    ///
    /// A failing step aborts the run; steps already applied stay applied.
    pub async fn update_statuses(&self, today: NaiveDate) -> Result<StatusUpdateSummary> {
        info!(%today, "TG status updater started");

        let due = self
            .store
            .find_due_today(today)
            .await
            .context("Failed to list TGs with a date today")?;

        if !due.is_empty() {
            info!(count = due.len(), tgs = ?due, "TGs to update");
        }

        let mut summary = StatusUpdateSummary::default();

        for transition in Transition::DAILY_ORDER {
            let affected = self
                .store
                .apply_transition(transition, today)
                .await
                .with_context(|| format!("Failed to update TGs to {transition}"))?;

            info!(%transition, affected, "status transition applied");
            summary.record(transition, affected);
        }

        info!(?summary, "TG status updater completed");
        Ok(summary)
    }
}
