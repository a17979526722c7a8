use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tgt_core::reminders::{group_by_recipient, Phase, ReminderCandidate, Trigger};
use tracing::{error, info, warn};

use crate::mail::OutgoingMail;
use crate::TgService;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PhaseStats {
    pub sent: u32,
    pub errors: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSummary {
    pub le_draft: PhaseStats,
    pub ie_comments: PhaseStats,
    pub le_checking: PhaseStats,
}

impl ReminderSummary {
    fn slot(&mut self, phase: Phase) -> &mut PhaseStats {
        match phase {
            Phase::LeDraft => &mut self.le_draft,
            Phase::IeComments => &mut self.ie_comments,
            Phase::LeChecking => &mut self.le_checking,
        }
    }
}

impl TgService {
    /// Sends one digest per recipient per phase for every trigger firing `today`.
    ///
    /// Query failures abort the run. Delivery failures are counted and the
    /// run moves on to the next recipient.
    pub async fn send_reminders(&self, today: NaiveDate) -> Result<ReminderSummary> {
        info!(%today, "reminder job started");

        let mut summary = ReminderSummary::default();

        for phase in Phase::ALL {
            let stats = self.send_phase_reminders(phase, today).await?;
            info!(%phase, sent = stats.sent, errors = stats.errors, "phase reminders processed");
            *summary.slot(phase) = stats;
        }

        info!(?summary, "reminder job completed");
        Ok(summary)
    }

    async fn send_phase_reminders(&self, phase: Phase, today: NaiveDate) -> Result<PhaseStats> {
        let mut stats = PhaseStats::default();
        let mut candidates: Vec<ReminderCandidate> = Vec::new();

        for trigger in Trigger::ALL {
            let found = self
                .store
                .find_reminders(phase, trigger, today)
                .await
                .with_context(|| format!("Failed to query {phase} reminders ({trigger:?})"))?;
            candidates.extend(found);
        }

        let (deliverable, unreachable): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|candidate| candidate.email.as_deref().is_some_and(|e| !e.trim().is_empty()));

        for candidate in &unreachable {
            warn!(
                %phase,
                user_id = candidate.user_id,
                tg = %candidate.tg_reference,
                "assignee has no e-mail address, reminder skipped"
            );
            stats.errors += 1;
        }

        for digest in group_by_recipient(deliverable) {
            let mail = OutgoingMail {
                to: digest.email.clone(),
                subject: digest.subject(phase),
                html_body: digest.html_body(phase, &self.app_url),
            };

            match self.mailer.send(&mail).await {
                Ok(message_id) => {
                    info!(%phase, to = %mail.to, tgs = digest.entries.len(), %message_id, "reminder sent");
                    stats.sent += 1;
                }
                Err(err) => {
                    error!(%phase, to = %mail.to, error = %err, "failed to send reminder");
                    stats.errors += 1;
                }
            }
        }

        Ok(stats)
    }
}
