//! Deadline reminders: which phase, which trigger, and how matches are
//! folded into one digest per recipient.

use chrono::{Days, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::models::{AssignmentRole, TgStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    LeDraft,
    IeComments,
    LeChecking,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::LeDraft, Phase::IeComments, Phase::LeChecking];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::LeDraft => "LE Draft",
            Phase::IeComments => "IE Comments",
            Phase::LeChecking => "LE Checking",
        }
    }

    /// The TG must currently be in this status to be reminded about.
    pub fn status(&self) -> TgStatus {
        match self {
            Phase::LeDraft => TgStatus::LeDraft,
            Phase::IeComments => TgStatus::IeComments,
            Phase::LeChecking => TgStatus::LeChecking,
        }
    }

    /// Only assignees holding this role are reminded.
    pub fn role(&self) -> AssignmentRole {
        match self {
            Phase::IeComments => AssignmentRole::InterestedExpert,
            Phase::LeDraft | Phase::LeChecking => AssignmentRole::LeadExpert,
        }
    }

    pub fn start_column(&self) -> &'static str {
        match self {
            Phase::LeDraft => "LE_Draft_StartDate",
            Phase::IeComments => "IE_Comments_StartDate",
            Phase::LeChecking => "LE_Checking_StartDate",
        }
    }

    pub fn end_column(&self) -> &'static str {
        match self {
            Phase::LeDraft => "LE_Draft_EndDate",
            Phase::IeComments => "IE_Comments_EndDate",
            Phase::LeChecking => "LE_Checking_EndDate",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which phase date is compared, and against which day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Phase start date is today.
    PhaseStart,
    /// Phase end date is seven days from today.
    WeekBeforeEnd,
}

impl Trigger {
    pub const ALL: [Trigger; 2] = [Trigger::PhaseStart, Trigger::WeekBeforeEnd];

    pub fn offset_days(&self) -> u64 {
        match self {
            Trigger::PhaseStart => 0,
            Trigger::WeekBeforeEnd => 7,
        }
    }

    pub fn date_column(&self, phase: Phase) -> &'static str {
        match self {
            Trigger::PhaseStart => phase.start_column(),
            Trigger::WeekBeforeEnd => phase.end_column(),
        }
    }

    /// The phase date that fires this trigger on `today`.
    pub fn target_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        today.checked_add_days(Days::new(self.offset_days()))
    }
}

/// One (TG, assignee) pair matched by a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderCandidate {
    pub tg_id: i32,
    pub tg_reference: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub user_id: i32,
    pub email: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestEntry {
    pub reference: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Everything one recipient is told about in a single phase run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub email: String,
    pub first_name: Option<String>,
    pub entries: Vec<DigestEntry>,
}

/// Folds candidates into one digest per e-mail address, in first-seen order.
/// Candidates without an address are skipped.
pub fn group_by_recipient<I>(candidates: I) -> Vec<Digest>
where
    I: IntoIterator<Item = ReminderCandidate>,
{
    let mut digests: IndexMap<String, Digest> = IndexMap::new();

    for candidate in candidates {
        let Some(email) = candidate.email else {
            continue;
        };

        let digest = digests.entry(email.clone()).or_insert_with(|| Digest {
            email,
            first_name: candidate.first_name.clone(),
            entries: Vec::new(),
        });

        digest.entries.push(DigestEntry {
            reference: candidate.tg_reference,
            start_date: candidate.start_date,
            end_date: candidate.end_date,
        });
    }

    digests.into_values().collect()
}

impl Digest {
    pub fn subject(&self, phase: Phase) -> String {
        format!("TG Template - {} Reminder", phase.name())
    }

    pub fn html_body(&self, phase: Phase, app_url: &str) -> String {
        let items = self
            .entries
            .iter()
            .map(|entry| {
                format!(
                    "<li>{} <b>({} - {})</b></li>",
                    escape_html(&entry.reference),
                    format_date(entry.start_date),
                    format_date(entry.end_date)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let greeting = self
            .first_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| "Colleague".to_string(), escape_html);
        let app_url = escape_html(app_url);

        format!(
            "<p>Dear {greeting},</p>\n\
             <p>This is a reminder about the following Test Guidelines in the <b>{phase}</b> phase:</p>\n\
             <ul>{items}</ul>\n\
             <p>Please visit the <a href=\"{app_url}\">TG Template application</a> to take action.</p>\n\
             <p>Best regards,<br/>UPOV TG Template System</p>",
            phase = phase.name(),
        )
    }
}

/// Escapes text interpolated into the digest markup.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// `05 March 2025`
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%d %B %Y").to_string(),
        None => "n/a".to_string(),
    }
}
