//! Daily jobs against an in-memory store and a recording mailer.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use tgt_core::models::{AssignmentRole, AssignmentStatus, PhaseWindow, TgSchedule, TgStatus, UserProfile};
use tgt_core::reminders::{Phase, ReminderCandidate, Trigger};
use tgt_core::workflow::{self, has_date_today, Transition};
use tgt_db::models::DueTg;
use tgt_service::mail::{Mailer, OutgoingMail};
use tgt_service::store::WorkflowStore;
use tgt_service::{PhaseStats, TgService};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

#[derive(Debug, Clone)]
struct Assignment {
    tg_id: i32,
    user_id: i32,
    role: AssignmentRole,
    status: AssignmentStatus,
}

#[derive(Default)]
struct InMemoryStore {
    tgs: Mutex<Vec<TgSchedule>>,
    assignments: Mutex<Vec<Assignment>>,
    users: Vec<UserProfile>,
    fail_on: Option<Transition>,
}

fn window(tg: &TgSchedule, phase: Phase) -> PhaseWindow {
    match phase {
        Phase::LeDraft => tg.le_draft,
        Phase::IeComments => tg.ie_comments,
        Phase::LeChecking => tg.le_checking,
    }
}

#[async_trait]
impl WorkflowStore for InMemoryStore {
    async fn find_due_today(&self, today: NaiveDate) -> tgt_db::Result<Vec<DueTg>> {
        let tgs = self.tgs.lock().unwrap();
        Ok(tgs
            .iter()
            .filter(|tg| has_date_today(tg, today))
            .map(|tg| DueTg {
                reference: tg.reference.clone(),
                status: tg.status.code().to_string(),
            })
            .collect())
    }

    async fn apply_transition(&self, transition: Transition, today: NaiveDate) -> tgt_db::Result<u64> {
        if self.fail_on == Some(transition) {
            return Err(tgt_db::Error::Database("connection reset".to_string()));
        }

        let now = today.and_hms_opt(2, 0, 0).unwrap();
        let mut tgs = self.tgs.lock().unwrap();
        let mut affected = 0;
        for tg in tgs.iter_mut().filter(|tg| transition.applies_to(tg, today)) {
            workflow::apply(transition, tg, now);
            affected += 1;
        }
        Ok(affected)
    }

    async fn find_tg_ids_by_status(&self, statuses: &[TgStatus]) -> tgt_db::Result<Vec<i32>> {
        let tgs = self.tgs.lock().unwrap();
        Ok(tgs
            .iter()
            .filter(|tg| statuses.contains(&tg.status))
            .map(|tg| tg.id)
            .collect())
    }

    async fn deactivate_ie_users(&self, tg_ids: &[i32]) -> tgt_db::Result<u64> {
        let mut assignments = self.assignments.lock().unwrap();
        let mut changed = 0;
        for a in assignments.iter_mut().filter(|a| {
            a.role == AssignmentRole::InterestedExpert
                && tg_ids.contains(&a.tg_id)
                && a.status != AssignmentStatus::Inactive
        }) {
            a.status = AssignmentStatus::Inactive;
            changed += 1;
        }
        Ok(changed)
    }

    async fn find_reminders(
        &self,
        phase: Phase,
        trigger: Trigger,
        today: NaiveDate,
    ) -> tgt_db::Result<Vec<ReminderCandidate>> {
        let target = trigger.target_date(today);
        let tgs = self.tgs.lock().unwrap();
        let assignments = self.assignments.lock().unwrap();

        let mut found = Vec::new();
        for tg in tgs.iter().filter(|tg| tg.status == phase.status()) {
            let w = window(tg, phase);
            let anchor = match trigger {
                Trigger::PhaseStart => w.start,
                Trigger::WeekBeforeEnd => w.end,
            };
            if anchor.is_none() || anchor != target {
                continue;
            }
            for a in assignments.iter().filter(|a| a.tg_id == tg.id && a.role == phase.role()) {
                let Some(user) = self.users.iter().find(|u| u.id == a.user_id) else {
                    continue;
                };
                found.push(ReminderCandidate {
                    tg_id: tg.id,
                    tg_reference: tg.reference.clone(),
                    start_date: w.start,
                    end_date: w.end,
                    user_id: user.id,
                    email: user.email.clone(),
                    first_name: user.first_name.clone(),
                });
            }
        }
        Ok(found)
    }
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    reject: Option<String>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutgoingMail) -> anyhow::Result<String> {
        if self.reject.as_deref() == Some(mail.to.as_str()) {
            return Err(anyhow!("mailbox unavailable"));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(mail.clone());
        Ok(format!("msg-{}", sent.len()))
    }
}

fn user(id: i32, email: Option<&str>, first_name: &str) -> UserProfile {
    UserProfile {
        id,
        user_name: format!("USER{id}"),
        full_name: None,
        email: email.map(str::to_string),
        first_name: Some(first_name.to_string()),
        role_code: None,
    }
}

fn assign(tg_id: i32, user_id: i32, role: AssignmentRole) -> Assignment {
    Assignment {
        tg_id,
        user_id,
        role,
        status: AssignmentStatus::Active,
    }
}

fn service(store: Arc<InMemoryStore>, mailer: Arc<RecordingMailer>) -> TgService {
    TgService::new(store, mailer, "https://tg.example/app".to_string())
}

#[tokio::test]
async fn draft_start_today_moves_to_led() {
    let mut tg = TgSchedule::new(1, "TG/1/1", TgStatus::Adopted);
    tg.le_draft = PhaseWindow::new(Some(day(10)), Some(day(30)));

    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![tg]),
        ..Default::default()
    });
    let summary = service(store.clone(), Arc::default()).update_statuses(day(10)).await.unwrap();

    assert_eq!(summary.le_draft, 1);
    let tgs = store.tgs.lock().unwrap();
    assert_eq!(tgs[0].status, TgStatus::LeDraft);
    assert!(tgs[0].last_updated.is_some());
}

#[tokio::test]
async fn deleted_rows_are_never_touched() {
    let mut tg = TgSchedule::new(2, "TG/2/1", TgStatus::Deleted);
    tg.le_draft = PhaseWindow::new(Some(day(10)), Some(day(10)));
    tg.le_checking = PhaseWindow::new(Some(day(10)), Some(day(9)));

    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![tg]),
        ..Default::default()
    });
    let summary = service(store.clone(), Arc::default()).update_statuses(day(10)).await.unwrap();

    assert_eq!(summary, Default::default());
    assert_eq!(store.tgs.lock().unwrap()[0].status, TgStatus::Deleted);
}

#[tokio::test]
async fn checking_end_today_lands_in_study() {
    let mut tg = TgSchedule::new(3, "TG/3/1", TgStatus::LeChecking);
    tg.le_checking = PhaseWindow::new(Some(day(1)), Some(day(15)));

    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![tg]),
        ..Default::default()
    });
    let summary = service(store.clone(), Arc::default()).update_statuses(day(15)).await.unwrap();

    assert_eq!(summary.study, 1);
    let tgs = store.tgs.lock().unwrap();
    assert_eq!(tgs[0].status, TgStatus::Study);
    assert!(tgs[0].completed_at.is_some());
}

#[tokio::test]
async fn later_rule_wins_when_two_match() {
    // Checking starts today and draft ends today: LEC then STU.
    let mut tg = TgSchedule::new(4, "TG/4/1", TgStatus::IeComments);
    tg.le_draft = PhaseWindow::new(Some(day(1)), Some(day(12)));
    tg.le_checking = PhaseWindow::new(Some(day(12)), Some(day(20)));

    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![tg]),
        ..Default::default()
    });
    let summary = service(store.clone(), Arc::default()).update_statuses(day(12)).await.unwrap();

    assert_eq!(summary.le_checking, 1);
    assert_eq!(summary.study, 1);
    assert_eq!(store.tgs.lock().unwrap()[0].status, TgStatus::Study);
}

#[tokio::test]
async fn failed_step_aborts_but_keeps_earlier_updates() {
    let mut tg = TgSchedule::new(5, "TG/5/1", TgStatus::Adopted);
    tg.le_draft = PhaseWindow::new(Some(day(10)), Some(day(30)));

    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![tg]),
        fail_on: Some(Transition::ToLeChecking),
        ..Default::default()
    });
    let err = service(store.clone(), Arc::default()).update_statuses(day(10)).await.unwrap_err();

    assert!(err.to_string().contains("LE Checking"), "{err:#}");
    assert_eq!(store.tgs.lock().unwrap()[0].status, TgStatus::LeDraft);
}

#[tokio::test]
async fn ie_deactivation_is_idempotent() {
    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![
            TgSchedule::new(1, "TG/1/1", TgStatus::LeChecking),
            TgSchedule::new(2, "TG/2/1", TgStatus::IeComments),
        ]),
        assignments: Mutex::new(vec![
            assign(1, 10, AssignmentRole::InterestedExpert),
            assign(1, 11, AssignmentRole::InterestedExpert),
            assign(1, 12, AssignmentRole::LeadExpert),
            assign(2, 10, AssignmentRole::InterestedExpert),
        ]),
        ..Default::default()
    });
    let svc = service(store.clone(), Arc::default());

    let first = svc.deactivate_interested_experts().await.unwrap();
    assert_eq!(first.tgs_processed, 1);
    assert_eq!(first.users_updated, 2);

    let second = svc.deactivate_interested_experts().await.unwrap();
    assert_eq!(second.users_updated, 0);

    let assignments = store.assignments.lock().unwrap();
    assert_eq!(assignments[2].status, AssignmentStatus::Active);
    assert_eq!(assignments[3].status, AssignmentStatus::Active);
}

#[tokio::test]
async fn no_locked_tgs_reports_zero() {
    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![TgSchedule::new(1, "TG/1/1", TgStatus::LeDraft)]),
        ..Default::default()
    });
    let summary = service(store, Arc::default()).deactivate_interested_experts().await.unwrap();
    assert_eq!(summary.tgs_processed, 0);
    assert_eq!(summary.users_updated, 0);
}

#[tokio::test]
async fn one_digest_per_recipient_across_triggers() {
    // TG/1 starts drafting today, TG/2 ends drafting in a week; same LE on both.
    let mut starting = TgSchedule::new(1, "TG/1/1", TgStatus::LeDraft);
    starting.le_draft = PhaseWindow::new(Some(day(10)), Some(day(25)));
    let mut ending = TgSchedule::new(2, "TG/2/1", TgStatus::LeDraft);
    ending.le_draft = PhaseWindow::new(Some(day(1)), Some(day(17)));

    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![starting, ending]),
        assignments: Mutex::new(vec![
            assign(1, 10, AssignmentRole::LeadExpert),
            assign(2, 10, AssignmentRole::LeadExpert),
        ]),
        users: vec![user(10, Some("le@example.org"), "Ana")],
        ..Default::default()
    });
    let mailer = Arc::new(RecordingMailer::default());

    let summary = service(store, mailer.clone()).send_reminders(day(10)).await.unwrap();

    assert_eq!(summary.le_draft, PhaseStats { sent: 1, errors: 0 });
    assert_eq!(summary.ie_comments, PhaseStats::default());

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "TG Template - LE Draft Reminder");
    assert!(sent[0].html_body.contains("TG/1/1"));
    assert!(sent[0].html_body.contains("TG/2/1"));
    assert!(sent[0].html_body.contains("https://tg.example/app"));
}

#[tokio::test]
async fn delivery_failure_is_counted_and_run_continues() {
    let mut tg = TgSchedule::new(1, "TG/1/1", TgStatus::IeComments);
    tg.ie_comments = PhaseWindow::new(Some(day(10)), Some(day(20)));

    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![tg]),
        assignments: Mutex::new(vec![
            assign(1, 10, AssignmentRole::InterestedExpert),
            assign(1, 11, AssignmentRole::InterestedExpert),
            assign(1, 12, AssignmentRole::InterestedExpert),
        ]),
        users: vec![
            user(10, Some("bounces@example.org"), "Bo"),
            user(11, Some("ok@example.org"), "Oki"),
            user(12, None, "Nomail"),
        ],
        ..Default::default()
    });
    let mailer = Arc::new(RecordingMailer {
        reject: Some("bounces@example.org".to_string()),
        ..Default::default()
    });

    let summary = service(store, mailer.clone()).send_reminders(day(10)).await.unwrap();

    assert_eq!(summary.ie_comments, PhaseStats { sent: 1, errors: 2 });
    assert_eq!(mailer.sent.lock().unwrap()[0].to, "ok@example.org");
}

#[tokio::test]
async fn reminders_ignore_tgs_in_another_phase() {
    // Dates match but the TG has already moved on.
    let mut tg = TgSchedule::new(1, "TG/1/1", TgStatus::LeChecking);
    tg.le_draft = PhaseWindow::new(Some(day(10)), Some(day(17)));

    let store = Arc::new(InMemoryStore {
        tgs: Mutex::new(vec![tg]),
        assignments: Mutex::new(vec![assign(1, 10, AssignmentRole::LeadExpert)]),
        users: vec![user(10, Some("le@example.org"), "Ana")],
        ..Default::default()
    });
    let mailer = Arc::new(RecordingMailer::default());

    let summary = service(store, mailer.clone()).send_reminders(day(10)).await.unwrap();

    assert_eq!(summary.le_draft, PhaseStats::default());
    assert!(mailer.sent.lock().unwrap().is_empty());
}
