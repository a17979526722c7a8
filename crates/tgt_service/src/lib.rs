pub mod assignments;
pub mod auth;
pub mod mail;
pub mod reminders;
pub mod status;
pub mod store;

use std::sync::Arc;

use crate::mail::Mailer;
use crate::store::WorkflowStore;

pub use assignments::IeUpdateSummary;
pub use reminders::{PhaseStats, ReminderSummary};
pub use status::StatusUpdateSummary;

/// Runs the daily batch jobs against a store and a mail transport.
#[derive(Clone)]
pub struct TgService {
    pub store: Arc<dyn WorkflowStore>,
    pub mailer: Arc<dyn Mailer>,
    pub app_url: String,
}

impl TgService {
    pub fn new(store: Arc<dyn WorkflowStore>, mailer: Arc<dyn Mailer>, app_url: String) -> Self {
        Self {
            store,
            mailer,
            app_url,
        }
    }
}
