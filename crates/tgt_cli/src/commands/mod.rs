pub mod deactivate_ie;
pub mod rebuild;
pub mod send_reminders;
pub mod update_status;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tgt_db::{MySqlPool, WorkflowRepository};
use tgt_service::mail::SesMailer;
use tgt_service::TgService;

use crate::config::Config;

/// Wires the jobs to the real store and SES.
pub async fn build_service(pool: MySqlPool, config: &Config) -> TgService {
    let mailer = SesMailer::from_config(config.mail.clone()).await;
    TgService::new(
        Arc::new(WorkflowRepository::new(pool)),
        Arc::new(mailer),
        config.app_url.clone(),
    )
}

/// The run day: `--date` when given, otherwise today in UTC.
pub fn run_day(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}

pub fn print_summary<T: Serialize>(summary: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
