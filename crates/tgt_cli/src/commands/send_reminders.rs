use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use tgt_db::MySqlPool;

use super::{build_service, print_summary, run_day};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct SendRemindersArgs {
    /// Run day (YYYY-MM-DD); defaults to today (UTC)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub async fn execute(pool: MySqlPool, config: Config, args: SendRemindersArgs) -> Result<()> {
    let today = run_day(args.date);

    if config.mail.enabled {
        println!("📧 Sending reminders for {today}...");
    } else {
        println!("📭 Sending reminders for {today} (SEND_MAIL is off, nothing will leave)...");
    }

    let service = build_service(pool, &config).await;
    let summary = service.send_reminders(today).await?;

    println!("✅ Reminder run complete.");
    print_summary(&summary)
}
