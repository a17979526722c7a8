use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use tgt_db::MySqlPool;

use super::{build_service, print_summary, run_day};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct UpdateStatusArgs {
    /// Run day (YYYY-MM-DD); defaults to today (UTC)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

pub async fn execute(pool: MySqlPool, config: Config, args: UpdateStatusArgs) -> Result<()> {
    let today = run_day(args.date);
    println!("🔄 Updating TG statuses for {today}...");

    let service = build_service(pool, &config).await;
    let summary = service.update_statuses(today).await?;

    println!("✅ Status update complete.");
    print_summary(&summary)
}
