use anyhow::Result;
use clap::Args;
use tgt_db::MySqlPool;

use super::{build_service, print_summary};
use crate::config::Config;

#[derive(Debug, Args)]
pub struct DeactivateIeArgs {}

pub async fn execute(pool: MySqlPool, config: Config, _args: DeactivateIeArgs) -> Result<()> {
    println!("🔒 Deactivating Interested Experts on TGs in LE Checking / LE Signed Off...");

    let service = build_service(pool, &config).await;
    let summary = service.deactivate_interested_experts().await?;

    if summary.tgs_processed == 0 {
        println!("ℹ️  No TGs in LEC or LES status.");
    } else {
        println!("✅ {} IE assignment(s) set to inactive.", summary.users_updated);
    }
    print_summary(&summary)
}
