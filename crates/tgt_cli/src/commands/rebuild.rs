use anyhow::Result;
use clap::Args;
use tgt_db::schema::{drop_tables, rebuild_database};
use tgt_db::MySqlPool;

#[derive(Debug, Args)]
pub struct RebuildArgs {
    /// DANGER: Drop existing tables before rebuilding?
    #[arg(long)]
    pub reset: bool,
}

pub async fn execute(pool: MySqlPool, args: RebuildArgs) -> Result<()> {
    println!("🏗️  Rebuilding Database Schema...");

    if args.reset {
        println!("🔥 Reset requested. Dropping TG tables...");
        drop_tables(&pool).await?;
    }

    let files = rebuild_database(&pool).await?;
    for file in &files {
        println!("   📄 {file}");
    }

    println!("✅ Database Schema Applied Successfully.");
    Ok(())
}
