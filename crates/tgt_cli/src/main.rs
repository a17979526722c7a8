use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tgt_cli::commands;
use tgt_cli::config::Config;

#[derive(Parser)]
#[command(name = "tgt_cli")]
#[command(about = "TG Template daily jobs and schema tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the date-driven TG status transitions (daily, 04:00 UTC)
    UpdateStatus(commands::update_status::UpdateStatusArgs),

    /// Deactivate Interested Experts on TGs in LEC/LES (daily, 04:05 UTC)
    DeactivateIe(commands::deactivate_ie::DeactivateIeArgs),

    /// Send phase reminder digests (daily, 04:10 UTC)
    SendReminders(commands::send_reminders::SendRemindersArgs),

    /// Rebuild the database schema from embedded assets
    Rebuild(commands::rebuild::RebuildArgs),
}

impl Commands {
    fn job_name(&self) -> &'static str {
        match self {
            Commands::UpdateStatus(_) => "update-status",
            Commands::DeactivateIe(_) => "deactivate-ie",
            Commands::SendReminders(_) => "send-reminders",
            Commands::Rebuild(_) => "rebuild",
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load Config (Fails fast if invalid)
    let config = Config::from_env()?;
    init_tracing();

    // 2. Parse arguments
    let cli = Cli::parse();

    // 3. Connect (single connection) and route to the command
    let pool = tgt_db::pool::connect(&config.db).await?;

    let job = cli.command.job_name();
    let started = std::time::Instant::now();
    info!(job, "job started");

    match cli.command {
        Commands::UpdateStatus(args) => commands::update_status::execute(pool, config, args).await?,
        Commands::DeactivateIe(args) => commands::deactivate_ie::execute(pool, config, args).await?,
        Commands::SendReminders(args) => commands::send_reminders::execute(pool, config, args).await?,
        Commands::Rebuild(args) => commands::rebuild::execute(pool, args).await?,
    }

    info!(job, elapsed_ms = started.elapsed().as_millis() as u64, "job finished");
    Ok(())
}
