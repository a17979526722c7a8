use std::net::SocketAddr;

use anyhow::Context;
use tgt_api::config::ApiConfig;
use tgt_api::routes::app_router;
use tgt_api::AppState;
use tgt_db::DbConfig;
use tgt_service::auth::AuthProviders;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

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
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::from_env()?;
    let db = DbConfig::from_env()?;

    let pool = tgt_db::pool::connect(&db)
        .await
        .context("Failed to connect to database")?;

    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let auth = AuthProviders::from_env(http);

    if config.dev_bypass_auth {
        tracing::warn!(user = %config.dev_mock_user, "[DEV MODE] token verification is disabled");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = app_router(AppState::new(pool, auth, config));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
