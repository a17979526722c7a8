use std::env;

use anyhow::Context;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;

use crate::error::{Error, Result};

/// One connection per process: every query in the API or in a job is serialized.
pub const MAX_CONNECTIONS: u32 = 1;

#[derive(Clone, Debug)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DbConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(DbConfig {
            host: env::var("DB_HOST").context("DB_HOST must be set")?,

            port: env::var("DB_PORT")
                .ok()
                .map(|port| port.parse::<u16>())
                .transpose()
                .context("DB_PORT must be a port number")?
                .unwrap_or(3306),

            user: env::var("DB_USER").context("DB_USER must be set")?,

            password: env::var("DB_PASSWORD").unwrap_or_default(),

            database: env::var("DB_NAME").unwrap_or_else(|_| "upovtg".to_string()),
        })
    }

    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .charset("utf8mb4")
    }
}

/// Opens the pool and checks out the first connection.
pub async fn connect(config: &DbConfig) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(config.connect_options())
        .await
        .map_err(|e| Error::Database(e.to_string()))
}

/// Builds the pool without touching the network; the first query connects.
pub fn connect_lazy(config: &DbConfig) -> MySqlPool {
    MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_lazy_with(config.connect_options())
}
