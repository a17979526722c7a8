use std::env;

use anyhow::Result;
use dotenvy::dotenv;
use tgt_db::DbConfig;
use tgt_service::mail::MailConfig;

pub const DEFAULT_APP_URL: &str = "https://www3.wipo.int/upovtg";

#[derive(Clone, Debug)]
pub struct Config {
    pub db: DbConfig,
    pub mail: MailConfig,
    /// Linked from every reminder e-mail.
    pub app_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env if present

        Ok(Config {
            db: DbConfig::from_env()?,
            mail: MailConfig::from_env(),
            app_url: env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
        })
    }
}
