use std::env;

use anyhow::{Context, Result};
use tgt_service::auth::entraid::DEFAULT_EMAIL_DOMAIN;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_FRONTEND_URL: &str = "http://local-dev.wipo.int:5173";
pub const DEFAULT_MOCK_USER: &str = "devuser";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    /// CORS origin used when the request carries none.
    pub frontend_url: String,
    /// Skips token verification entirely. Never enable outside local development.
    pub dev_bypass_auth: bool,
    pub dev_mock_user: String,
    pub email_domain: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            dev_bypass_auth: false,
            dev_mock_user: DEFAULT_MOCK_USER.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw.parse().context("BACKEND_PORT must be a port number")?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            port,
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            dev_bypass_auth: env::var("DEV_BYPASS_AUTH").map(|v| v == "true").unwrap_or(false),
            dev_mock_user: env::var("DEV_MOCK_USER").unwrap_or(defaults.dev_mock_user),
            email_domain: env::var("IDENTITY_EMAIL_DOMAIN").unwrap_or(defaults.email_domain),
        })
    }
}
