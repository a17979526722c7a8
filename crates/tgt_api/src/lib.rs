pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use tgt_db::MySqlPool;
use tgt_service::auth::AuthProviders;

use crate::config::ApiConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: MySqlPool,
    pub auth: Arc<AuthProviders>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(pool: MySqlPool, auth: AuthProviders, config: ApiConfig) -> Self {
        Self {
            pool,
            auth: Arc::new(auth),
            config: Arc::new(config),
        }
    }
}
