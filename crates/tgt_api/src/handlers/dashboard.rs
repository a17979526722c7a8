use axum::extract::State;
use axum::Json;
use tgt_db::models::DashboardStats;
use tgt_db::TestGuidelineRepository;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let repo = TestGuidelineRepository::new(state.pool);

    match repo.get_stats().await {
        Ok(stats) => Ok(Json(stats)),
        Err(e) => {
            tracing::error!("Failed to load dashboard stats: {:?}", e);
            Err(ApiError::Failed("Failed to get dashboard stats".to_string()))
        }
    }
}
