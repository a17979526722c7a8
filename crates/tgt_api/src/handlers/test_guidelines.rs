use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tgt_core::TgStatus;
use tgt_db::models::{AssignedUser, TestGuidelineDetail, TestGuidelineSummary};
use tgt_db::repository::ListFilter;
use tgt_db::TestGuidelineRepository;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

/// Raw query string; numbers are parsed leniently so junk falls back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListQuery {
    pub fn into_filter(self) -> ApiResult<ListFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(code) => Some(
                code.parse::<TgStatus>()
                    .map_err(|err| ApiError::BadRequest(err.to_string()))?,
            ),
        };

        let limit = parse_or(self.limit.as_deref(), DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = parse_or(self.offset.as_deref(), 0).max(0);

        Ok(ListFilter { status, limit, offset })
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct TestGuidelineView {
    #[serde(flatten)]
    pub detail: TestGuidelineDetail,
    pub users: Vec<AssignedUser>,
}

pub async fn list_test_guidelines(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Page<TestGuidelineSummary>>> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let repo = TestGuidelineRepository::new(state.pool);

    let result = tokio::try_join!(repo.find_all(&filter), repo.count_all(filter.status));

    match result {
        Ok((items, total)) => Ok(Json(Page {
            items,
            total,
            limit: filter.limit,
            offset: filter.offset,
        })),
        Err(e) => {
            tracing::error!("List TGs error: {:?}", e);
            Err(ApiError::Failed("Failed to list test guidelines".to_string()))
        }
    }
}

pub async fn get_test_guideline(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<TestGuidelineView>> {
    let Path(id) = id?;
    let id: i32 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest("Test guideline ID must be numeric".to_string()))?;

    let repo = TestGuidelineRepository::new(state.pool);

    let detail = match repo.find_by_id(id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return Err(ApiError::NotFound("Test guideline not found".to_string())),
        Err(e) => {
            tracing::error!("Failed to fetch TG {}: {:?}", id, e);
            return Err(ApiError::Failed("Failed to get test guideline".to_string()));
        }
    };

    let users = repo.find_users_by_tg_id(id).await.map_err(|e| {
        tracing::error!("Failed to fetch users of TG {}: {:?}", id, e);
        ApiError::Failed("Failed to get test guideline".to_string())
    })?;

    Ok(Json(TestGuidelineView { detail, users }))
}
