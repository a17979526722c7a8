use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{
    exchange_token, get_test_guideline, health_check, list_test_guidelines, me, stats, userinfo,
};
use crate::middleware::{catch_failures, cors, require_auth};
use crate::AppState;

pub fn app_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/auth/token", post(exchange_token))
        .route("/api/auth/userinfo", get(userinfo));

    let protected = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/dashboard/stats", get(stats))
        .route("/api/test-guidelines", get(list_test_guidelines))
        .route("/api/test-guidelines/:id", get(get_test_guideline))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(from_fn(catch_failures))
        .layer(from_fn_with_state(state.clone(), cors))
        .with_state(state)
}
