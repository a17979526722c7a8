use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::ApiError;

/// Turns panics and bodiless 5xx responses into a JSON `INTERNAL_ERROR`.
///
/// Errors raised through [`ApiError`] are already JSON and pass untouched.
pub async fn catch_failures(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    let resp = match tokio::spawn(next.run(req)).await {
        Ok(resp) => resp,
        Err(err) => {
            error!(%method, %uri, error = %err, "Unhandled error");
            return internal_error();
        }
    };

    if resp.status().is_server_error() && !is_json(&resp) {
        error!(%method, %uri, status = %resp.status(), "Unhandled error");
        return internal_error();
    }

    resp
}

fn is_json(resp: &Response) -> bool {
    resp.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn internal_error() -> Response {
    ApiError::Internal("Internal server error".to_string()).into_response()
}
