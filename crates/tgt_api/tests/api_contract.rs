//! Router-level checks that never reach the database or an identity provider.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tgt_api::config::ApiConfig;
use tgt_api::routes::app_router;
use tgt_api::AppState;
use tgt_db::pool::connect_lazy;
use tgt_db::DbConfig;
use tgt_service::auth::{
    AuthProviders, EntraIdConfig, EntraIdProvider, ForgeRockConfig, ForgeRockProvider,
};
use tower::ServiceExt;

fn app(config: ApiConfig) -> Router {
    let db = DbConfig {
        host: "127.0.0.1".to_string(),
        port: 3306,
        user: "test".to_string(),
        password: "test".to_string(),
        database: "upovtg".to_string(),
    };
    let http = reqwest::Client::new();
    let auth = AuthProviders::new(
        ForgeRockProvider::new(http.clone(), ForgeRockConfig::default()),
        EntraIdProvider::new(http, EntraIdConfig::default()),
    );

    app_router(AppState::new(connect_lazy(&db), auth, config))
}

fn dev_config() -> ApiConfig {
    ApiConfig {
        dev_bypass_auth: true,
        ..ApiConfig::default()
    }
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (status, body) = send(app(ApiConfig::default()), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn protected_route_without_bearer_is_unauthorized() {
    let (status, body) = send(app(ApiConfig::default()), get("/api/dashboard/stats")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_provider_header_is_unauthorized() {
    let req = Request::builder()
        .uri("/api/test-guidelines")
        .header(header::AUTHORIZATION, "Bearer abc")
        .header("X-Auth-Provider", "okta")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(ApiConfig::default()), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "Invalid or expired token");
}

#[tokio::test]
async fn failed_verification_is_unauthorized() {
    // No userinfo endpoint configured, so verification fails locally.
    let req = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, "Bearer opaque")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(ApiConfig::default()), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn token_exchange_requires_code() {
    let (status, body) = send(app(ApiConfig::default()), post_json("/api/auth/token", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = send(app(ApiConfig::default()), post_json("/api/auth/token", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn token_exchange_with_unknown_provider_fails_auth() {
    let (status, body) = send(
        app(ApiConfig::default()),
        post_json("/api/auth/token", r#"{"code":"abc","provider":"okta"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_FAILED");
}

#[tokio::test]
async fn token_exchange_against_unconfigured_provider_fails_auth() {
    let (status, body) = send(
        app(ApiConfig::default()),
        post_json("/api/auth/token", r#"{"code":"abc","provider":"entraid"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_FAILED");
}

#[tokio::test]
async fn userinfo_distinguishes_missing_and_rejected_tokens() {
    let (status, body) = send(app(ApiConfig::default()), get("/api/auth/userinfo")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let req = Request::builder()
        .uri("/api/auth/userinfo")
        .header(header::AUTHORIZATION, "Bearer opaque")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(ApiConfig::default()), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_FAILED");
}

#[tokio::test]
async fn me_requires_bearer_even_in_dev_mode() {
    let (status, body) = send(app(dev_config()), get("/api/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn list_rejects_unknown_status_before_querying() {
    let (status, body) = send(app(dev_config()), get("/api/test-guidelines?status=XYZ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn detail_rejects_non_numeric_id() {
    let (status, body) = send(app(dev_config()), get("/api/test-guidelines/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn duplicate_query_parameter_is_a_json_bad_request() {
    let req = get("/api/test-guidelines?limit=10&limit=20");
    let (status, body) = send(app(dev_config()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn undecodable_path_id_is_a_json_bad_request() {
    let (status, body) = send(app(dev_config()), get("/api/test-guidelines/%FF")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn preflight_is_answered_before_auth() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/test-guidelines")
        .header(header::ORIGIN, "https://tg.example")
        .body(Body::empty())
        .unwrap();

    let resp = app(ApiConfig::default()).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let headers = resp.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://tg.example");
    assert!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .contains("X-Auth-Provider"));
}

#[tokio::test]
async fn cors_falls_back_to_frontend_url() {
    let resp = app(ApiConfig::default()).oneshot(get("/api/health")).await.unwrap();
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://local-dev.wipo.int:5173"
    );
}
