use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tgt_core::ProviderKind;
use tgt_db::UserRepository;
use tgt_service::auth::{resolve_current_user, resolve_dev_user, CurrentUser, TokenBundle};
use tracing::{error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{bearer_token, AuthContext};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    #[serde(flatten)]
    pub tokens: TokenBundle,
    pub provider: ProviderKind,
}

/// POST /api/auth/token
pub async fn exchange_token(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<TokenResponse>> {
    let request: TokenRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Request body must be a JSON object".to_string()))?;

    let code = request
        .code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Authorization code required".to_string()))?;

    let exchange_failed = || ApiError::AuthFailed("Token exchange failed".to_string());

    let provider = ProviderKind::from_selector(request.provider.as_deref()).map_err(|err| {
        warn!(error = %err, "Token exchange rejected");
        exchange_failed()
    })?;

    let redirect_uri = request
        .redirect_uri
        .as_deref()
        .filter(|uri| !uri.is_empty())
        .or(state.auth.forgerock.default_redirect_uri());

    info!(%provider, "Exchanging code for token");

    let tokens = state
        .auth
        .exchange_token(provider, code, redirect_uri)
        .await
        .map_err(|err| {
            error!(%provider, error = %err, "Token exchange error");
            exchange_failed()
        })?;

    info!(%provider, "Token exchange successful");

    Ok(Json(TokenResponse { tokens, provider }))
}

/// GET /api/auth/userinfo, proxied to the opaque-token provider.
pub async fn userinfo(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let token = bearer_token(&headers).ok_or_else(ApiError::unauthorized)?;

    let claims = state.auth.forgerock.verify_token(token).await.map_err(|err| {
        error!(error = %err, "Get user info error");
        ApiError::AuthFailed("Failed to get user info".to_string())
    })?;

    Ok(Json(json!({
        "sub": claims.get("sub"),
        "email": claims.get("email"),
        "name": claims.get("name"),
        "country": claims.get("country"),
    })))
}

/// GET /api/auth/me
///
/// The middleware has already verified the token; this only joins the
/// identity with the internal user record.
pub async fn me(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    headers: HeaderMap,
) -> ApiResult<Json<CurrentUser>> {
    if bearer_token(&headers).is_none() {
        return Err(ApiError::unauthorized());
    }

    let users = UserRepository::new(state.pool.clone());
    let lookup_failed = |err: tgt_db::Error| {
        error!(error = %err, "Get user error");
        ApiError::Failed("Failed to get user info".to_string())
    };

    if ctx.dev_mode {
        let mock = state.config.dev_mock_user.as_str();
        warn!(user = %mock, "[DEV MODE] Getting user info");

        let record = users.find_by_username(mock).await.map_err(lookup_failed)?;
        return Ok(Json(resolve_dev_user(mock, &state.config.email_domain, record.as_ref())));
    }

    info!(username = %ctx.identity.username, provider = %ctx.provider, "getMe");

    let record = users
        .find_by_username(&ctx.identity.username)
        .await
        .map_err(lookup_failed)?;

    Ok(Json(resolve_current_user(&ctx.identity, ctx.provider, record.as_ref())))
}
