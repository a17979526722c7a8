use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use tgt_core::models::ExternalIdentity;
use tgt_core::ProviderKind;
use tgt_service::auth::identity::dev_identity;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub const PROVIDER_HEADER: &str = "x-auth-provider";

/// Who made the request, attached to request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: ExternalIdentity,
    pub provider: ProviderKind,
    pub dev_mode: bool,
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> ApiResult<Response> {
    if state.config.dev_bypass_auth {
        let identity = dev_identity(&state.config.dev_mock_user, &state.config.email_domain);
        warn!(user = %identity.username, "[DEV MODE] Bypassing auth");

        req.extensions_mut().insert(AuthContext {
            identity,
            provider: ProviderKind::ForgeRock,
            dev_mode: true,
        });
        return Ok(next.run(req).await);
    }

    let token = bearer_token(req.headers())
        .ok_or_else(ApiError::unauthorized)?
        .to_string();

    let selector = req.headers().get(PROVIDER_HEADER).and_then(|v| v.to_str().ok());
    let provider = ProviderKind::from_selector(selector).map_err(|err| {
        warn!(error = %err, "rejected auth provider selector");
        invalid_token()
    })?;

    let identity = state
        .auth
        .authenticate(provider, &token)
        .await
        .map_err(|err| {
            warn!(%provider, error = %err, "Auth error");
            invalid_token()
        })?;

    debug!(user = %identity.username, %provider, "request authenticated");

    req.extensions_mut().insert(AuthContext {
        identity,
        provider,
        dev_mode: false,
    });

    Ok(next.run(req).await)
}

fn invalid_token() -> ApiError {
    ApiError::Unauthorized("Invalid or expired token".to_string())
}
