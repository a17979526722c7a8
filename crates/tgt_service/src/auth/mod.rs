//! Sign-in against the two external identity providers.
//!
//! `forgerock` tokens are opaque and checked by calling the provider's
//! userinfo endpoint. `entraid` tokens are JWTs checked locally against
//! the tenant's published signing keys.

pub mod entraid;
pub mod forgerock;
pub mod identity;

use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tgt_core::models::{ExternalIdentity, UnknownCode};
use tgt_core::ProviderKind;

pub use entraid::{EntraIdConfig, EntraIdProvider};
pub use forgerock::{ForgeRockConfig, ForgeRockProvider};
pub use identity::{resolve_current_user, resolve_dev_user, CurrentUser};

/// Decoded token claims or a userinfo document.
pub type Claims = Map<String, Value>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Unknown auth provider: {0}")]
    UnknownProvider(String),

    #[error("Token expired or invalid")]
    TokenInvalid,

    #[error("Token validation failed: {0}")]
    ValidationFailed(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Token exchange failed: {0}")]
    Exchange(String),
}

impl From<UnknownCode> for AuthError {
    fn from(err: UnknownCode) -> Self {
        AuthError::UnknownProvider(err.value)
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Tokens handed back to the browser after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBundle {
    pub access_token: String,
    pub id_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

impl From<TokenEndpointResponse> for TokenBundle {
    fn from(raw: TokenEndpointResponse) -> Self {
        TokenBundle {
            access_token: raw.access_token,
            id_token: raw.id_token,
            refresh_token: raw.refresh_token,
            expires_in: raw.expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}

async fn read_token_response(response: Response) -> Result<TokenBundle> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::Exchange(format!("{status}: {body}")));
    }

    let raw: TokenEndpointResponse = response
        .json()
        .await
        .map_err(|e| AuthError::Exchange(e.to_string()))?;

    Ok(raw.into())
}

pub(crate) fn claim_str(claims: &Claims, key: &str) -> Option<String> {
    claims
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Both configured providers, dispatched by [`ProviderKind`].
pub struct AuthProviders {
    pub forgerock: ForgeRockProvider,
    pub entraid: EntraIdProvider,
}

impl AuthProviders {
    pub fn new(forgerock: ForgeRockProvider, entraid: EntraIdProvider) -> Self {
        Self { forgerock, entraid }
    }

    pub fn from_env(http: reqwest::Client) -> Self {
        Self::new(
            ForgeRockProvider::new(http.clone(), ForgeRockConfig::from_env()),
            EntraIdProvider::new(http, EntraIdConfig::from_env()),
        )
    }

    pub async fn exchange_token(
        &self,
        provider: ProviderKind,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<TokenBundle> {
        match provider {
            ProviderKind::ForgeRock => self.forgerock.exchange_token(code, redirect_uri).await,
            ProviderKind::EntraId => self.entraid.exchange_token(code, redirect_uri).await,
        }
    }

    pub async fn verify_token(&self, provider: ProviderKind, token: &str) -> Result<Claims> {
        match provider {
            ProviderKind::ForgeRock => self.forgerock.verify_token(token).await,
            ProviderKind::EntraId => self.entraid.verify_token(token).await,
        }
    }

    pub fn identity(&self, provider: ProviderKind, claims: &Claims) -> Result<ExternalIdentity> {
        match provider {
            ProviderKind::ForgeRock => ForgeRockProvider::identity(claims),
            ProviderKind::EntraId => self.entraid.identity(claims),
        }
    }

    /// Verifies `token` and maps the result to a provider-neutral identity.
    pub async fn authenticate(&self, provider: ProviderKind, token: &str) -> Result<ExternalIdentity> {
        let claims = self.verify_token(provider, token).await?;
        self.identity(provider, &claims)
    }
}
