use std::env;
use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use tgt_core::models::ExternalIdentity;

use super::{claim_str, read_token_response, AuthError, Claims, Result, TokenBundle};

pub const USERINFO_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default)]
pub struct ForgeRockConfig {
    pub token_uri: Option<String>,
    pub userinfo_uri: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub redirect_uri: Option<String>,
}

impl ForgeRockConfig {
    pub fn from_env() -> Self {
        Self {
            token_uri: env::var("OIDC_TOKEN_URI").ok(),
            userinfo_uri: env::var("OIDC_USERINFO_URI").ok(),
            client_id: env::var("OIDC_CLIENT_ID").ok(),
            client_secret: env::var("OIDC_CLIENT_SECRET").ok().map(SecretString::from),
            redirect_uri: env::var("OIDC_REDIRECT_URI").ok(),
        }
    }
}

/// Opaque-token provider; the userinfo endpoint is the source of truth.
pub struct ForgeRockProvider {
    http: reqwest::Client,
    config: ForgeRockConfig,
}

impl ForgeRockProvider {
    pub fn new(http: reqwest::Client, config: ForgeRockConfig) -> Self {
        Self { http, config }
    }

    pub fn default_redirect_uri(&self) -> Option<&str> {
        self.config.redirect_uri.as_deref()
    }

    pub async fn exchange_token(&self, code: &str, redirect_uri: Option<&str>) -> Result<TokenBundle> {
        let token_uri = self
            .config
            .token_uri
            .as_deref()
            .ok_or(AuthError::NotConfigured("OIDC_TOKEN_URI"))?;
        let client_id = self
            .config
            .client_id
            .as_deref()
            .ok_or(AuthError::NotConfigured("OIDC_CLIENT_ID"))?;
        let secret = self
            .config
            .client_secret
            .as_ref()
            .ok_or(AuthError::NotConfigured("OIDC_CLIENT_SECRET"))?;

        let redirect = redirect_uri
            .or(self.config.redirect_uri.as_deref())
            .unwrap_or_default();

        let response = self
            .http
            .post(token_uri)
            .basic_auth(client_id, Some(secret.expose_secret()))
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        read_token_response(response).await
    }

    /// Calls userinfo with the token; a 401 there means the token is dead.
    pub async fn verify_token(&self, token: &str) -> Result<Claims> {
        let url = self
            .config
            .userinfo_uri
            .as_deref()
            .ok_or(AuthError::NotConfigured("OIDC_USERINFO_URI"))?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .timeout(USERINFO_TIMEOUT)
            .send()
            .await
            .map_err(|e| AuthError::ValidationFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(AuthError::TokenInvalid);
        }
        if !status.is_success() {
            return Err(AuthError::ValidationFailed(format!("userinfo returned {status}")));
        }

        response
            .json::<Claims>()
            .await
            .map_err(|e| AuthError::ValidationFailed(e.to_string()))
    }

    /// The `sub` claim is the internal username, unchanged.
    pub fn identity(claims: &Claims) -> Result<ExternalIdentity> {
        let username = claim_str(claims, "sub")
            .ok_or_else(|| AuthError::ValidationFailed("userinfo has no sub claim".to_string()))?;

        Ok(ExternalIdentity {
            username,
            email: claim_str(claims, "email"),
            name: claim_str(claims, "name"),
            country: claim_str(claims, "country"),
        })
    }
}
