use std::env;

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use tgt_core::models::ExternalIdentity;
use tokio::sync::OnceCell;
use tracing::debug;

use super::{claim_str, read_token_response, AuthError, Claims, Result, TokenBundle};

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const DEFAULT_SCOPES: &str = "openid profile email User.Read";
pub const DEFAULT_EMAIL_DOMAIN: &str = "wipo.int";

#[derive(Debug)]
pub struct EntraIdConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    pub scopes: String,
    pub authority: String,
    /// Suffix stripped from `preferred_username` to get the internal username.
    pub email_domain: String,
}

impl Default for EntraIdConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            client_id: None,
            client_secret: None,
            scopes: DEFAULT_SCOPES.to_string(),
            authority: DEFAULT_AUTHORITY.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
        }
    }
}

impl EntraIdConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tenant_id: env::var("ENTRAID_TENANT_ID").ok(),
            client_id: env::var("ENTRAID_CLIENT_ID").ok(),
            client_secret: env::var("ENTRAID_CLIENT_SECRET").ok().map(SecretString::from),
            scopes: env::var("ENTRAID_SCOPES").unwrap_or(defaults.scopes),
            authority: env::var("ENTRAID_AUTHORITY")
                .map(|a| a.trim_end_matches('/').to_string())
                .unwrap_or(defaults.authority),
            email_domain: env::var("IDENTITY_EMAIL_DOMAIN").unwrap_or(defaults.email_domain),
        }
    }
}

/// JWT provider. Signing keys are fetched once per process and reused.
pub struct EntraIdProvider {
    http: reqwest::Client,
    config: EntraIdConfig,
    jwks: OnceCell<JwkSet>,
}

impl EntraIdProvider {
    pub fn new(http: reqwest::Client, config: EntraIdConfig) -> Self {
        Self {
            http,
            config,
            jwks: OnceCell::new(),
        }
    }

    fn tenant(&self) -> Result<&str> {
        self.config
            .tenant_id
            .as_deref()
            .ok_or(AuthError::NotConfigured("ENTRAID_TENANT_ID"))
    }

    fn client_id(&self) -> Result<&str> {
        self.config
            .client_id
            .as_deref()
            .ok_or(AuthError::NotConfigured("ENTRAID_CLIENT_ID"))
    }

    fn tenant_url(&self, tenant: &str, path: &str) -> String {
        format!("{}/{}/{}", self.config.authority, tenant, path)
    }

    pub async fn exchange_token(&self, code: &str, redirect_uri: Option<&str>) -> Result<TokenBundle> {
        let url = self.tenant_url(self.tenant()?, "oauth2/v2.0/token");
        let client_id = self.client_id()?;
        let secret = self
            .config
            .client_secret
            .as_ref()
            .ok_or(AuthError::NotConfigured("ENTRAID_CLIENT_SECRET"))?;

        let response = self
            .http
            .post(url)
            .form(&[
                ("client_id", client_id),
                ("client_secret", secret.expose_secret()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri.unwrap_or_default()),
                ("scope", self.config.scopes.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::Exchange(e.to_string()))?;

        read_token_response(response).await
    }

    async fn key_set(&self, tenant: &str) -> Result<&JwkSet> {
        self.jwks
            .get_or_try_init(|| async {
                let url = self.tenant_url(tenant, "discovery/v2.0/keys");
                debug!(%url, "fetching signing keys");

                let response = self
                    .http
                    .get(&url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| AuthError::ValidationFailed(e.to_string()))?;

                response
                    .json::<JwkSet>()
                    .await
                    .map_err(|e| AuthError::ValidationFailed(e.to_string()))
            })
            .await
    }

    /// Checks signature, issuer, audience and expiry; any failure is a `ValidationFailed`.
    pub async fn verify_token(&self, token: &str) -> Result<Claims> {
        let tenant = self.tenant()?;
        let client_id = self.client_id()?;

        let header = decode_header(token).map_err(|e| AuthError::ValidationFailed(e.to_string()))?;
        let keys = self.key_set(tenant).await?;

        let jwk = match header.kid.as_deref() {
            Some(kid) => keys.find(kid),
            None => keys.keys.first(),
        }
        .ok_or_else(|| AuthError::ValidationFailed("no matching signing key".to_string()))?;

        let key = DecodingKey::from_jwk(jwk).map_err(|e| AuthError::ValidationFailed(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.tenant_url(tenant, "v2.0")]);
        validation.set_audience(&[client_id]);

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::ValidationFailed(e.to_string()))
    }

    pub fn identity(&self, claims: &Claims) -> Result<ExternalIdentity> {
        let preferred = claim_str(claims, "preferred_username");
        let raw = preferred
            .clone()
            .or_else(|| claim_str(claims, "sub"))
            .ok_or_else(|| AuthError::ValidationFailed("token has no username claim".to_string()))?;

        Ok(ExternalIdentity {
            username: normalize_username(&raw, &self.config.email_domain),
            email: claim_str(claims, "email").or(preferred),
            name: claim_str(claims, "name"),
            country: claim_str(claims, "country"),
        })
    }
}

/// `jane.doe@WIPO.int` -> `JANE.DOE` when the domain is `wipo.int`.
pub fn normalize_username(raw: &str, email_domain: &str) -> String {
    let suffix = format!("@{email_domain}");
    let local = raw
        .len()
        .checked_sub(suffix.len())
        .filter(|&split| raw.is_char_boundary(split))
        .filter(|&split| raw[split..].eq_ignore_ascii_case(&suffix))
        .map_or(raw, |split| &raw[..split]);
    local.to_uppercase()
}
