use serde::Serialize;
use tgt_core::access::{granted_roles, stored_roles, DEV_FALLBACK_ROLES};
use tgt_core::models::{ExternalIdentity, UserProfile};
use tgt_core::ProviderKind;

/// The signed-in user as reported by `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Option<i32>,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_provider: Option<ProviderKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_user: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_dev_mode: Option<bool>,
}

/// Merges a verified identity with the internal record, if any.
///
/// Stored name and e-mail take precedence over what the provider asserts.
pub fn resolve_current_user(
    identity: &ExternalIdentity,
    provider: ProviderKind,
    record: Option<&UserProfile>,
) -> CurrentUser {
    let roles = granted_roles(provider, record);

    match record {
        Some(user) => CurrentUser {
            id: Some(user.id),
            username: identity.username.clone(),
            name: user
                .full_name
                .clone()
                .or_else(|| identity.name.clone())
                .unwrap_or_else(|| identity.username.clone()),
            email: user.email.clone().or_else(|| identity.email.clone()),
            country: identity.country.clone(),
            roles,
            auth_provider: Some(provider),
            is_new_user: Some(false),
            is_dev_mode: None,
        },
        None => CurrentUser {
            id: None,
            username: identity.username.clone(),
            name: identity
                .name
                .clone()
                .unwrap_or_else(|| identity.username.clone()),
            email: identity.email.clone(),
            country: identity.country.clone(),
            roles,
            auth_provider: Some(provider),
            is_new_user: Some(true),
            is_dev_mode: None,
        },
    }
}

/// Identity injected for every request while auth is bypassed.
pub fn dev_identity(mock_username: &str, email_domain: &str) -> ExternalIdentity {
    ExternalIdentity {
        username: mock_username.to_string(),
        email: Some(format!("{mock_username}@{email_domain}")),
        name: Some("Dev User".to_string()),
        country: None,
    }
}

pub fn resolve_dev_user(mock_username: &str, email_domain: &str, record: Option<&UserProfile>) -> CurrentUser {
    match record {
        Some(user) => CurrentUser {
            id: Some(user.id),
            username: user.user_name.clone(),
            name: user.full_name.clone().unwrap_or_else(|| user.user_name.clone()),
            email: user.email.clone(),
            country: None,
            roles: stored_roles(record),
            auth_provider: None,
            is_new_user: None,
            is_dev_mode: Some(true),
        },
        None => {
            let identity = dev_identity(mock_username, email_domain);
            CurrentUser {
                id: None,
                username: identity.username,
                name: identity.name.unwrap_or_default(),
                email: identity.email,
                country: None,
                roles: DEV_FALLBACK_ROLES.iter().map(|r| r.to_string()).collect(),
                auth_provider: None,
                is_new_user: Some(true),
                is_dev_mode: Some(true),
            }
        }
    }
}
