//! Identity provider selection and the role-assignment policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::{UnknownCode, UserProfile};

pub const ADMIN_ROLE: &str = "ADMIN";

/// Roles handed to a dev-bypass user that has no internal record.
pub const DEV_FALLBACK_ROLES: [&str; 2] = ["ADMIN", "LE"];

/// The two supported identity providers.
///
/// The selector arrives from the client (header or body field) and is
/// validated against this closed set before anything is dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Opaque access tokens, checked against the userinfo endpoint.
    #[default]
    #[serde(rename = "forgerock")]
    ForgeRock,
    /// JWT access tokens, checked against the tenant's key set.
    #[serde(rename = "entraid")]
    EntraId,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::ForgeRock => "forgerock",
            ProviderKind::EntraId => "entraid",
        }
    }

    /// Absent or empty selectors fall back to the default provider.
    pub fn from_selector(selector: Option<&str>) -> Result<Self, UnknownCode> {
        match selector.map(str::trim) {
            None | Some("") => Ok(ProviderKind::default()),
            Some(value) => value.parse(),
        }
    }

    /// Whether this provider's population is treated as administrators.
    pub fn is_privileged(&self) -> bool {
        matches!(self, ProviderKind::EntraId)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forgerock" => Ok(ProviderKind::ForgeRock),
            "entraid" => Ok(ProviderKind::EntraId),
            other => Err(UnknownCode { kind: "auth provider", value: other.to_string() }),
        }
    }
}

/// Roles granted to an authenticated user.
///
/// The privileged provider always yields exactly `["ADMIN"]`, with or
/// without an internal record. The other provider yields the stored role,
/// or nothing.
pub fn granted_roles(provider: ProviderKind, record: Option<&UserProfile>) -> Vec<String> {
    if provider.is_privileged() {
        return vec![ADMIN_ROLE.to_string()];
    }

    stored_roles(record)
}

pub fn stored_roles(record: Option<&UserProfile>) -> Vec<String> {
    record
        .and_then(|user| user.role_code.as_deref())
        .filter(|code| !code.is_empty())
        .map(|code| vec![code.to_string()])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Option<&str>) -> UserProfile {
        UserProfile {
            id: 42,
            user_name: "JDOE".to_string(),
            full_name: Some("Jane Doe".to_string()),
            email: Some("jane@example.org".to_string()),
            first_name: Some("Jane".to_string()),
            role_code: role.map(str::to_string),
        }
    }

    #[test]
    fn unknown_user_roles_depend_on_provider() {
        assert_eq!(granted_roles(ProviderKind::EntraId, None), vec!["ADMIN"]);
        assert!(granted_roles(ProviderKind::ForgeRock, None).is_empty());
    }

    #[test]
    fn privileged_provider_overrides_stored_role() {
        let user = profile(Some("LE"));
        assert_eq!(granted_roles(ProviderKind::EntraId, Some(&user)), vec!["ADMIN"]);
        assert_eq!(granted_roles(ProviderKind::ForgeRock, Some(&user)), vec!["LE"]);
    }

    #[test]
    fn missing_stored_role_yields_nothing() {
        assert!(granted_roles(ProviderKind::ForgeRock, Some(&profile(None))).is_empty());
        assert!(granted_roles(ProviderKind::ForgeRock, Some(&profile(Some("")))).is_empty());
    }

    #[test]
    fn selector_is_a_closed_set() {
        assert_eq!(ProviderKind::from_selector(None), Ok(ProviderKind::ForgeRock));
        assert_eq!(ProviderKind::from_selector(Some("entraid")), Ok(ProviderKind::EntraId));
        let err = ProviderKind::from_selector(Some("okta")).unwrap_err();
        assert_eq!(err.to_string(), "unknown auth provider code: okta");
    }
}
