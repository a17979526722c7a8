use serde::{Deserialize, Serialize};

/// An internal user record (User_Profile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    pub user_name: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    /// Fallback role, used only when nothing richer decides the roles.
    pub role_code: Option<String>,
}

/// Identity as asserted by an external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub country: Option<String>,
}
