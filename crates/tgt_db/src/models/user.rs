use sqlx::FromRow;
use tgt_core::models::UserProfile;

#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub user_name: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub role_code: Option<String>,
}

impl From<UserRecord> for UserProfile {
    fn from(row: UserRecord) -> Self {
        UserProfile {
            id: row.id,
            user_name: row.user_name,
            full_name: row.full_name,
            email: row.email,
            first_name: row.first_name,
            role_code: row.role_code,
        }
    }
}
