use sqlx::MySqlPool;
use tgt_core::models::UserProfile;

use crate::error::{Error, Result};
use crate::models::UserRecord;

pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Case-insensitive match on User_Name.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT
                up.User_ID AS id,
                up.User_Name AS user_name,
                up.Full_Name AS full_name,
                up.PrimaryEmail AS email,
                up.FirstName AS first_name,
                up.Role_Code AS role_code
            FROM User_Profile up
            WHERE UPPER(up.User_Name) = UPPER(?)
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(row.map(UserProfile::from))
    }
}
