use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: i64,                    // surrogate key
    pub name: String,
    pub email: String,              // unique, trimmed
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 PHC string, never exposed
    pub calories: i64,              // daily target chosen by the user
    pub created_at: OffsetDateTime,
}

/// Row to insert; the store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub calories: i64,
    pub created_at: OffsetDateTime,
}
