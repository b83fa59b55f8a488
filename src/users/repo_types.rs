use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,                      // generated user ID
    pub username: String,             // unique login name
    #[serde(skip_serializing)]
    pub password: String,             // Argon2 hash, empty when cleared; not exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,   // creation timestamp
}

/// Columns written by a user update.
#[derive(Debug, Clone)]
pub struct UserChanges {
    /// `None` keeps the stored username.
    pub username: Option<String>,
    /// Hash to store; an empty string clears the password.
    pub password_hash: String,
}
