//! User entity model and DTOs.

use breezy_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. The api crate builds its own response DTOs.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub username: String,
    pub gender: String,
    pub date_of_birth: String,
    pub preferred_styles: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user. Email must already be trimmed + lowercased.
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
}

/// DTO for updating profile fields. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub preferred_styles: Option<Vec<String>>,
}
