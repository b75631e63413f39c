use serde::{Deserialize, Serialize};
use validator::Validate;

use bookshelf_store::UserRecord;

/// Payload for registering a new account. The password is write-only; it is
/// hashed immediately and never stored or echoed back.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 150,
        message = "Ensure this field has between 3 and 150 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 8,
        message = "This password is too short. It must contain at least 8 characters."
    ))]
    pub password: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

/// A registered account as returned by the API.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<UserRecord> for UserResponse {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
        }
    }
}

/// Credentials presented at login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Payload for exchanging a refresh token.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Fresh access token minted from a refresh token.
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access: String,
}
