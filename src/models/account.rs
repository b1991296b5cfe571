// src/models/account.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A persisted administrator account.
/// The password is stored as an Argon2 hash, never in clear text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// DTO for creating an admin account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Full name must not be empty."))]
    pub full_name: String,
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}
