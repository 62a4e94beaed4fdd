use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Self-registration waiting for email activation.
///
/// Owned by the security manager and keyed by `registration_hash`, the opaque
/// token embedded in the activation link. The password is hashed before the
/// record is created; the plaintext never leaves the registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub registration_hash: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub registration_date: DateTime<Utc>,
}

/// Payload of the registration form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, max = 64, message = "must be between 1 and 64 characters"))]
    pub username: String,
    #[validate(length(min = 1, max = 64, message = "must be between 1 and 64 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 64, message = "must be between 1 and 64 characters"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub conf_password: String,
}
