use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named role assigned to users on activation. Role semantics (permissions,
/// hierarchy) live in the host application's user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
}

impl Role {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Materialize an active user, e.g. from an activated registration.
    /// The password is expected to be hashed already.
    pub fn new(
        username: String,
        email: String,
        first_name: String,
        last_name: String,
        role: Role,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            email,
            first_name,
            last_name,
            role,
            active: true,
            created_at: Utc::now(),
        }
    }
}
