use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{AuthError, PendingRegistration, Role};

pub mod memory;

pub use memory::InMemorySecurityManager;

/// Capability set consumed by the login and registration handlers.
///
/// This intentionally mirrors the operations the handlers need and nothing
/// more: pending-registration lookup/creation/deletion, role resolution,
/// user materialization, and provider login initiation. Credential checking
/// and the OAuth/OpenID handshake stay behind this seam.
#[async_trait]
pub trait SecurityManager: Send + Sync {
    /// Look up a pending registration by its activation hash.
    async fn find_register_user(
        &self,
        activation_hash: &str,
    ) -> Result<Option<PendingRegistration>, AuthError>;

    /// Record a self-registration. The implementation hashes the password and
    /// mints the activation hash.
    async fn add_register_user(
        &self,
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<PendingRegistration, AuthError>;

    /// Delete a pending registration after activation.
    async fn del_register_user(
        &self,
        registration: &PendingRegistration,
    ) -> Result<(), AuthError>;

    /// Resolve a role by name.
    async fn find_role(&self, name: &str) -> Result<Option<Role>, AuthError>;

    /// Create an active user from an activated registration. Returns `false`
    /// when the directory rejects the user (e.g. duplicate username).
    async fn add_user(
        &self,
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        role: &Role,
        password_hash: &str,
    ) -> Result<bool, AuthError>;

    /// Name of the role assigned to self-registered users.
    fn registration_role(&self) -> &str;

    /// Authorization URL initiating the login flow for an enabled provider,
    /// or `None` for an unknown/disabled one.
    async fn provider_login_url(&self, provider: &str) -> Result<Option<String>, AuthError>;

    /// Route names of the providers offered on the login page.
    fn providers(&self) -> Vec<String>;
}

pub type DynSecurityManager = Arc<dyn SecurityManager>;
