use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use async_trait::async_trait;
use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};
use std::collections::HashMap;
use std::sync::RwLock;
use url::Url;

use crate::config::ProvidersConfig;
use crate::models::{AuthError, PendingRegistration, Role, User};
use crate::security::SecurityManager;

const ACTIVATION_HASH_LEN: usize = 40;

#[derive(Default)]
struct Directory {
    users: HashMap<String, User>,
    roles: HashMap<String, Role>,
    pending: HashMap<String, PendingRegistration>,
}

/// In-memory reference backend.
///
/// Exists so the crate runs and tests without a real user directory;
/// deployments inject their own `SecurityManager` implementation.
pub struct InMemorySecurityManager {
    registration_role: String,
    providers: ProvidersConfig,
    directory: RwLock<Directory>,
}

impl InMemorySecurityManager {
    pub fn new(registration_role: &str, providers: ProvidersConfig) -> Self {
        let mut directory = Directory::default();
        // The registration role must resolve for activation to succeed.
        directory.roles.insert(
            registration_role.to_string(),
            Role::new(registration_role),
        );
        directory
            .roles
            .insert("Admin".to_string(), Role::new("Admin"));

        Self {
            registration_role: registration_role.to_string(),
            providers,
            directory: RwLock::new(directory),
        }
    }

    /// Snapshot of the pending registrations, oldest first.
    pub fn pending_registrations(&self) -> Vec<PendingRegistration> {
        let directory = self.directory.read().expect("directory lock poisoned");
        let mut pending: Vec<_> = directory.pending.values().cloned().collect();
        pending.sort_by_key(|r| r.registration_date);
        pending
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn generate_activation_hash() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(ACTIVATION_HASH_LEN)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl SecurityManager for InMemorySecurityManager {
    async fn find_register_user(
        &self,
        activation_hash: &str,
    ) -> Result<Option<PendingRegistration>, AuthError> {
        let directory = self.directory.read().expect("directory lock poisoned");
        Ok(directory.pending.get(activation_hash).cloned())
    }

    async fn add_register_user(
        &self,
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<PendingRegistration, AuthError> {
        let registration = PendingRegistration {
            registration_hash: Self::generate_activation_hash(),
            username: username.to_string(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            password_hash: Self::hash_password(password)?,
            registration_date: Utc::now(),
        };

        let mut directory = self.directory.write().expect("directory lock poisoned");
        directory
            .pending
            .insert(registration.registration_hash.clone(), registration.clone());
        Ok(registration)
    }

    async fn del_register_user(
        &self,
        registration: &PendingRegistration,
    ) -> Result<(), AuthError> {
        let mut directory = self.directory.write().expect("directory lock poisoned");
        directory.pending.remove(&registration.registration_hash);
        Ok(())
    }

    async fn find_role(&self, name: &str) -> Result<Option<Role>, AuthError> {
        let directory = self.directory.read().expect("directory lock poisoned");
        Ok(directory.roles.get(name).cloned())
    }

    async fn add_user(
        &self,
        username: &str,
        email: &str,
        first_name: &str,
        last_name: &str,
        role: &Role,
        password_hash: &str,
    ) -> Result<bool, AuthError> {
        let mut directory = self.directory.write().expect("directory lock poisoned");
        if directory.users.contains_key(username) {
            return Ok(false);
        }

        let user = User::new(
            username.to_string(),
            email.to_string(),
            first_name.to_string(),
            last_name.to_string(),
            role.clone(),
            password_hash.to_string(),
        );
        directory.users.insert(username.to_string(), user);
        Ok(true)
    }

    fn registration_role(&self) -> &str {
        &self.registration_role
    }

    async fn provider_login_url(&self, provider: &str) -> Result<Option<String>, AuthError> {
        let Some(config) = self.providers.get(provider) else {
            return Ok(None);
        };

        let mut url = Url::parse(&config.authorize_endpoint)
            .map_err(|e| AuthError::server_error(&format!("bad authorize endpoint: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("response_type", "code");
            if let Some(client_id) = &config.client_id {
                pairs.append_pair("client_id", client_id);
            }
            if let Some(redirect_uri) = &config.redirect_uri {
                pairs.append_pair("redirect_uri", redirect_uri);
            }
            pairs.append_pair("scope", &config.scopes);
        }
        Ok(Some(url.into()))
    }

    fn providers(&self) -> Vec<String> {
        self.providers.enabled_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    fn github_only() -> ProvidersConfig {
        ProvidersConfig {
            github: Some(ProviderConfig {
                enabled: true,
                client_id: Some("gh-client".to_string()),
                client_secret: Some("gh-secret".to_string()),
                authorize_endpoint: "https://github.com/login/oauth/authorize".to_string(),
                redirect_uri: Some("http://localhost:8080/login/callback/github".to_string()),
                scopes: "read:user user:email".to_string(),
            }),
            ..ProvidersConfig::default()
        }
    }

    #[actix_web::test]
    async fn registration_hashes_password_and_mints_hash() {
        let sm = InMemorySecurityManager::new("Public", ProvidersConfig::default());
        let reg = sm
            .add_register_user("gwen", "gwen@example.com", "Gwen", "Stacy", "hunter2secret")
            .await
            .unwrap();

        assert_eq!(reg.registration_hash.len(), ACTIVATION_HASH_LEN);
        assert_ne!(reg.password_hash, "hunter2secret");
        assert!(reg.password_hash.starts_with("$argon2"));

        let found = sm.find_register_user(&reg.registration_hash).await.unwrap();
        assert_eq!(found.map(|r| r.username), Some("gwen".to_string()));
    }

    #[actix_web::test]
    async fn add_user_rejects_duplicate_usernames() {
        let sm = InMemorySecurityManager::new("Public", ProvidersConfig::default());
        let role = sm.find_role("Public").await.unwrap().unwrap();

        let first = sm
            .add_user("gwen", "gwen@example.com", "Gwen", "Stacy", &role, "$argon2$x")
            .await
            .unwrap();
        let second = sm
            .add_user("gwen", "other@example.com", "Gwen", "Stacy", &role, "$argon2$y")
            .await
            .unwrap();

        assert!(first);
        assert!(!second);
    }

    #[actix_web::test]
    async fn provider_login_url_is_none_for_unknown_provider() {
        let sm = InMemorySecurityManager::new("Public", github_only());

        assert_eq!(sm.provider_login_url("gitlab").await.unwrap(), None);

        let url = sm.provider_login_url("github").await.unwrap().unwrap();
        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=gh-client"));
        assert!(url.contains("response_type=code"));
    }
}
