use hocon::HoconLoader;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally visible base URL (scheme + host + port). Used to build
    /// activation links and to judge absolute redirect targets.
    #[serde(default)]
    pub public_url: Option<String>,
    /// Where soft failures and plain authenticated logins land.
    #[serde(default = "default_index_url")]
    pub index_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Cookie signing key material, minimum 32 bytes. An ephemeral key is
    /// generated when unset, which invalidates sessions on restart.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_true")]
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key: None,
            secure: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistrationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Role assigned to self-registered users on activation.
    #[serde(default = "default_registration_role")]
    pub role: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            role: default_registration_role(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub google: Option<ProviderConfig>,
    #[serde(default)]
    pub microsoft: Option<ProviderConfig>,
    #[serde(default)]
    pub github: Option<ProviderConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Provider authorization endpoint the login redirect points at.
    pub authorize_endpoint: String,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default = "default_scopes")]
    pub scopes: String,
}

fn default_index_url() -> String {
    "/".to_string()
}

fn default_registration_role() -> String {
    "Public".to_string()
}

fn default_scopes() -> String {
    "openid email profile".to_string()
}

fn default_true() -> bool {
    true
}

impl ProvidersConfig {
    /// Look up an enabled provider by its route name.
    pub fn get(&self, name: &str) -> Option<&ProviderConfig> {
        let provider = match name {
            "google" => self.google.as_ref(),
            "microsoft" => self.microsoft.as_ref(),
            "github" => self.github.as_ref(),
            _ => None,
        };
        provider.filter(|p| p.enabled)
    }

    /// Route names of the enabled providers, in display order.
    pub fn enabled_names(&self) -> Vec<String> {
        [
            ("google", &self.google),
            ("microsoft", &self.microsoft),
            ("github", &self.github),
        ]
        .iter()
        .filter_map(|(name, provider)| {
            provider
                .as_ref()
                .filter(|p| p.enabled)
                .map(|_| name.to_string())
        })
        .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        // Try to load from HOCON file first, fall back to environment variables
        Self::from_hocon().unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to load HOCON config: {}. Falling back to environment variables.",
                e
            );
            Self::from_env_fallback()
        })
    }
}

impl Config {
    /// Load configuration from HOCON file with environment variable substitution
    pub fn from_hocon() -> Result<Self, String> {
        Self::from_hocon_path("application.conf")
    }

    /// Load configuration from a specific HOCON file path
    pub fn from_hocon_path<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(format!("Configuration file not found: {}", path.display()));
        }

        let mut config: Config = HoconLoader::new()
            .load_file(path)
            .map_err(|e| format!("Failed to load HOCON file: {}", e))?
            .resolve()
            .map_err(|e| format!("Failed to parse and resolve HOCON: {}", e))?;

        // Provider credentials usually arrive via the environment, not the file.
        config.load_providers_from_env();

        Ok(config)
    }

    /// Legacy method for loading from environment variables only
    #[allow(dead_code)]
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("ATRIUM"))
            .build()?;

        config.try_deserialize()
    }

    /// Fallback configuration from environment variables (old behavior)
    fn from_env_fallback() -> Self {
        let mut config = Self {
            server: ServerConfig {
                host: std::env::var("ATRIUM_SERVER_HOST")
                    .unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("ATRIUM_SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                public_url: std::env::var("ATRIUM_PUBLIC_URL").ok(),
                index_url: std::env::var("ATRIUM_INDEX_URL")
                    .unwrap_or_else(|_| default_index_url()),
            },
            session: SessionConfig {
                key: std::env::var("ATRIUM_SESSION_KEY").ok(),
                secure: std::env::var("ATRIUM_SESSION_SECURE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
            },
            registration: RegistrationConfig {
                enabled: std::env::var("ATRIUM_REGISTRATION_ENABLED")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
                role: std::env::var("ATRIUM_REGISTRATION_ROLE")
                    .unwrap_or_else(|_| default_registration_role()),
            },
            providers: ProvidersConfig::default(),
        };

        config.load_providers_from_env();
        config
    }

    /// Load provider configurations from environment variables
    fn load_providers_from_env(&mut self) {
        Self::load_provider_from_env(
            &mut self.providers.google,
            "GOOGLE",
            "https://accounts.google.com/o/oauth2/v2/auth",
        );
        Self::load_provider_from_env(
            &mut self.providers.microsoft,
            "MICROSOFT",
            "https://login.microsoftonline.com/common/oauth2/v2.0/authorize",
        );
        Self::load_provider_from_env(
            &mut self.providers.github,
            "GITHUB",
            "https://github.com/login/oauth/authorize",
        );
    }

    /// Load a single provider configuration from environment variables
    fn load_provider_from_env(
        provider: &mut Option<ProviderConfig>,
        prefix: &str,
        authorize_endpoint: &str,
    ) {
        let client_id = std::env::var(format!("ATRIUM_{}_CLIENT_ID", prefix)).ok();
        let client_secret = std::env::var(format!("ATRIUM_{}_CLIENT_SECRET", prefix)).ok();

        // Only enable the provider if both client_id and client_secret are set
        if client_id.is_some() && client_secret.is_some() {
            let redirect_uri = std::env::var(format!("ATRIUM_{}_REDIRECT_URI", prefix))
                .ok()
                .or_else(|| {
                    Some(format!(
                        "http://localhost:8080/login/callback/{}",
                        prefix.to_lowercase()
                    ))
                });

            *provider = Some(ProviderConfig {
                enabled: true,
                client_id,
                client_secret,
                authorize_endpoint: std::env::var(format!("ATRIUM_{}_AUTHORIZE_ENDPOINT", prefix))
                    .unwrap_or_else(|_| authorize_endpoint.to_string()),
                redirect_uri,
                scopes: std::env::var(format!("ATRIUM_{}_SCOPES", prefix))
                    .unwrap_or_else(|_| default_scopes()),
            });
        }
    }

    /// Base URL used in activation links and absolute-redirect checks.
    pub fn public_base_url(&self) -> String {
        self.server
            .public_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.server.host, self.server.port))
    }

    /// Absolute activation link for a pending registration.
    pub fn activation_url(&self, registration_hash: &str) -> String {
        format!(
            "{}/register/activation/{}",
            self.public_base_url().trim_end_matches('/'),
            registration_hash
        )
    }

    /// Validate configuration for production use
    pub fn validate_for_production(&self) -> Result<(), String> {
        match self.session.key.as_deref() {
            None => {
                return Err(
                    "ATRIUM_SESSION_KEY must be explicitly set for production. Generate a secure random string (minimum 32 characters)."
                        .to_string(),
                )
            }
            Some(key) if key.len() < 32 => {
                return Err(format!(
                    "ATRIUM_SESSION_KEY must be at least 32 characters long (current: {} characters)",
                    key.len()
                ))
            }
            Some(_) => {}
        }

        if !self.session.secure {
            return Err(
                "session.secure must not be disabled in production (cookies would be sent over plain HTTP)"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Produce a version safe to log (secrets masked).
    pub fn sanitized(&self) -> Self {
        let mut clone = self.clone();
        if clone.session.key.is_some() {
            clone.session.key = Some("***MASKED***".to_string());
        }

        Self::sanitize_provider(&mut clone.providers.google);
        Self::sanitize_provider(&mut clone.providers.microsoft);
        Self::sanitize_provider(&mut clone.providers.github);

        clone
    }

    fn sanitize_provider(provider: &mut Option<ProviderConfig>) {
        if let Some(ref mut p) = provider {
            if let Some(ref mut secret) = p.client_secret {
                *secret = "***MASKED***".to_string();
            }
        }
    }
}
