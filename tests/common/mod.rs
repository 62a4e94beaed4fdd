#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use async_trait::async_trait;

use atrium_auth::config::{
    Config, ProviderConfig, ProvidersConfig, RegistrationConfig, ServerConfig, SessionConfig,
};
use atrium_auth::mailer::{ActivationMailer, DynActivationMailer, LogMailer};
use atrium_auth::models::AuthError;
use atrium_auth::server::SESSION_COOKIE;
use atrium_auth::session::{AUTH_USER_KEY, NEXT_URL_KEY};

const TEST_SESSION_KEY: &[u8] = b"an-integration-test-session-key-with-enough-bytes";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            public_url: Some("http://app.atrium.test".to_string()),
            index_url: "/".to_string(),
        },
        session: SessionConfig {
            key: None,
            secure: false,
        },
        registration: RegistrationConfig {
            enabled: true,
            role: "Public".to_string(),
        },
        providers: test_providers(),
    }
}

pub fn test_providers() -> ProvidersConfig {
    ProvidersConfig {
        github: Some(ProviderConfig {
            enabled: true,
            client_id: Some("gh-client".to_string()),
            client_secret: Some("gh-secret".to_string()),
            authorize_endpoint: "https://github.test/login/oauth/authorize".to_string(),
            redirect_uri: Some("http://app.atrium.test/login/callback/github".to_string()),
            scopes: "read:user".to_string(),
        }),
        ..ProvidersConfig::default()
    }
}

pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(
        CookieSessionStore::default(),
        Key::derive_from(TEST_SESSION_KEY),
    )
    .cookie_name(SESSION_COOKIE.to_string())
    .cookie_secure(false)
    .build()
}

pub fn templates() -> tera::Tera {
    tera::Tera::new("templates/**/*.html").expect("load templates")
}

pub fn log_mailer() -> DynActivationMailer {
    Arc::new(LogMailer)
}

/// Test-only route standing in for the external authentication flow: writes
/// session state (`auth_user`, `next_url`) the way the real flow would.
pub async fn seed_session(
    query: web::Query<HashMap<String, String>>,
    session: Session,
) -> HttpResponse {
    if let Some(user) = query.get("auth_user") {
        session.insert(AUTH_USER_KEY, user).unwrap();
    }
    if let Some(next) = query.get("next_url") {
        session.insert(NEXT_URL_KEY, next).unwrap();
    }
    HttpResponse::Ok().finish()
}

pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Cookie<'static> {
    try_session_cookie(resp).expect("session cookie in response")
}

pub fn try_session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    let raw = resp
        .response()
        .headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(SESSION_COOKIE))?;
    Some(
        Cookie::parse_encoded(raw.to_string())
            .expect("parse session cookie")
            .into_owned(),
    )
}

pub fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.response()
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("Location header")
}

pub struct SentActivation {
    pub email: String,
    pub username: String,
    pub activation_url: String,
}

/// Captures activation mails instead of delivering them.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentActivation>>,
}

#[async_trait]
impl ActivationMailer for RecordingMailer {
    async fn send_activation(
        &self,
        email: &str,
        username: &str,
        activation_url: &str,
    ) -> Result<(), AuthError> {
        self.sent.lock().unwrap().push(SentActivation {
            email: email.to_string(),
            username: username.to_string(),
            activation_url: activation_url.to_string(),
        });
        Ok(())
    }
}
