//! Server assembly: middleware, session store, templating, routes.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use crate::config::Config;
use crate::handlers;
use crate::mailer::{DynActivationMailer, LogMailer};
use crate::security::{DynSecurityManager, InMemorySecurityManager};
use crate::telemetry;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "atrium_session";

/// Route bindings for the authentication surface. Shared between the server
/// assembly and the integration tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health::health))
        .service(
            web::scope("/login")
                .route("", web::get().to(handlers::auth::login))
                .route("/{provider}", web::get().to(handlers::auth::provider_login)),
        )
        .service(
            web::scope("/register")
                .service(
                    web::resource("")
                        .route(web::get().to(handlers::register::register))
                        .route(web::post().to(handlers::register::submit)),
                )
                .route(
                    "/activation/{activation_hash}",
                    web::get().to(handlers::register::activation),
                ),
        );
}

/// Cookie signing key from configuration, or an ephemeral one.
fn session_key(config: &Config) -> Key {
    match config.session.key.as_deref() {
        Some(secret) if secret.len() >= 32 => Key::derive_from(secret.as_bytes()),
        Some(_) => {
            warn!("configured session key is shorter than 32 bytes; generating an ephemeral key");
            Key::generate()
        }
        None => {
            warn!("no session key configured; sessions will not survive a restart");
            Key::generate()
        }
    }
}

pub async fn run() -> std::io::Result<()> {
    telemetry::init_telemetry().map_err(|e| std::io::Error::other(e.to_string()))?;

    let config = Config::default();
    if let Err(reason) = config.validate_for_production() {
        warn!(%reason, "configuration is not production-ready");
    }
    info!(config = ?config.sanitized(), "loaded configuration");

    let templates =
        tera::Tera::new("templates/**/*.html").map_err(|e| std::io::Error::other(e.to_string()))?;

    let security: DynSecurityManager = Arc::new(InMemorySecurityManager::new(
        &config.registration.role,
        config.providers.clone(),
    ));
    let mailer: DynActivationMailer = Arc::new(LogMailer);

    let key = session_key(&config);
    let cookie_secure = config.session.secure;
    let bind_addr = (config.server.host.clone(), config.server.port);
    info!(host = %bind_addr.0, port = bind_addr.1, "starting auth server");

    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_name(SESSION_COOKIE.to_string())
                    .cookie_secure(cookie_secure)
                    .build(),
            )
            .app_data(config.clone())
            .app_data(web::Data::new(templates.clone()))
            .app_data(web::Data::new(security.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .service(Files::new("/static", "./static"))
            .configure(routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
