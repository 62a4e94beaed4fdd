use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::Config;
use crate::handlers::{found, html, no_cache_headers};
use crate::models::AuthError;
use crate::security::DynSecurityManager;
use crate::{redirect, session as session_state};

/// Login entry point.
///
/// An authenticated caller is sent to the redirect target stashed by
/// `provider_login` (consumed on read, so a second visit falls through to the
/// index URL). Anonymous callers get the login page.
pub async fn login(
    session: Session,
    security: web::Data<DynSecurityManager>,
    templates: web::Data<tera::Tera>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AuthError> {
    if let Some(username) = session_state::authenticated_user(&session) {
        if let Some(next_url) = session_state::take_next_url(&session) {
            debug!(user = %username, next_url = %next_url, "resuming stored redirect after login");
            return Ok(no_cache_headers(found(&next_url)));
        }
        return Ok(no_cache_headers(found(&config.server.index_url)));
    }

    let mut context = tera::Context::new();
    context.insert("providers", &security.providers());
    let body = templates.render("login.html", &context)?;
    Ok(no_cache_headers(html(body)))
}

#[derive(Debug, Deserialize)]
pub struct ProviderLoginQuery {
    pub next: Option<String>,
}

/// Provider login entry point.
///
/// Captures the optional `next` redirect target before the OAuth round-trip
/// begins: a validated value is stashed in the session for `login` to consume
/// on return, an unsafe value is dropped without failing the request.
pub async fn provider_login(
    provider: web::Path<String>,
    query: web::Query<ProviderLoginQuery>,
    session: Session,
    security: web::Data<DynSecurityManager>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AuthError> {
    let provider = provider.into_inner();

    if let Some(next_url) = query.next.as_deref() {
        match redirect::safe_redirect_target(next_url, config.server.public_url.as_deref()) {
            Some(safe) => session_state::store_next_url(&session, &safe)?,
            None => {
                error!(provider = %provider, next_url = %next_url, "dropping unsafe redirect target");
            }
        }
    }

    match security.provider_login_url(&provider).await? {
        Some(authorize_url) => Ok(no_cache_headers(found(&authorize_url))),
        None => {
            error!(provider = %provider, "login requested for unknown or disabled provider");
            Ok(no_cache_headers(found(&config.server.index_url)))
        }
    }
}
