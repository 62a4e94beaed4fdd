use actix_web::{web, HttpResponse};
use tracing::error;
use validator::Validate;

use crate::config::Config;
use crate::handlers::{found, html, no_cache_headers};
use crate::mailer::DynActivationMailer;
use crate::models::{AuthError, RegistrationForm};
use crate::security::DynSecurityManager;

/// Registration form page. No side effects.
pub async fn register(
    templates: web::Data<tera::Tera>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AuthError> {
    if !config.registration.enabled {
        return Ok(found(&config.server.index_url));
    }

    let context = form_context(None, &[]);
    let body = templates.render("register.html", &context)?;
    Ok(no_cache_headers(html(body)))
}

/// Registration form submission.
///
/// On success the security manager records the pending registration (hashing
/// the password and minting the activation hash) and the activation link is
/// handed to the mailer. Mail failure is a soft failure; the pending record
/// stays valid and the user can be re-sent the link out of band.
pub async fn submit(
    form: web::Form<RegistrationForm>,
    security: web::Data<DynSecurityManager>,
    mailer: web::Data<DynActivationMailer>,
    templates: web::Data<tera::Tera>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AuthError> {
    if !config.registration.enabled {
        return Ok(found(&config.server.index_url));
    }

    let form = form.into_inner();
    if let Err(errors) = form.validate() {
        let context = form_context(Some(&form), &field_messages(&errors));
        let body = templates.render("register.html", &context)?;
        return Ok(no_cache_headers(html(body)));
    }

    let registration = security
        .add_register_user(
            &form.username,
            &form.email,
            &form.first_name,
            &form.last_name,
            &form.password,
        )
        .await?;

    let activation_url = config.activation_url(&registration.registration_hash);
    if let Err(err) = mailer
        .send_activation(&registration.email, &registration.username, &activation_url)
        .await
    {
        error!(error = %err, email = %registration.email, "failed to send activation mail");
    }

    let mut context = tera::Context::new();
    context.insert("email", &registration.email);
    let body = templates.render("register_wait.html", &context)?;
    Ok(no_cache_headers(html(body)))
}

/// Activation endpoint. The URL is sent to the user by email; when accessed
/// the pending registration is materialized into an active user.
pub async fn activation(
    activation_hash: web::Path<String>,
    security: web::Data<DynSecurityManager>,
    templates: web::Data<tera::Tera>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AuthError> {
    let activation_hash = activation_hash.into_inner();

    let Some(registration) = security.find_register_user(&activation_hash).await? else {
        error!(activation_hash = %activation_hash, "no pending registration for activation hash");
        return Ok(found(&config.server.index_url));
    };

    let role_name = security.registration_role().to_string();
    let Some(role) = security.find_role(&role_name).await? else {
        error!(role = %role_name, "registration role missing from the user directory");
        return Ok(found(&config.server.index_url));
    };

    let created = security
        .add_user(
            &registration.username,
            &registration.email,
            &registration.first_name,
            &registration.last_name,
            &role,
            &registration.password_hash,
        )
        .await?;
    if !created {
        error!(username = %registration.username, "user registration failed");
        return Ok(found(&config.server.index_url));
    }

    security.del_register_user(&registration).await?;

    let mut context = tera::Context::new();
    context.insert("username", &registration.username);
    context.insert("first_name", &registration.first_name);
    context.insert("last_name", &registration.last_name);
    let body = templates.render("activation.html", &context)?;
    Ok(html(body))
}

fn form_context(form: Option<&RegistrationForm>, errors: &[String]) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("errors", errors);
    context.insert("username", form.map(|f| f.username.as_str()).unwrap_or(""));
    context.insert(
        "first_name",
        form.map(|f| f.first_name.as_str()).unwrap_or(""),
    );
    context.insert("last_name", form.map(|f| f.last_name.as_str()).unwrap_or(""));
    context.insert("email", form.map(|f| f.email.as_str()).unwrap_or(""));
    context
}

fn field_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, field_errors)| {
            let detail = field_errors
                .first()
                .and_then(|e| e.message.clone())
                .unwrap_or_else(|| "is invalid".into());
            format!("{field} {detail}")
        })
        .collect();
    messages.sort();
    messages
}
