use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard faults only. The soft failure classes (unknown activation hash,
/// rejected user creation, unsafe redirect target) are logged and turned into
/// redirects by the handlers and never reach this type.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl AuthError {
    pub fn new(error: &str, description: Option<&str>) -> Self {
        Self {
            error: error.to_string(),
            error_description: description.map(|s| s.to_string()),
        }
    }

    pub fn invalid_request(description: &str) -> Self {
        Self::new("invalid_request", Some(description))
    }

    pub fn server_error(description: &str) -> Self {
        Self::new("server_error", Some(description))
    }

    pub fn template(description: &str) -> Self {
        Self::new("template_error", Some(description))
    }

    pub fn session(description: &str) -> Self {
        Self::new("session_error", Some(description))
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {:?}", self.error, self.error_description)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self.error.as_str() {
            "invalid_request" | "session_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

impl From<tera::Error> for AuthError {
    fn from(err: tera::Error) -> Self {
        Self::template(&err.to_string())
    }
}

impl From<actix_session::SessionInsertError> for AuthError {
    fn from(err: actix_session::SessionInsertError) -> Self {
        Self::session(&err.to_string())
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::server_error(&err.to_string())
    }
}
