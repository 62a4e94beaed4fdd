pub mod auth;
pub mod health;
pub mod register;

pub use auth::*;
pub use health::*;
pub use register::*;

use actix_web::{http::header, HttpResponse};

/// Login and registration pages must never be served from a cache.
pub(crate) fn no_cache_headers(mut resp: HttpResponse) -> HttpResponse {
    resp.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().unwrap(),
    );
    resp.headers_mut()
        .insert(header::PRAGMA, "no-cache".parse().unwrap());
    resp
}

/// Plain 302 redirect.
pub(crate) fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, location.to_string()))
        .finish()
}

/// Rendered HTML page.
pub(crate) fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}
