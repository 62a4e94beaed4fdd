use actix_web::{HttpResponse, Result};

/// Health check endpoint
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "atrium-auth",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
