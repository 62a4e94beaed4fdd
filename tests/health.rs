// Smoke tests for the service surface

use actix_web::{test, App};

#[actix_web::test]
async fn health_endpoint_reports_healthy() {
    let app = test::init_service(App::new().configure(atrium_auth::server::routes)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "atrium-auth");
}
