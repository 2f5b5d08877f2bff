use api::auth::generate_jwt;
use axum::{
    Router,
    body::Body as AxumBody,
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
    response::Response,
};
use db::models::user::UserRole;
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use util::config::AppConfig;
use util::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

/// A fresh app over an in-memory database with migrations applied.
pub async fn make_test_app() -> (Router, DatabaseConnection) {
    dotenvy::dotenv().ok();
    AppConfig::set_jwt_secret(TEST_SECRET);
    AppConfig::set_jwt_duration_minutes(60u64);

    let db = setup_test_db().await;
    (api::app(AppState::new(db.clone())), db)
}

pub fn token_for(user_id: i64, role: UserRole, company_id: Option<i64>) -> String {
    generate_jwt(user_id, role, company_id).unwrap().0
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<AxumBody> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {t}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(AxumBody::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(AxumBody::empty()).unwrap(),
    }
}

pub async fn send_raw(app: &Router, req: Request<AxumBody>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn get_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

pub async fn send(app: &Router, req: Request<AxumBody>) -> (StatusCode, Value) {
    let response = send_raw(app, req).await;
    let status = response.status();
    (status, get_json_body(response).await)
}
