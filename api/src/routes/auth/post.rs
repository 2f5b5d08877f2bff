use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use common::format_validation_errors;
use db::models::user::{self, UserRole};
use serde::{Deserialize, Serialize};
use tracing::info;
use util::state::AppState;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::{ApiResponse, Failure, failure, internal};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub company_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for UserView {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username,
            email: u.email,
            role: u.role,
            company_id: u.company_id.map(|c| c.to_string()),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserView,
    pub token: String,
    pub expires_at: String,
}

async fn login(app_state: AppState, req: LoginRequest, role: UserRole) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), Failure> {
    if let Err(errors) = req.validate() {
        return Err(failure(StatusCode::BAD_REQUEST, format_validation_errors(&errors)));
    }

    let user = user::Model::authenticate(app_state.db(), &req.email, &req.password, role)
        .await
        .map_err(internal)?
        .ok_or_else(|| failure(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;

    let (token, expires_at) = generate_jwt(user.id, user.role, user.company_id).map_err(internal)?;
    info!(user = user.id, role = %role, "login");

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            LoginResponse {
                user: user.into(),
                token,
                expires_at,
            },
            "Login successful",
        )),
    ))
}

/// `POST /api/superadmins/login`
pub async fn super_admin_login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), Failure> {
    login(app_state, req, UserRole::SuperAdmin).await
}

/// `POST /api/companyadmins/login`
pub async fn company_admin_login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), Failure> {
    login(app_state, req, UserRole::CompanyAdmin).await
}

/// `POST /api/management/trainers/login`
pub async fn trainer_login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LoginResponse>>), Failure> {
    login(app_state, req, UserRole::Trainer).await
}
