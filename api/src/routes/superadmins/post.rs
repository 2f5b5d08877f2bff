use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use common::format_validation_errors;
use db::models::company;
use db::models::user::{self, UserRole};
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use tracing::info;
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiResponse, Failure, failure, internal};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 120, message = "Company name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Admin username is required"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCreated {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub admin_email: String,
    pub created_at: DateTime<Utc>,
}

/// `POST /api/superadmins/companies`
///
/// Creates the company and its company-admin login in one transaction.
/// `409` when the company name or the email is taken.
pub async fn create_company(
    State(app_state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CompanyCreated>>), Failure> {
    if let Err(errors) = req.validate() {
        return Err(failure(StatusCode::BAD_REQUEST, format_validation_errors(&errors)));
    }
    let db = app_state.db();

    if company::Model::find_by_name(db, &req.name).await.map_err(internal)?.is_some() {
        return Err(failure(StatusCode::CONFLICT, "A company with this name already exists"));
    }
    if user::Model::find_by_email(db, &req.email).await.map_err(internal)?.is_some() {
        return Err(failure(StatusCode::CONFLICT, "A user with this email already exists"));
    }

    let txn = db.begin().await.map_err(internal)?;
    let created = company::Model::create(&txn, &req.name).await.map_err(internal)?;
    let admin = user::Model::create(
        &txn,
        &req.username,
        &req.email,
        &req.password,
        UserRole::CompanyAdmin,
        Some(created.id),
    )
    .await
    .map_err(internal)?;
    txn.commit().await.map_err(internal)?;

    info!(company = created.id, admin = admin.id, "company registered");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            CompanyCreated {
                id: created.id.to_string(),
                name: created.name,
                admin_email: admin.email,
                created_at: created.created_at,
            },
            "Company created successfully",
        )),
    ))
}
