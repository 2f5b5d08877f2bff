use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{Datelike, Utc};
use db::models::{company, school, trade, trainer_attendance};
use hierarchy::attendance::{Calendar, MonthlySummary};
use hierarchy::model::{GeoPoint, TrainerStatus};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use util::state::AppState;

use super::current_trainer;
use crate::auth::AuthUser;
use crate::response::{ApiResponse, Failure, failure, internal};
use crate::routes::common::RefView;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub status: TrainerStatus,
    pub location: Option<GeoPoint>,
    pub school: Option<RefView>,
    pub trade: Option<RefView>,
    pub company: Option<RefView>,
}

/// `GET /api/trainers/me`
pub async fn me(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<TrainerProfile>>), Failure> {
    let db = app_state.db();
    let t = current_trainer(db, &user).await?;

    let school = school::Entity::find_by_id(t.school_id).one(db).await.map_err(internal)?;
    let trade = trade::Entity::find_by_id(t.trade_id).one(db).await.map_err(internal)?;
    let company = company::Entity::find_by_id(t.company_id).one(db).await.map_err(internal)?;

    let profile = TrainerProfile {
        id: t.id.to_string(),
        location: t.location().map(GeoPoint::from),
        status: t.status.into(),
        full_name: t.full_name,
        email: t.email,
        phone: t.phone,
        school: school.map(|s| RefView::new(s.id, s.name)),
        trade: trade.map(|tr| RefView::new(tr.id, tr.name)),
        company: company.map(|c| RefView::new(c.id, c.name)),
    };
    Ok((StatusCode::OK, Json(ApiResponse::success(profile, "Profile retrieved successfully"))))
}

/// `GET /api/trainers/calendar`: `{ "2025-09-01": { "status": "present", "totalHour": 0 } }`.
pub async fn calendar(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<ApiResponse<Calendar>>), Failure> {
    let db = app_state.db();
    let t = current_trainer(db, &user).await?;
    let cal = trainer_attendance::Model::calendar(db, t.id).await.map_err(internal)?;
    Ok((StatusCode::OK, Json(ApiResponse::success(cal, "Calendar retrieved successfully"))))
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// `GET /api/trainers/summary?year=&month=`, defaulting to the current UTC month.
pub async fn summary(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SummaryQuery>,
) -> Result<(StatusCode, Json<ApiResponse<MonthlySummary>>), Failure> {
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    if !(1..=12).contains(&month) {
        return Err(failure(StatusCode::BAD_REQUEST, "Month must be between 1 and 12"));
    }

    let db = app_state.db();
    let t = current_trainer(db, &user).await?;
    let cal = trainer_attendance::Model::calendar(db, t.id).await.map_err(internal)?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            MonthlySummary::for_month(&cal, year, month),
            "Summary retrieved successfully",
        )),
    ))
}
