use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::{NaiveDate, Utc};
use db::models::trainer_attendance::{self, AttendanceWriteError, Mark};
use hierarchy::Location;
use hierarchy::attendance::{Calendar, DaySlot, EventKind, event_date};
use serde::{Deserialize, Serialize};
use util::state::AppState;

use super::current_trainer;
use crate::auth::AuthUser;
use crate::response::{ApiResponse, Failure, failure, internal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyStatus {
    Present,
    Absent,
}

#[derive(Debug, Deserialize)]
pub struct MarkRequest {
    pub status: DailyStatus,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CheckOutRequest {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// The day that changed and the trainer's full calendar after the change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResult {
    pub date: NaiveDate,
    pub slot: DaySlot,
    pub calendar: Calendar,
}

fn required_location(latitude: Option<f64>, longitude: Option<f64>, action: &str) -> Result<Location, Failure> {
    let (Some(lat), Some(lng)) = (latitude, longitude) else {
        return Err(failure(StatusCode::BAD_REQUEST, format!("Location is required to {action}")));
    };
    Location::new(lat, lng).map_err(|e| failure(StatusCode::BAD_REQUEST, format!("Invalid location: {e}")))
}

async fn apply(app_state: &AppState, user: &AuthUser, kind: EventKind, location: Option<Location>) -> Result<(StatusCode, Json<ApiResponse<AttendanceResult>>), Failure> {
    let db = app_state.db();
    let t = current_trainer(db, user).await?;

    let now = Utc::now();
    let mark = Mark {
        kind,
        date: event_date(None, &now),
        at: now,
        location,
    };
    let row = trainer_attendance::Model::record(db, t.id, mark)
        .await
        .map_err(|e| match e {
            AttendanceWriteError::Rejected(reason) => failure(StatusCode::BAD_REQUEST, reason.to_string()),
            AttendanceWriteError::Db(db_err) => internal(db_err),
        })?;
    let calendar = trainer_attendance::Model::calendar(db, t.id).await.map_err(internal)?;

    let message = match kind {
        EventKind::MarkPresent => "Marked present",
        EventKind::MarkAbsent => "Marked absent",
        EventKind::Checkout => "Checked out",
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(
            AttendanceResult {
                date: row.date,
                slot: row.slot(),
                calendar,
            },
            message,
        )),
    ))
}

/// `POST /api/trainers/mark-daily-status`
///
/// `present` needs the trainer's coordinates, `absent` does not. A second mark
/// on a closed day is rejected with `400`.
pub async fn mark_daily_status(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<MarkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceResult>>), Failure> {
    match req.status {
        DailyStatus::Present => {
            let location = required_location(req.latitude, req.longitude, "mark present")?;
            apply(&app_state, &user, EventKind::MarkPresent, Some(location)).await
        }
        DailyStatus::Absent => apply(&app_state, &user, EventKind::MarkAbsent, None).await,
    }
}

/// `POST /api/trainers/check-out`: closes today's present slot and records the hours worked.
pub async fn check_out(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CheckOutRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceResult>>), Failure> {
    let location = required_location(req.latitude, req.longitude, "check out")?;
    apply(&app_state, &user, EventKind::Checkout, Some(location)).await
}
