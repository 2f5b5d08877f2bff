use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use db::load_collections;
use db::models::{company, trainer_attendance};
use hierarchy::snapshot::DashboardView;
use hierarchy::{HierarchyFilter, Statistics};
use serde::Serialize;
use util::state::AppState;

use crate::response::{ApiResponse, Failure, internal};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOverview {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub statistics: Statistics,
    pub trainers_present_today: u64,
}

/// `GET /api/superadmins/companies`
///
/// Every tenant with its unfiltered statistics and how many of its trainers
/// have attended today (UTC day).
pub async fn list_companies(
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<CompanyOverview>>>), Failure> {
    let db = app_state.db();
    let today = Utc::now().date_naive();

    let mut overviews = Vec::new();
    for c in company::Model::find_all(db).await.map_err(internal)? {
        let collections = load_collections(db, c.id).await.map_err(internal)?;
        let view = DashboardView::from_collections(&collections, &HierarchyFilter::default()).map_err(internal)?;
        let present = trainer_attendance::Model::count_attended(db, c.id, today)
            .await
            .map_err(internal)?;

        overviews.push(CompanyOverview {
            id: c.id.to_string(),
            name: c.name,
            created_at: c.created_at,
            statistics: view.statistics,
            trainers_present_today: present,
        });
    }

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(overviews, "Companies retrieved successfully")),
    ))
}
