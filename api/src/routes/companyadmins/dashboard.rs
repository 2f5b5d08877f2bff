//! Filtered dashboard and spreadsheet export for one tenant.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use db::load_collections;
use hierarchy::export::{EXPORT_FILE_NAME, school_rows, to_csv};
use hierarchy::filter::{FilterOptions, filter_options};
use hierarchy::snapshot::DashboardView;
use hierarchy::{HierarchyFilter, build_index, narrow};
use serde::{Deserialize, Serialize};
use tracing::debug;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, Failure, failure, internal};
use crate::routes::common::tenant_of;

/// `?stateId=&districtId=&blockId=`; empty or `all` means no restriction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub state_id: Option<String>,
    pub district_id: Option<String>,
    pub block_id: Option<String>,
}

impl DashboardQuery {
    fn filter(&self) -> Result<HierarchyFilter, Failure> {
        HierarchyFilter::parse(
            self.state_id.as_deref(),
            self.district_id.as_deref(),
            self.block_id.as_deref(),
        )
        .map_err(|e| failure(StatusCode::BAD_REQUEST, e.to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse<'a> {
    #[serde(flatten)]
    pub view: DashboardView,
    pub options: FilterOptions<'a>,
}

/// `GET /api/companyadmins/dashboard`
///
/// Narrowed collections, totals, per-state rollups, the dropdown options for
/// the current selection and any records whose ancestry did not resolve.
/// An inconsistent selection yields empty collections; a malformed id is `400`.
pub async fn dashboard(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, Failure> {
    let filter = query.filter()?;
    let company_id = tenant_of(&user)?;
    let collections = load_collections(app_state.db(), company_id).await.map_err(internal)?;

    let view = DashboardView::from_collections(&collections, &filter).map_err(internal)?;
    debug!(company_id, ?filter, schools = view.statistics.total_schools, "dashboard computed");

    let body = DashboardResponse {
        view,
        options: filter_options(&collections, &filter),
    };
    let json = serde_json::to_value(&body).map_err(internal)?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json, "Dashboard retrieved successfully")),
    ))
}

/// `GET /api/companyadmins/export`: visible schools as `schools-trainers-data.csv`.
pub async fn export_csv(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DashboardQuery>,
) -> Result<impl IntoResponse, Failure> {
    let filter = query.filter()?;
    let company_id = tenant_of(&user)?;
    let c = load_collections(app_state.db(), company_id).await.map_err(internal)?;

    let index = build_index(&c.states, &c.districts, &c.blocks, &c.schools).map_err(internal)?;
    let narrowed = narrow(&c, &index, &filter);
    let rows = school_rows(&narrowed, &index, &c.trades, &c.trainers, &c.school_trades);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        to_csv(&rows),
    ))
}
