use axum::{Extension, Json, extract::State, http::StatusCode};
use db::load_collections;
use hierarchy::{Collections, EntityId, HierarchyIndex, build_index};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use util::state::AppState;

use super::views::{BlockView, DistrictView, SchoolView, StateView, TradeView, TrainerView};
use crate::auth::AuthUser;
use crate::response::{ApiResponse, Failure, internal};
use crate::routes::common::{RefView, tenant_of};

type Listed<T> = Result<(StatusCode, Json<ApiResponse<Vec<T>>>), Failure>;

async fn tenant_collections(app_state: &AppState, user: &AuthUser) -> Result<Collections, Failure> {
    let company_id = tenant_of(user)?;
    load_collections(app_state.db(), company_id).await.map_err(internal)
}

fn with_index<T>(
    c: &Collections,
    f: impl FnOnce(&HierarchyIndex<'_>) -> T,
) -> Result<T, Failure> {
    let index = build_index(&c.states, &c.districts, &c.blocks, &c.schools).map_err(internal)?;
    Ok(f(&index))
}

fn listed<T: Serialize>(items: Vec<T>, what: &str) -> (StatusCode, Json<ApiResponse<Vec<T>>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(items, format!("{what} retrieved successfully"))),
    )
}

/// `GET /api/companyadmins/getStates`
pub async fn get_states(State(app_state): State<AppState>, Extension(user): Extension<AuthUser>) -> Listed<StateView> {
    let c = tenant_collections(&app_state, &user).await?;
    Ok(listed(c.states.iter().map(StateView::from).collect(), "States"))
}

/// `GET /api/companyadmins/getDistricts`
pub async fn get_districts(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Listed<DistrictView> {
    let c = tenant_collections(&app_state, &user).await?;
    let items = with_index(&c, |index| c.districts.iter().map(|d| DistrictView::new(d, index)).collect())?;
    Ok(listed(items, "Districts"))
}

/// `GET /api/companyadmins/getBlocks`
pub async fn get_blocks(State(app_state): State<AppState>, Extension(user): Extension<AuthUser>) -> Listed<BlockView> {
    let c = tenant_collections(&app_state, &user).await?;
    let items = with_index(&c, |index| c.blocks.iter().map(|b| BlockView::new(b, index)).collect())?;
    Ok(listed(items, "Blocks"))
}

/// `GET /api/companyadmins/getTrades`
pub async fn get_trades(State(app_state): State<AppState>, Extension(user): Extension<AuthUser>) -> Listed<TradeView> {
    let c = tenant_collections(&app_state, &user).await?;
    Ok(listed(c.trades.iter().map(TradeView::from).collect(), "Trades"))
}

/// `GET /api/companyadmins/getSchools`
pub async fn get_schools(State(app_state): State<AppState>, Extension(user): Extension<AuthUser>) -> Listed<SchoolView> {
    let c = tenant_collections(&app_state, &user).await?;

    let trade_names: HashMap<&EntityId, &str> = c.trades.iter().map(|t| (&t.id, t.name.as_str())).collect();
    let mut offered: BTreeMap<&EntityId, Vec<RefView>> = BTreeMap::new();
    for st in &c.school_trades {
        let name = trade_names.get(&st.trade_id).copied().unwrap_or_default();
        offered.entry(&st.school_id).or_default().push(RefView::new(&st.trade_id, name));
    }

    let items = with_index(&c, |index| {
        c.schools
            .iter()
            .map(|s| SchoolView::new(s, index, offered.get(&s.id).cloned().unwrap_or_default()))
            .collect()
    })?;
    Ok(listed(items, "Schools"))
}

/// `GET /api/companyadmins/getTrainers`
pub async fn get_trainers(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Listed<TrainerView> {
    let c = tenant_collections(&app_state, &user).await?;
    let schools: HashMap<String, String> = c.schools.iter().map(|s| (s.id.to_string(), s.name.clone())).collect();
    let trades: HashMap<String, String> = c.trades.iter().map(|t| (t.id.to_string(), t.name.clone())).collect();
    Ok(listed(
        c.trainers.iter().map(|t| TrainerView::new(t, &schools, &trades)).collect(),
        "Trainers",
    ))
}
