use axum::{Extension, Json, extract::State, http::StatusCode};
use common::format_validation_errors;
use db::models::{block, district, state, trade};
use db::registration::{
    RegistrationError, SchoolRegistration, TradeRegistration, TrainerRegistration, register_school,
};
use hierarchy::Location;
use hierarchy::model::GeoPoint;
use serde::{Deserialize, Serialize};
use tracing::info;
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, Failure, failure, internal};
use crate::routes::common::{RefView, parse_ref, tenant_of};

lazy_static::lazy_static! {
    static ref PINCODE_REGEX: regex::Regex = regex::Regex::new(r"^\d{6}$").unwrap();
    static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^\+?\d{10,13}$").unwrap();
}

type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), Failure>;

fn validated<T: Validate>(req: &T) -> Result<(), Failure> {
    req.validate()
        .map_err(|errors| failure(StatusCode::BAD_REQUEST, format_validation_errors(&errors)))
}

fn location_of(point: Option<GeoPoint>) -> Result<Option<Location>, Failure> {
    point
        .map(Location::try_from)
        .transpose()
        .map_err(|e| failure(StatusCode::BAD_REQUEST, format!("Invalid location: {e}")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

fn created<T: Serialize>(data: T, what: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(data, format!("{what} registered successfully"))),
    )
}

#[derive(Debug, Deserialize, Validate)]
pub struct StateRequest {
    #[validate(length(min = 1, max = 100, message = "State name is required"))]
    pub name: String,
}

/// `POST /api/companyadmins/states`. `409` when the tenant already has a state of that name.
pub async fn create_state(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<StateRequest>,
) -> Created<Registered> {
    validated(&req)?;
    let company_id = tenant_of(&user)?;
    let db = app_state.db();

    if state::Model::find_by_name(db, company_id, &req.name).await.map_err(internal)?.is_some() {
        return Err(failure(StatusCode::CONFLICT, "State already exists"));
    }
    let row = state::Model::create(db, company_id, &req.name).await.map_err(internal)?;
    info!(company_id, state = row.id, "state registered");
    Ok(created(Registered { id: row.id.to_string(), name: row.name }, "State"))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DistrictRequest {
    #[validate(length(min = 1, max = 100, message = "District name is required"))]
    pub name: String,
    pub state_id: String,
}

/// `POST /api/companyadmins/districts`. The state must belong to the caller's tenant.
pub async fn create_district(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<DistrictRequest>,
) -> Created<Registered> {
    validated(&req)?;
    let company_id = tenant_of(&user)?;
    let state_id = parse_ref("stateId", &req.state_id, "State")?;
    let db = app_state.db();

    if state::Model::find_in_company(db, company_id, state_id).await.map_err(internal)?.is_none() {
        return Err(failure(StatusCode::NOT_FOUND, "State not found"));
    }
    let row = district::Model::create(db, company_id, state_id, &req.name).await.map_err(internal)?;
    info!(company_id, district = row.id, state_id, "district registered");
    Ok(created(Registered { id: row.id.to_string(), name: row.name }, "District"))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    #[validate(length(min = 1, max = 100, message = "Block name is required"))]
    pub name: String,
    pub district_id: String,
    #[validate(regex(path = *PINCODE_REGEX, message = "Pincode must be 6 digits"))]
    pub pincode: String,
}

/// `POST /api/companyadmins/blocks`
pub async fn create_block(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<BlockRequest>,
) -> Created<Registered> {
    validated(&req)?;
    let company_id = tenant_of(&user)?;
    let district_id = parse_ref("districtId", &req.district_id, "District")?;
    let db = app_state.db();

    if district::Model::find_in_company(db, company_id, district_id).await.map_err(internal)?.is_none() {
        return Err(failure(StatusCode::NOT_FOUND, "District not found"));
    }
    let row = block::Model::create(db, company_id, district_id, &req.name, &req.pincode)
        .await
        .map_err(internal)?;
    info!(company_id, block = row.id, district_id, "block registered");
    Ok(created(Registered { id: row.id.to_string(), name: row.name }, "Block"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct TradeRequest {
    #[validate(length(min = 1, max = 100, message = "Trade name is required"))]
    pub name: String,
    #[serde(default)]
    pub category: String,
}

/// `POST /api/companyadmins/trades`
pub async fn create_trade(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<TradeRequest>,
) -> Created<Registered> {
    validated(&req)?;
    let company_id = tenant_of(&user)?;
    let row = trade::Model::create(app_state.db(), company_id, &req.name, &req.category)
        .await
        .map_err(internal)?;
    info!(company_id, trade = row.id, "trade registered");
    Ok(created(Registered { id: row.id.to_string(), name: row.name }, "Trade"))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainerPayload {
    #[validate(length(min = 1, message = "Trainer name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid trainer email"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 10 to 13 digits"))]
    pub phone: String,
    #[validate(length(min = 8, message = "Trainer password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TradePayload {
    pub trade_id: String,
    #[serde(default)]
    #[validate(nested)]
    pub trainers: Vec<TrainerPayload>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRequest {
    #[validate(length(min = 1, max = 64, message = "School UID is required"))]
    pub uid: String,
    #[validate(length(min = 1, max = 200, message = "School name is required"))]
    pub name: String,
    pub block_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    #[validate(nested)]
    pub trades: Vec<TradePayload>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolRegistered {
    #[serde(rename = "_id")]
    pub id: String,
    pub uid: String,
    pub name: String,
    pub trades: Vec<String>,
    pub trainers: Vec<RefView>,
}

/// `POST /api/companyadmins/schools`
///
/// Registers one school with its trades and a login per trainer. The block and
/// every trade must belong to the caller's tenant (`404`); a taken UID or
/// trainer email is `409`. Nothing is stored unless the whole batch succeeds.
pub async fn create_school(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SchoolRequest>,
) -> Created<SchoolRegistered> {
    validated(&req)?;
    let company_id = tenant_of(&user)?;

    let mut trades = Vec::with_capacity(req.trades.len());
    for t in req.trades {
        let mut trainers = Vec::with_capacity(t.trainers.len());
        for tr in t.trainers {
            trainers.push(TrainerRegistration {
                location: location_of(tr.location)?,
                full_name: tr.full_name,
                email: tr.email,
                phone: tr.phone,
                password: tr.password,
            });
        }
        trades.push(TradeRegistration {
            trade_id: parse_ref("tradeId", &t.trade_id, "Trade")?,
            trainers,
        });
    }

    let registration = SchoolRegistration {
        block_id: parse_ref("blockId", &req.block_id, "Block")?,
        location: location_of(req.location)?,
        uid: req.uid,
        name: req.name,
        address: req.address,
        trades,
    };

    let done = register_school(app_state.db(), company_id, registration)
        .await
        .map_err(|e| match e {
            RegistrationError::UnknownBlock(_) => failure(StatusCode::NOT_FOUND, "Block not found"),
            RegistrationError::UnknownTrade(id) => failure(StatusCode::NOT_FOUND, format!("Trade {id} not found")),
            RegistrationError::DuplicateSchool(_) | RegistrationError::DuplicateEmail(_) => {
                failure(StatusCode::CONFLICT, e.to_string())
            }
            RegistrationError::Db(db_err) => internal(db_err),
        })?;

    Ok(created(
        SchoolRegistered {
            id: done.school.id.to_string(),
            uid: done.school.uid,
            name: done.school.name,
            trades: done.trade_ids.iter().map(i64::to_string).collect(),
            trainers: done
                .trainers
                .into_iter()
                .map(|t| RefView::new(t.id, t.full_name))
                .collect(),
        },
        "School",
    ))
}
