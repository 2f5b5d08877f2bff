//! `/companyadmins`: tenant administration.
//!
//! Registration endpoints create one hierarchy level at a time; list endpoints
//! return the tenant's records in wire shape; `dashboard` and `export` run the
//! filter engine over the tenant's collections. Every route except `login`
//! requires a company-admin token and is scoped to its `companyId`.

pub mod dashboard;
pub mod get;
pub mod post;
pub mod views;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get as get_route, post as post_route},
};
use util::state::AppState;

use crate::auth::guards::allow_company_admin;
use crate::routes::auth::company_admin_login;

pub fn companyadmin_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/states", post_route(post::create_state))
        .route("/districts", post_route(post::create_district))
        .route("/blocks", post_route(post::create_block))
        .route("/trades", post_route(post::create_trade))
        .route("/schools", post_route(post::create_school))
        .route("/getStates", get_route(get::get_states))
        .route("/getDistricts", get_route(get::get_districts))
        .route("/getBlocks", get_route(get::get_blocks))
        .route("/getTrades", get_route(get::get_trades))
        .route("/getSchools", get_route(get::get_schools))
        .route("/getTrainers", get_route(get::get_trainers))
        .route("/dashboard", get_route(dashboard::dashboard))
        .route("/export", get_route(dashboard::export_csv))
        .route_layer(from_fn(allow_company_admin));

    Router::new()
        .route("/login", post_route(company_admin_login))
        .merge(protected)
}
