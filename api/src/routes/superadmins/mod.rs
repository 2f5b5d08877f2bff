//! `/superadmins`: platform owner endpoints.
//!
//! - `POST /superadmins/login` (public)
//! - `POST /superadmins/companies` registers a tenant and its admin login
//! - `GET /superadmins/companies` lists tenants with their statistics

pub mod get;
pub mod post;

use axum::{Router, middleware::from_fn, routing::post as post_route};
use util::state::AppState;

use crate::auth::guards::allow_super_admin;
use crate::routes::auth::super_admin_login;

pub fn superadmin_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/companies", post_route(post::create_company).get(get::list_companies))
        .route_layer(from_fn(allow_super_admin));

    Router::new()
        .route("/login", post_route(super_admin_login))
        .merge(protected)
}
