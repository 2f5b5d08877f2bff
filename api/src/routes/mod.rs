//! HTTP route entry point for `/api/...`.
//!
//! - `/health` → liveness probe (public)
//! - `/superadmins` → platform owner: login, tenant registration and overview
//! - `/companyadmins` → tenant administration: hierarchy registration, lists, dashboard, export
//! - `/management/trainers/login` → trainer login (public)
//! - `/trainers` → a trainer's profile, calendar and attendance actions

use axum::{Router, routing::post};
use util::state::AppState;

use crate::routes::{
    auth::trainer_login, companyadmins::companyadmin_routes, health::health_routes,
    superadmins::superadmin_routes, trainers::trainer_routes,
};

pub mod auth;
pub mod common;
pub mod companyadmins;
pub mod health;
pub mod superadmins;
pub mod trainers;

/// Builds the router mounted under `/api`. Role guards are applied per group.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/superadmins", superadmin_routes())
        .nest("/companyadmins", companyadmin_routes())
        .route("/management/trainers/login", post(trainer_login))
        .nest("/trainers", trainer_routes())
        .with_state(app_state)
}
