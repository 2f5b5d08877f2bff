//! `/trainers`: a trainer's own profile and attendance.
//!
//! The login lives at `/management/trainers/login`; everything here requires a
//! trainer token and acts on the trainer linked to it.

pub mod get;
pub mod post;

use axum::{
    Router,
    http::StatusCode,
    middleware::from_fn,
    routing::{get as get_route, post as post_route},
};
use db::models::trainer;
use sea_orm::DatabaseConnection;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::auth::guards::allow_trainer;
use crate::response::{Failure, failure, internal};

pub fn trainer_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get_route(get::me))
        .route("/calendar", get_route(get::calendar))
        .route("/summary", get_route(get::summary))
        .route("/mark-daily-status", post_route(post::mark_daily_status))
        .route("/check-out", post_route(post::check_out))
        .route_layer(from_fn(allow_trainer))
}

/// The trainer record behind the token, `404` if the login has none.
pub(crate) async fn current_trainer(db: &DatabaseConnection, user: &AuthUser) -> Result<trainer::Model, Failure> {
    trainer::Model::find_by_user(db, user.0.sub)
        .await
        .map_err(internal)?
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Trainer profile not found"))
}
