pub mod auth;
pub mod response;
pub mod routes;

use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware::from_fn,
};
use tower_http::cors::CorsLayer;
use util::state::AppState;

use crate::auth::middleware::log_request;
use crate::routes::routes;

/// The complete application: `/api` routes, request logging and CORS.
pub fn app(app_state: AppState) -> Router {
    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes(app_state))
        .layer(from_fn(log_request))
        .layer(cors)
}
