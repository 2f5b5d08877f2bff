use common::logger::init_logging;
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use std::{net::SocketAddr, process};
use tracing::{error, info};
use util::{config, state::AppState};

#[tokio::main]
async fn main() {
    let _log_guard = init_logging(&config::log_file(), &config::log_level(), config::log_to_stdout());

    if config::jwt_secret().trim().is_empty() {
        error!("JWT_SECRET must be set");
        eprintln!("JWT_SECRET must be set");
        process::exit(1);
    }

    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, path = %config::database_path(), "database connection failed");
            process::exit(1);
        }
    };
    if let Err(e) = Migrator::up(&db, None).await {
        error!(error = %e, "applying migrations failed");
        process::exit(1);
    }

    let app = api::app(AppState::new(db));

    let addr: SocketAddr = match format!("{}:{}", config::host(), config::port()).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, host = %config::host(), port = config::port(), "invalid listen address");
            process::exit(1);
        }
    };

    println!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );
    info!(%addr, env = %config::env(), "server starting");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "failed to bind");
            process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await {
        error!(error = %e, "server stopped");
        process::exit(1);
    }
}
