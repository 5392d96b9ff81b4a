//! # EcoPulse Backend
//!
//! Sustainability tracking service behind the mobile app.
//!
//! ## Surface
//! - Recycling center discovery, distance-ranked around the caller.
//! - Per-user waste and carbon logging, append-only.
//! - Personalized recommendations derived from recent history.
//! - Admin lifecycle for recycling centers.
//!
//! ## Infrastructure
//! - Redis holds every document; see [`database`] for the key layout.
//! - Callers authenticate with an `x-auth-token` header; see [`auth`].
//! - Configuration comes from environment variables and `/run/secrets`.
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::{get, post, put},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod analyze;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod geo;
pub mod models;
pub mod recommend;
pub mod routes;
pub mod state;

use routes::{
    admin_centers_handler, carbon_by_mode_handler, carbon_logs_handler, centers_handler,
    create_center_handler, delete_center_handler, log_carbon_handler, log_waste_handler,
    recommendations_handler, schedules_handler, update_center_handler, waste_logs_handler,
};
use state::AppState;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(auth::TOKEN_HEADER)])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/api/recycling-centers", get(centers_handler))
        .route("/api/recommendations", get(recommendations_handler))
        .route("/api/waste/log", post(log_waste_handler))
        .route("/api/waste/logs", get(waste_logs_handler))
        .route("/api/waste/collection-schedules", get(schedules_handler))
        .route("/api/carbon/log", post(log_carbon_handler))
        .route("/api/carbon/logs", get(carbon_logs_handler))
        .route("/api/carbon/by-mode", get(carbon_by_mode_handler))
        .route(
            "/api/admin/recycling-centers",
            post(create_center_handler).get(admin_centers_handler),
        )
        .route(
            "/api/admin/recycling-centers/{id}",
            put(update_center_handler).delete(delete_center_handler),
        )
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
