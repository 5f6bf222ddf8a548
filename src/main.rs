//! GatherLog Backend
//!
//! A REST backend for tracking event attendance, with SQLite persistence
//! and a pure in-memory join/aggregation core.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod transfer;
mod views;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GatherLog Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState { repo };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/revision", get(api::get_revision))
        // Events
        .route("/events", get(api::list_events))
        .route("/events", post(api::create_event))
        .route("/events/{id}", get(api::get_event))
        .route("/events/{id}", put(api::replace_event))
        .route("/events/{id}", delete(api::delete_event))
        .route("/events/{id}/opportunities", get(api::list_event_opportunities))
        // Opportunities
        .route("/opportunities", get(api::list_opportunities))
        .route("/opportunities", post(api::create_opportunity))
        .route("/opportunities/{id}", get(api::get_opportunity))
        .route("/opportunities/{id}", put(api::replace_opportunity))
        .route("/opportunities/{id}", delete(api::delete_opportunity))
        // Participants
        .route("/participants", get(api::list_participants))
        .route("/participants", post(api::create_participant))
        .route("/participants/summary", get(api::participant_summary))
        .route("/participants/by-name/{name}", get(api::participant_attendance))
        .route("/participants/{id}", get(api::get_participant))
        .route("/participants/{id}", put(api::replace_participant))
        .route("/participants/{id}", delete(api::delete_participant))
        // CSV transfer
        .route("/export/{kind}", get(api::export_csv))
        .route("/import/{kind}", post(api::import_csv));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
