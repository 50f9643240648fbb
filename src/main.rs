//! Rollcall Backend
//!
//! REST backend for the classroom roll call application, with SQLite
//! persistence and an in-memory roll session.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod roll;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use roll::RollSession;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub roll: Arc<RollSession>,
    pub config: Arc<Config>,
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

    tracing::info!("Starting Rollcall Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (ROLLCALL_API_PSK). Authentication is disabled!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        roll: Arc::new(RollSession::new()),
        config: Arc::new(config.clone()),
    };

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

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Groups
        .route("/groups", get(api::list_groups))
        .route("/groups", post(api::create_group))
        .route("/groups/{id}", get(api::get_group))
        .route("/groups/{id}", put(api::update_group))
        .route("/groups/{id}", delete(api::delete_group))
        .route("/groups/{id}/students", get(api::list_group_members))
        // Group-student memberships
        .route("/group-students", post(api::add_group_student))
        .route("/group-students/batch", post(api::add_group_students))
        .route("/group-students/{id}", delete(api::delete_group_student))
        // Students
        .route("/students", get(api::list_students))
        .route("/students", post(api::create_student))
        .route("/students/{id}", get(api::get_student))
        .route("/students/{id}", put(api::update_student))
        .route("/students/{id}", delete(api::delete_student))
        // Homeboard
        .route("/homeboard/students", get(api::get_homeboard_students))
        // Roll session
        .route("/roll/start", post(api::start_roll))
        .route("/roll/mark", post(api::mark_student))
        .route("/roll/summary", get(api::get_roll_summary))
        .route("/roll/complete", post(api::complete_roll))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
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

#[cfg(test)]
mod tests;
