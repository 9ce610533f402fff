//! FlexTeam Backend
//!
//! REST backend for tracking where a team works each day, with SQLite
//! persistence and AI-assisted remote-work rotations.

mod api;
mod auth;
mod calendar;
mod config;
mod db;
mod errors;
mod models;
mod rotation;
mod stats;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::Repository;
use models::Roster;
use rotation::{BusyFlag, GeminiClient, RotationProvider};
use store::ScheduleStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ScheduleStore>,
    pub rotation: Arc<dyn RotationProvider>,
    pub rotation_busy: Arc<BusyFlag>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting FlexTeam Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Storage key: {}", config.storage_key);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (FLEXTEAM_API_PSK). Authentication is disabled!");
    }
    if config.gemini.api_key.is_none() {
        tracing::warn!("No GEMINI_API_KEY configured. Auto-scheduling will fail until one is set");
    }

    let roster = Arc::new(Roster::load(config.roster_path.as_deref()).await?);
    tracing::info!("Roster loaded with {} employees", roster.len());

    // Initialize database and load the schedule blob
    let pool = db::init_database(&config.db_path).await?;
    let repo = Repository::new(pool);
    let store = Arc::new(ScheduleStore::load(repo, roster, &config.storage_key).await?);

    let state = AppState {
        store,
        rotation: Arc::new(GeminiClient::new(&config.gemini)),
        rotation_busy: Arc::new(BusyFlag::default()),
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/revision", get(api::get_revision))
        // Roster
        .route("/employees", get(api::list_employees))
        .route("/employees/{id}", get(api::get_employee))
        .route("/statuses", get(api::list_statuses))
        // Schedules
        .route("/schedules", get(api::list_schedules))
        .route("/schedules/clear", post(api::clear_schedules))
        .route(
            "/schedules/{employee_id}/{date}",
            get(api::get_status).put(api::set_status),
        )
        .route(
            "/schedules/{employee_id}/{date}/toggle",
            post(api::toggle_status),
        )
        // Calendar
        .route("/calendar", get(api::get_calendar))
        .route("/calendar/navigate", post(api::navigate_calendar))
        // Statistics
        .route("/statistics", get(api::get_statistics))
        // Rotation
        .route("/rotation", post(api::generate_rotation_schedule))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_psk,
        ));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
