mod config;
mod game;
mod models;
mod routes;
mod websocket;

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{routing::get, Router};
use chrono::Utc;
use config::Config;
use dashmap::DashMap;
use game::GridEngine;
use models::{GamePhase, SessionSummary};
use rand::Rng;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Application state shared across all handlers
pub struct AppState {
    pub config: Config,
    /// Live game sessions keyed by session id
    pub sessions: DashMap<Uuid, SessionSummary>,
    /// Best score seen by any session since the process started
    high_score: AtomicU32,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
            high_score: AtomicU32::new(0),
        }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.load(Ordering::Relaxed)
    }

    /// Refresh the registry entry for a session and fold its best score into
    /// the process-wide record
    pub fn record_session<R: Rng>(&self, session_id: Uuid, engine: &GridEngine<R>) {
        self.high_score
            .fetch_max(engine.high_score(), Ordering::Relaxed);

        if let Some(mut summary) = self.sessions.get_mut(&session_id) {
            summary.mode = (engine.phase() != GamePhase::Menu).then(|| engine.mode());
            summary.phase = engine.phase();
            summary.score = engine.score();
            summary.level = engine.level();
            summary.updated_at = Utc::now();
        }
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Serve frontend static files
    let frontend_service = ServeDir::new(&state.config.server.frontend_dir);

    Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket::handle_websocket))
        // API routes
        .merge(routes::create_routes())
        .fallback_service(frontend_service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sum_stack_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sum Stack backend server...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        "Configuration loaded: {}x{} grid, {} starting rows, {}s time limit",
        config.game.rows,
        config.game.cols,
        config.game.initial_rows,
        config.game.time_limit_secs
    );

    let state = Arc::new(AppState::new(config.clone()));
    let app = create_app(state);

    // Start server
    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("WebSocket endpoint: ws://{}/ws", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
