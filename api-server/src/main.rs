//! Attrition API Server
//!
//! HTTP front end for the attrition engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ATTRITION API                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────┐  │
//! │  │  Router   │──▶│  Predictor   │   │  Engagement     │  │
//! │  │  (Axum)   │   │  (artifacts) │   │  Analyzer (LLM) │  │
//! │  └─────┬─────┘   └──────────────┘   └────────┬────────┘  │
//! │        └──────────────▶ Session Registry ◀───┘           │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod sessions;


use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attrition_core::logic::narrative::{EngagementAnalyzer, GeminiClient};
use attrition_core::AttritionPredictor;

pub use error::{AppError, AppResult};
use sessions::SessionRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "attrition_api=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    tracing::info!("Attrition API starting...");
    tracing::info!("Artifacts: {}", config.predictor.artifacts_dir.display());

    let predictor = AttritionPredictor::load(&config.predictor)
        .context("Failed to load prediction artifacts")?;

    let analyzer = match GeminiClient::from_env() {
        Some(client) => {
            tracing::info!("Narrative analysis enabled ({})", client.model());
            Some(EngagementAnalyzer::new(Arc::new(client), config.outputs_dir.clone()))
        }
        None => {
            if config.is_production() {
                tracing::warn!("GOOGLE_API_KEY not set in production; narrative endpoints disabled");
            } else {
                tracing::info!("GOOGLE_API_KEY not set; narrative endpoints disabled");
            }
            None
        }
    };

    // Build application state
    let state = AppState {
        predictor: Arc::new(predictor),
        analyzer,
        sessions: Arc::new(SessionRegistry::new(config.max_sessions)),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<AttritionPredictor>,
    pub analyzer: Option<EngagementAnalyzer>,
    pub sessions: Arc<SessionRegistry>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let prediction_routes = Router::new()
        .route("/api/v1/schema", get(handlers::predict::schema))
        .route("/api/v1/test-data/info", get(handlers::predict::test_data_info))
        .route("/api/v1/predict/test-row", post(handlers::predict::test_row))
        .route("/api/v1/predict/profile", post(handlers::predict::profile));

    let narrative_routes = Router::new()
        .route("/api/v1/llm/analyze", post(handlers::narrative::analyze))
        .route("/api/v1/llm/chat", post(handlers::narrative::chat))
        .route("/api/v1/pipeline", post(handlers::pipeline::run));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(prediction_routes)
        .merge(narrative_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
