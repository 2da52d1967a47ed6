//! Top-level application router.

use std::path::PathBuf;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::billing::{billing_router, BillingAppState};
use super::meditation::{meditation_router, MeditationAppState};

/// Everything the router needs besides the per-module states.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Directory served under `/audio`; not mounted when `None`.
    pub audio_dir: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            audio_dir: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Builds the complete application.
///
/// # Routes
/// - `GET /health`
/// - `/api/...` - billing and meditation endpoints
/// - `GET /audio/...` - stored meditation audio
pub fn app_router(
    billing: BillingAppState,
    meditation: MeditationAppState,
    options: RouterOptions,
) -> Router {
    let api = billing_router()
        .with_state(billing)
        .merge(meditation_router().with_state(meditation));

    let mut app = Router::new()
        .route("/health", get(health))
        .nest("/api", api);

    if let Some(dir) = options.audio_dir {
        app = app.nest_service("/audio", ServeDir::new(dir));
    }

    app.layer(TimeoutLayer::new(options.request_timeout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
