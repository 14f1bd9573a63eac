//! Axum server wiring for the CareFind JSON API.
//!
//! Routes, shared state, and startup. The search service is constructed
//! once at startup from explicit configuration and injected through
//! `AppState`; nothing oracle-related lives in process globals.

use std::sync::Arc;

use axum::Router;
use axum::response::Redirect;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use carefind_core::OracleConfig;
use carefind_search::PackageSearchService;

use crate::handlers::{api_health, api_search};

/// Shared application state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// The package search service, including its oracle provider.
    pub search_service: Arc<PackageSearchService>,
    /// Server start time, reported by the health endpoint.
    pub server_started_at: std::time::Instant,
}

impl AppState {
    /// State wrapping an existing search service.
    pub fn new(search_service: PackageSearchService) -> Self {
        Self {
            search_service: Arc::new(search_service),
            server_started_at: std::time::Instant::now(),
        }
    }
}

/// Build the API router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        // The search page lives under /static; the root serves it.
        .route("/", get(index))
        // JSON API endpoints; /search is kept as an alias for callers of
        // the original front end.
        .route("/search", post(api_search))
        .route("/api/search", post(api_search))
        .route("/api/health", get(api_health))
        // Static front-end assets
        .nest_service("/static", ServeDir::new("carefind-web/static"))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Redirect {
    Redirect::permanent("/static/index.html")
}

/// Start the web server and serve until shutdown.
///
/// With `demo` set, the canned demo provider is used and no oracle
/// configuration is required; otherwise `config` must be present.
///
/// # Errors
/// Returns an error when the search service cannot be constructed or the
/// listener fails to bind.
pub async fn run_server(
    config: Option<OracleConfig>,
    host: &str,
    port: u16,
    demo: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let search_service = if demo {
        PackageSearchService::new_demo()
    } else {
        let config = config.ok_or("oracle configuration is required outside demo mode")?;
        PackageSearchService::new(config)?
    };

    let state = AppState::new(search_service);
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, demo, "carefind web server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
