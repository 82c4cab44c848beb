//! HTTP server for kazud.

use crate::resolver::ResponseResolver;
use crate::routes;
use crate::speech::SpeechEngine;
use anyhow::Result;
use axum::Router;
use kazu_common::LearningStore;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
pub struct AppState {
    pub resolver: ResponseResolver,
    pub speech: SpeechEngine,
    /// Shares the resolver's connection; read by the health endpoint.
    pub store: LearningStore,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(resolver: ResponseResolver, speech: SpeechEngine, store: LearningStore) -> Self {
        Self {
            resolver,
            speech,
            store,
            start_time: Instant::now(),
        }
    }
}

/// Build the router. Exposed separately so tests can drive it directly.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::chat_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server.
pub async fn run(state: AppState, bind: &str) -> Result<()> {
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("  Listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}
