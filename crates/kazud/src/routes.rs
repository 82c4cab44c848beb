//! API routes for kazud.
//!
//! The listen endpoint mirrors the public contract: a JSON body with a
//! required non-empty `mensaje`, answered with `{"respuesta": ...}` or an
//! `{"error": ...}` payload.

use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use kazu_common::ResolveError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct ListenRequest {
    #[serde(default)]
    pub mensaje: String,
}

#[derive(Debug, Serialize)]
pub struct ListenResponse {
    pub respuesta: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub learned_answers: usize,
}

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new().route("/api/escuchar", post(listen))
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn listen(
    State(state): State<AppStateArc>,
    Json(req): Json<ListenRequest>,
) -> Result<Json<ListenResponse>, (StatusCode, Json<ErrorResponse>)> {
    if req.mensaje.trim().is_empty() {
        return Err(client_error(ResolveError::EmptyInput));
    }

    info!("  Resolving message ({} chars)", req.mensaje.len());

    match state.resolver.resolve(&req.mensaje).await {
        Ok(respuesta) => {
            state.speech.speak(&respuesta);
            Ok(Json(ListenResponse { respuesta }))
        }
        Err(e @ ResolveError::EmptyInput) => Err(client_error(e)),
        Err(e) => {
            error!("  Resolution failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

fn client_error(e: ResolveError) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        learned_answers: state.store.learned_count().unwrap_or(0),
    })
}
