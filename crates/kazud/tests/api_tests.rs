//! HTTP boundary tests for the listen endpoint.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use kazud::generator::Generator;
use kazud::resolver::ResponseResolver;
use kazud::rules::{IntentCategory, RuleMatcher, LOVE_POEM};
use kazud::server::{self, AppState};
use kazud::speech::SpeechEngine;
use kazu_common::{LearningStore, ResolveError};
use std::sync::Arc;
use tower::ServiceExt;

struct ScriptedGenerator {
    reply: Option<String>,
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, _question: &str) -> Result<String, ResolveError> {
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ResolveError::GenerationFailure("model offline".to_string())),
        }
    }
}

fn test_app(reply: Option<&str>) -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = LearningStore::open(&dir.path().join("kazu_memoria.db")).unwrap();
    let generator = Arc::new(ScriptedGenerator {
        reply: reply.map(str::to_string),
    });
    let resolver =
        ResponseResolver::new(RuleMatcher::with_seed(7), store.clone(), generator, false);
    let app = server::app(AppState::new(resolver, SpeechEngine::disabled(), store));
    (dir, app)
}

async fn post_listen(app: Router, body: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/escuchar")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_empty_message_is_client_error() {
    let (_dir, app) = test_app(Some("nunca"));
    let (status, json) = post_listen(app, r#"{"mensaje": ""}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No se recibió mensaje.");
}

#[tokio::test]
async fn test_missing_message_field_is_client_error() {
    let (_dir, app) = test_app(Some("nunca"));
    let (status, json) = post_listen(app, "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_identity_question_answers_from_category() {
    let (_dir, app) = test_app(Some("nunca"));
    let (status, json) = post_listen(app, r#"{"mensaje": "quien eres"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let respuesta = json["respuesta"].as_str().unwrap();
    assert!(IntentCategory::Identity.responses().contains(&respuesta));
}

#[tokio::test]
async fn test_poem_request_returns_fixed_literal() {
    let (_dir, app) = test_app(Some("nunca"));
    let (status, json) = post_listen(app, r#"{"mensaje": "dime un poema de amor"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["respuesta"], LOVE_POEM);
}

#[tokio::test]
async fn test_unmatched_question_uses_generator() {
    let (_dir, app) = test_app(Some("Tiene ocho planetas."));
    let (status, json) = post_listen(
        app,
        r#"{"mensaje": "cuántos planetas tiene el sistema solar"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["respuesta"], "Tiene ocho planetas.");
}

#[tokio::test]
async fn test_generation_failure_is_server_error() {
    let (_dir, app) = test_app(None);
    let (status, json) = post_listen(app, r#"{"mensaje": "pregunta sin regla"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("text generation failed"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = test_app(Some("nunca"));
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["learned_answers"], 0);
}
