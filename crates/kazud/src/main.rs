//! Kazu daemon - assistant HTTP service.
//!
//! Resolves free-text questions through predefined rules, learned answers,
//! and a generative fallback, speaking each answer aloud.

use anyhow::Result;
use kazud::config::KazuConfig;
use kazud::generator::OllamaGenerator;
use kazud::resolver::ResponseResolver;
use kazud::rules::RuleMatcher;
use kazud::server::{self, AppState};
use kazud::speech::SpeechEngine;
use kazu_common::LearningStore;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Kazu daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = KazuConfig::load();

    let store = match &config.memory.db_path {
        Some(path) => LearningStore::open(path)?,
        None => LearningStore::open_default()?,
    };

    let generator = Arc::new(OllamaGenerator::new(
        &config.llm.model,
        config.llm.timeout_secs,
    )?);
    let resolver = ResponseResolver::new(
        RuleMatcher::new(),
        store.clone(),
        generator,
        config.memory.persist_generated,
    );
    let speech = SpeechEngine::new(config.voice.enabled, &config.voice.voice, config.voice.rate);

    info!("Kazu daemon ready");
    server::run(AppState::new(resolver, speech, store), &config.server.bind).await
}
