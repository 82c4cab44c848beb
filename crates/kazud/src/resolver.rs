//! Response resolution - rules, then learned answers, then generation.
//!
//! The tier order is fixed: curated rule answers are authoritative persona
//! responses and always win; the learned-answer store is consulted next so
//! previously accepted answers skip generation; the model is the last
//! resort. Store failures never abort a resolution.

use crate::generator::Generator;
use crate::prompts;
use crate::rules::RuleMatcher;
use kazu_common::{LearningStore, ResolveError};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ResponseResolver {
    rules: RuleMatcher,
    store: LearningStore,
    generator: Arc<dyn Generator>,
    persist_generated: bool,
}

impl ResponseResolver {
    pub fn new(
        rules: RuleMatcher,
        store: LearningStore,
        generator: Arc<dyn Generator>,
        persist_generated: bool,
    ) -> Self {
        Self {
            rules,
            store,
            generator,
            persist_generated,
        }
    }

    /// Resolve a message to exactly one non-empty answer.
    pub async fn resolve(&self, message: &str) -> Result<String, ResolveError> {
        let question = message.trim();
        if question.is_empty() {
            return Err(ResolveError::EmptyInput);
        }
        let key = question.to_lowercase();

        if let Some(answer) = self.rules.match_utterance(&key) {
            debug!("Answered from rule table");
            return Ok(answer);
        }

        match self.store.lookup(&key) {
            Ok(Some(answer)) => {
                debug!("Answered from learning store");
                return Ok(answer);
            }
            Ok(None) => {}
            Err(e) => warn!("Learning store lookup failed, treating as miss: {}", e),
        }

        let answer = self.generator.generate(question).await?;

        // Never learn the clarification fallback: it is a substitute, not an
        // accepted answer, and storing it would pin the question away from
        // generation forever.
        if self.persist_generated && answer != prompts::CLARIFICATION {
            if let Err(e) = self.store.remember(&key, &answer) {
                warn!("Learning store write skipped: {}", e);
            }
        }

        Ok(answer)
    }
}
