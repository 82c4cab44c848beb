//! Predefined rule matching - authoritative persona answers.
//!
//! Checked before the learned-answer store and the generative fallback, so
//! curated responses always win over anything learned or sampled.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Fixed literal for the love-poem trigger. Never randomized.
pub const LOVE_POEM: &str = "El amor es un fuego que arde sin verse...";

const LOVE_POEM_TRIGGER: &str = "dime un poema de amor";

/// Intent categories with curated response variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    /// Greeting: hola/buenas/saludos
    Greeting,
    /// Well-being question: cómo estás / qué tal
    HowAreYou,
    /// Identity question: quién eres
    Identity,
    /// Reciprocating a "bien, ¿y tú?" from the user
    WellBeingReply,
    /// Joke request: broma/chiste
    Joke,
}

impl std::fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Greeting => "greeting",
            Self::HowAreYou => "how_are_you",
            Self::Identity => "identity",
            Self::WellBeingReply => "well_being_reply",
            Self::Joke => "joke",
        };
        write!(f, "{}", s)
    }
}

impl IntentCategory {
    /// Candidate responses for this category. Non-empty, fixed at compile
    /// time; one is picked uniformly at random per match.
    pub fn responses(&self) -> &'static [&'static str] {
        match self {
            Self::Greeting => &[
                "¡Hola, mi pana! ¿Cómo estás?",
                "¡Buenas! ¿Qué tal todo?",
            ],
            Self::HowAreYou => &[
                "Estoy pilas, gracias por preguntar.",
                "Todo chévere por aquí, ¿y tú?",
            ],
            Self::Identity => &[
                "Soy Kazu_ia, tu asistente inteligente.",
                "Soy Kazu_ia, tu asistente ecuatoriano.",
            ],
            Self::WellBeingReply => &[
                "¡Me alegra! Yo también estoy bien, mi pana.",
                "Contento de hablar contigo.",
            ],
            Self::Joke => &[
                "¿Por qué los programadores confunden Halloween con Navidad? OCT 31 = DEC 25.",
            ],
        }
    }
}

/// Outcome of a rule-table hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleHit {
    Category(IntentCategory),
    /// Fixed text for specific exact triggers; bypasses random selection.
    Literal(&'static str),
}

/// Classify an utterance against the ordered rule table.
///
/// Case-insensitive substring containment; the first matching rule wins, so
/// earlier rules shadow later ones with overlapping triggers.
pub fn classify_utterance(utterance: &str) -> Option<RuleHit> {
    let q = utterance.to_lowercase();

    // Identity first (checked before everything else in the original flow)
    if q.contains("quién eres") || q.contains("quien eres") {
        return Some(RuleHit::Category(IntentCategory::Identity));
    }

    if q.contains(LOVE_POEM_TRIGGER) {
        return Some(RuleHit::Literal(LOVE_POEM));
    }

    if q.contains("cómo estás")
        || q.contains("como estas")
        || q.contains("qué tal")
        || q.contains("que tal")
    {
        return Some(RuleHit::Category(IntentCategory::HowAreYou));
    }

    // "estoy bien, ¿y tú?" - before the greeting check so a leading "hola"
    // in earlier turns does not swallow it
    if q.contains("bien") && (q.contains("y tú") || q.contains("y tu")) {
        return Some(RuleHit::Category(IntentCategory::WellBeingReply));
    }

    if q.contains("hola")
        || q.contains("buenas")
        || q.contains("buenos días")
        || q.contains("buenos dias")
        || q.contains("saludos")
    {
        return Some(RuleHit::Category(IntentCategory::Greeting));
    }

    if q.contains("broma") || q.contains("chiste") {
        return Some(RuleHit::Category(IntentCategory::Joke));
    }

    None
}

/// Rule matcher with a seedable random source for variant selection.
pub struct RuleMatcher {
    rng: Mutex<StdRng>,
}

impl RuleMatcher {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic matcher for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Match a normalized utterance, returning a canned answer on a hit and
    /// nothing when the next tier should be consulted.
    pub fn match_utterance(&self, utterance: &str) -> Option<String> {
        match classify_utterance(utterance)? {
            RuleHit::Literal(text) => Some(text.to_string()),
            RuleHit::Category(category) => {
                let candidates = category.responses();
                let idx = self.rng.lock().unwrap().gen_range(0..candidates.len());
                Some(candidates[idx].to_string())
            }
        }
    }
}

impl Default for RuleMatcher {
    fn default() -> Self {
        Self::new()
    }
}
