//! Prompt building for the generative fallback.
//!
//! The persona preamble is deliberately short: the prompt is left-truncated
//! to the context budget, so on oversized questions the preamble is the
//! first thing sacrificed.

/// Persona preamble prepended to every generation prompt.
pub const PERSONA_PREAMBLE: &str = "Eres Kazu_ia, un asistente amigable. Responde en español, de forma completa y natural, usando lenguaje cercano y coloquial.";

/// Cue marking where the assistant's turn begins.
pub const ASSISTANT_CUE: &str = "Kazu_ia:";

/// Substituted when the model produces no usable text.
pub const CLARIFICATION: &str = "No entendí bien, ¿puedes reformular?";

/// Model context window in tokens. Also sent as `num_ctx` so the backend
/// applies the real token-level truncation.
pub const MAX_CONTEXT_TOKENS: usize = 512;

/// Rough chars-per-token used for the pre-flight character cap.
const APPROX_CHARS_PER_TOKEN: usize = 4;

const MAX_PROMPT_CHARS: usize = MAX_CONTEXT_TOKENS * APPROX_CHARS_PER_TOKEN;

/// Build the role-conditioned prompt for a question.
pub fn build_prompt(question: &str) -> String {
    let prompt = format!("{PERSONA_PREAMBLE}\nUsuario: {question}\n{ASSISTANT_CUE}");
    truncate_prompt(prompt)
}

/// Keep the most recent `MAX_PROMPT_CHARS` characters, dropping the oldest.
fn truncate_prompt(prompt: String) -> String {
    if prompt.len() <= MAX_PROMPT_CHARS {
        return prompt;
    }

    let mut start = prompt.len() - MAX_PROMPT_CHARS;
    while !prompt.is_char_boundary(start) {
        start += 1;
    }
    prompt[start..].to_string()
}

/// Trim raw model output, removing an echoed prompt if present.
///
/// Returns `None` when nothing usable remains; the caller substitutes the
/// clarification message. Invocation failures are a distinct error and never
/// pass through here.
pub fn clean_generation(prompt: &str, raw: &str) -> Option<String> {
    let stripped = raw.strip_prefix(prompt).unwrap_or(raw);
    let text = stripped.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
