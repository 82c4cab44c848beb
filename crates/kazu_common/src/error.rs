//! Error kinds for the response resolution path.
//!
//! The HTTP boundary translates these to status codes: `EmptyInput` is a
//! client error, `GenerationFailure` a server error. `StoreUnavailable` is
//! recovered inside the resolver as a cache miss / skipped write and only
//! reaches callers of the store itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The inbound message was missing or blank.
    #[error("No se recibió mensaje.")]
    EmptyInput,

    /// The learning store could not be read or written.
    #[error("learning store unavailable: {0}")]
    StoreUnavailable(String),

    /// The language model invocation failed. Distinct from the legitimate
    /// empty-output case, which is substituted with a clarification message.
    #[error("text generation failed: {0}")]
    GenerationFailure(String),
}
