//! Shared types for the Kazu assistant.

pub mod error;
pub mod learning;

pub use error::ResolveError;
pub use learning::LearningStore;
