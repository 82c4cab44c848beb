//! Kazu daemon library - exposes modules for testing.

pub mod config;
pub mod generator;
pub mod prompts;
pub mod resolver;
pub mod routes;
pub mod rules;
pub mod server;
pub mod speech;
