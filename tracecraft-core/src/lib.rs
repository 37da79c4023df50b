//! # tracecraft-core
//!
//! Foundation crate for the Tracecraft instrumentation engine.
//! Defines the types, identifiers, errors, config, and collaborator traits
//! every other `tracecraft-*` crate depends on. Nothing here reaches out to
//! a model provider, a filesystem cache, or a subprocess — those are the
//! concrete concerns of the crates built on top.

pub mod config;
pub mod errors;
pub mod traits;
pub mod types;

pub use config::OrchestratorConfig;
pub use errors::error_code::ErrorCode;
pub use traits::cancellation::CancellationToken;
pub use traits::model_client::{ModelClient, ModelRequest, ModelResponse};
pub use types::language::Language;
