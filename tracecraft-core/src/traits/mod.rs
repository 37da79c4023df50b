//! Collaborator traits the core consumes but never implements itself.
//!
//! Per spec.md §1, the model client, the progress/logging sink, and the
//! budget accountant are external collaborators. Everything in this module
//! is an interface; concrete implementations live with the caller.

pub mod cancellation;
pub mod model_client;
pub mod progress;

pub use cancellation::CancellationToken;
pub use model_client::{ModelClient, ModelRequest, ModelResponse};
pub use progress::ProgressSink;
