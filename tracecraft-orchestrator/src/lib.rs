//! # tracecraft-orchestrator
//!
//! C8 Retry Orchestrator: the sole public entry point, `process_file`.
//! Drives C1 (analysis) -> C4 (script generation, fast then slow path) ->
//! C6 (sandbox apply + validator subprocess) -> C7 (classification) -> C5
//! (cache) -> C9 (learning store) for every construct in a file, in
//! source order, then writes the instrumented file back atomically.

mod attempt;
pub mod error;
mod flatten;
mod input;
mod report;
mod validate;
mod writeback;

pub use error::OrchestratorError;
pub use input::ProcessFileInput;
pub use process::process_file;
pub use report::{Diagnostic, FileReport};

mod process;
