//! # tracecraft-sandbox
//!
//! C6 Script Sandbox. Applies one `InsertionScript` to a file inside a
//! scratch directory, recovers from small anchor drift, strips forbidden
//! markers, and runs the validator's own subprocess under a wall-clock
//! cap and a jailed working directory. No other process is ever spawned
//! from this crate.

pub mod apply;
pub mod error;
pub mod jail;
pub mod run;

pub use apply::{apply, ApplyOutcome, ANCHOR_SEARCH_WINDOW, FORBIDDEN_MARKER};
pub use error::SandboxError;
pub use run::{run_validator, ValidatorCommand};
