//! # tracecraft-script
//!
//! The Insertion Script data model (spec.md §3) plus the C4 Script
//! Generator: a deterministic fast path driven by
//! `tracecraft_analysis::snippets`, and a model-assisted slow path for
//! constructs the fast path can't cover or that fail validation.

pub mod fingerprint;
pub mod generate;
pub mod record;
pub mod script;

pub use fingerprint::Fingerprint;
pub use generate::GenerateError;
pub use generate::{fast_path, slow_path};
pub use record::ScriptRecord;
pub use script::{Anchor, InsertionScript, ScriptOp};
