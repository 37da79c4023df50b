//! # tracecraft-analysis
//!
//! C1 AST Analyzer, C2 Scope Tracker, and C3 Snippet Synthesizer.
//!
//! `ast::analyze` turns a source file into an ordered inventory of
//! `Construct`s, filtering out variable mutations that `scope::ScopeTracker`
//! can't prove are bound at their use site. `snippets::synthesize` then
//! turns each Construct into the literal telemetry-call text for its
//! language, template-driven and model-free.

pub mod ast;
pub mod scope;
pub mod snippets;

pub use ast::analyzer::{analyze, AnalysisError, AnalysisOutput};
pub use ast::types::{Construct, ConstructKind, Span};
pub use snippets::synthesize;
