//! # tracecraft-validate
//!
//! C7 Validator: one `LanguageValidator` trait behind a per-language
//! dispatch table (`validator_for`), mirroring the teacher's
//! `ParserManager::parser_for` single dispatch point.

pub mod dispatch;
pub mod languages;
pub mod result;
pub mod traits;

pub use dispatch::{validator_for, BuildCommands};
pub use result::{ValidationKind, ValidationResult};
pub use traits::LanguageValidator;

/// Substring that marks a candidate file as already importing the
/// runtime-utility module. Its presence means optional runtime execution
/// is skipped — syntax/compile suffice (spec.md §4.7).
pub const RUNTIME_MARKER: &str = "__tracecraft_rt";
