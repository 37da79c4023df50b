//! `LearningRecord` — one append-only entry per (language, construct kind,
//! attempt) outcome (spec.md §3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracecraft_analysis::ConstructKind;
use tracecraft_core::types::language::Language;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningRecord {
    pub language: Language,
    pub construct_kind: ConstructKind,
    pub attempt: u32,
    pub success: bool,
    /// Regex-normalized error class, e.g. `go_undefined_Tel`. Empty on
    /// success.
    pub failure_pattern: String,
    pub snippet_excerpt: String,
    /// Human- or model-authored description of what fixed it, set only on
    /// success.
    pub fix_description: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub content_hash: u64,
}

impl LearningRecord {
    pub fn key(&self) -> (Language, ConstructKind, &str) {
        (self.language, self.construct_kind, self.failure_pattern.as_str())
    }
}
