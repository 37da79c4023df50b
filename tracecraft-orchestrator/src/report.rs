//! `FileReport` — the per-file structured outcome (spec.md §6 outputs #4).

use tracecraft_analysis::ConstructKind;

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub construct_kind: ConstructKind,
    pub line: usize,
    pub error_code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct FileReport {
    pub constructs_found: usize,
    pub constructs_instrumented: usize,
    pub constructs_failed: usize,
    pub constructs_skipped: usize,
    pub attempts_used: u32,
    pub cache_hits: u32,
    pub cache_misses: u32,
    pub cost: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn record_diagnostic(&mut self, construct_kind: ConstructKind, line: usize, error_code: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            construct_kind,
            line,
            error_code,
            message: message.into(),
        });
    }
}
