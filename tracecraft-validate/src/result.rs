//! `ValidationResult` — the outcome of C7 (spec.md §3).

const STDERR_EXCERPT_LIMIT: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    Ok,
    SyntaxError,
    CompileError,
    ImportError,
    UndefinedIdentifier,
    UnusedIdentifier,
    RuntimeTimeout,
    RuntimeFailure,
    /// A `requires_build` language with no build command configured.
    /// Never treated as success (spec.md §4.7).
    ConfigError,
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub ok: bool,
    pub kind: ValidationKind,
    pub pattern_key: String,
    pub stderr_excerpt: String,
    pub locations: Vec<usize>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            ok: true,
            kind: ValidationKind::Ok,
            pattern_key: String::new(),
            stderr_excerpt: String::new(),
            locations: Vec::new(),
        }
    }

    pub fn failure(kind: ValidationKind, pattern_key: impl Into<String>, stderr: &str, locations: Vec<usize>) -> Self {
        Self {
            ok: false,
            kind,
            pattern_key: pattern_key.into(),
            stderr_excerpt: truncate(stderr),
            locations,
        }
    }

    pub fn config_error(reason: &str) -> Self {
        Self::failure(ValidationKind::ConfigError, "config_error", reason, Vec::new())
    }

    pub fn timeout() -> Self {
        Self::failure(ValidationKind::RuntimeTimeout, "timeout", "validator timed out", Vec::new())
    }
}

fn truncate(stderr: &str) -> String {
    if stderr.len() <= STDERR_EXCERPT_LIMIT {
        return stderr.to_string();
    }
    let mut end = STDERR_EXCERPT_LIMIT;
    while !stderr.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &stderr[..end])
}
