//! Stable error codes, one per error variant across every crate.
//!
//! Every `thiserror` enum in the workspace implements this trait so a
//! per-file report can carry a machine-comparable code instead of just a
//! formatted message. Mirrors the `DriftErrorCode` convention.

/// A stable, `SCREAMING_SNAKE_CASE` identifier for an error variant.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;

    /// Whether the orchestrator should retry the attempt that produced this
    /// error, or treat it as terminal for the construct/file. Default: not
    /// recoverable, since most error kinds in this workspace are terminal
    /// by construction (parse errors, config errors, sandbox violations).
    fn is_recoverable(&self) -> bool {
        false
    }
}

pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const UNSUPPORTED_LANGUAGE: &str = "UNSUPPORTED_LANGUAGE";
pub const ANCHOR_DRIFT: &str = "ANCHOR_DRIFT";
pub const SANDBOX_VIOLATION: &str = "SANDBOX_VIOLATION";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const VALIDATION_FAILURE: &str = "VALIDATION_FAILURE";
pub const BUDGET_EXHAUSTED: &str = "BUDGET_EXHAUSTED";
pub const CACHE_ERROR: &str = "CACHE_ERROR";
pub const LEARNING_STORE_ERROR: &str = "LEARNING_STORE_ERROR";
pub const MODEL_ERROR: &str = "MODEL_ERROR";
