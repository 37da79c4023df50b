//! Per-language validator policy (spec.md §4.7): what command to run, and
//! how to read its exit status and stderr into a `ValidationResult`.
//! `tracecraft-sandbox` owns the mechanism (spawn, jail, timeout); this
//! crate owns the policy.

use std::process::Output;

use tracecraft_sandbox::ValidatorCommand;

use crate::result::ValidationResult;
use crate::RUNTIME_MARKER;

pub trait LanguageValidator: Send + Sync {
    /// Build the syntax/compile check the sandbox should run against the
    /// candidate file, or `None` when the language requires a build step
    /// and no build command was configured — the caller must then report
    /// `ValidationResult::config_error` rather than skip validation.
    fn build_command(&self, candidate_path: &std::path::Path) -> Option<ValidatorCommand>;

    /// Build the optional full-execution check (actually running the
    /// candidate), for languages where that's possible and meaningful.
    /// Skipped whenever `skip_runtime_execution` is true: the candidate
    /// imports the real runtime-utility module, which won't resolve
    /// inside the scratch sandbox, so attempting to run it would produce
    /// a false `ImportError` rather than a signal about the instrumented
    /// code itself (spec.md §4.7).
    fn execute_command(&self, candidate_path: &std::path::Path) -> Option<ValidatorCommand>;

    /// Classify a finished process's output into a `ValidationResult`.
    /// `candidate_source` is the instrumented file's text, used to extract
    /// pattern keys.
    fn classify(&self, output: &Output, candidate_source: &str) -> ValidationResult;

    /// Whether the candidate already imports the runtime-utility module,
    /// in which case `execute_command`'s check should be skipped — a
    /// successful syntax/compile check already suffices (spec.md §4.7).
    fn skip_runtime_execution(&self, candidate_source: &str) -> bool {
        candidate_source.contains(RUNTIME_MARKER)
    }
}
