//! Drives one candidate through C7's policy and C6's mechanism: syntax/
//! compile check first, then an optional full-execution check, honoring
//! `skip_runtime_execution` (spec.md §4.7).

use std::path::Path;
use std::time::Duration;

use tracecraft_sandbox::run_validator;
use tracecraft_validate::{LanguageValidator, ValidationResult};

pub async fn validate_candidate(
    validator: &dyn LanguageValidator,
    candidate_path: &Path,
    candidate_text: &str,
    scratch_dir: &Path,
    wall_clock_cap: Duration,
) -> Result<ValidationResult, tracecraft_sandbox::SandboxError> {
    let Some(build_command) = validator.build_command(candidate_path) else {
        return Ok(ValidationResult::config_error("no build command configured for this language"));
    };

    let result = match run_validator(&build_command, scratch_dir, wall_clock_cap).await {
        Ok(output) => validator.classify(&output, candidate_text),
        Err(tracecraft_sandbox::SandboxError::ValidatorTimeout(_)) => ValidationResult::timeout(),
        Err(other) => return Err(other),
    };
    if !result.ok {
        return Ok(result);
    }

    if validator.skip_runtime_execution(candidate_text) {
        return Ok(result);
    }

    let Some(execute_command) = validator.execute_command(candidate_path) else {
        return Ok(result);
    };

    match run_validator(&execute_command, scratch_dir, wall_clock_cap).await {
        Ok(output) => Ok(validator.classify(&output, candidate_text)),
        Err(tracecraft_sandbox::SandboxError::ValidatorTimeout(_)) => Ok(ValidationResult::timeout()),
        Err(other) => Err(other),
    }
}
