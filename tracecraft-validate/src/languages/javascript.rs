use std::path::Path;
use std::process::Output;
use std::sync::OnceLock;

use tracecraft_sandbox::ValidatorCommand;

use crate::languages::common::{extract_line_numbers, pattern_key, stderr_text};
use crate::result::{ValidationKind, ValidationResult};
use crate::traits::LanguageValidator;

fn stack_frame_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r":(\d+):\d+\)").unwrap())
}

fn error_class_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"(?m)^(\w+Error): (.*)$").unwrap())
}

pub struct JavaScriptValidator;

impl LanguageValidator for JavaScriptValidator {
    fn build_command(&self, candidate_path: &Path) -> Option<ValidatorCommand> {
        Some(ValidatorCommand {
            program: "node".to_string(),
            args: vec!["--check".to_string(), candidate_path.display().to_string()],
        })
    }

    fn execute_command(&self, candidate_path: &Path) -> Option<ValidatorCommand> {
        Some(ValidatorCommand {
            program: "node".to_string(),
            args: vec![candidate_path.display().to_string()],
        })
    }

    fn classify(&self, output: &Output, _candidate_source: &str) -> ValidationResult {
        classify_node_output(output, "js")
    }
}

/// Shared by `JavaScriptValidator` and `TypeScriptValidator`: node's error
/// reporting (class name, stack frame locations) is the same once past the
/// compile step.
pub(crate) fn classify_node_output(output: &Output, prefix: &str) -> ValidationResult {
    if output.status.success() {
        return ValidationResult::ok();
    }

    let stderr = stderr_text(output);
    let locations = extract_line_numbers(&stderr, stack_frame_re());

    let Some(caps) = error_class_re().captures_iter(&stderr).next() else {
        return ValidationResult::failure(ValidationKind::RuntimeFailure, pattern_key(prefix, "unknown"), &stderr, locations);
    };
    let class = caps.get(1).unwrap().as_str();

    let kind = if stderr.contains("SyntaxError") {
        ValidationKind::SyntaxError
    } else if class.contains("Reference") {
        ValidationKind::UndefinedIdentifier
    } else if stderr.contains("Cannot find module") || class.contains("Module") {
        ValidationKind::ImportError
    } else {
        ValidationKind::RuntimeFailure
    };

    ValidationResult::failure(kind, pattern_key(prefix, class), &stderr, locations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn output_with_stderr(stderr: &str, success: bool) -> Output {
        Output {
            status: ExitStatus::from_raw(if success { 0 } else { 256 }),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn a_reference_error_is_classified_as_undefined_identifier() {
        let stderr = "/scratch/f.js:5\n    _tel.recordEntry()\n    ^\nReferenceError: _tel is not defined\n    at Object.<anonymous> (/scratch/f.js:5:5)\n";
        let result = JavaScriptValidator.classify(&output_with_stderr(stderr, false), "");
        assert_eq!(result.kind, ValidationKind::UndefinedIdentifier);
        assert_eq!(result.locations, vec![5]);
    }

    #[test]
    fn a_clean_exit_is_ok() {
        let result = JavaScriptValidator.classify(&output_with_stderr("", true), "");
        assert!(result.ok);
    }
}
