use std::path::Path;
use std::process::Output;
use std::sync::OnceLock;

use tracecraft_sandbox::ValidatorCommand;

use crate::languages::common::{extract_line_numbers, pattern_key, stderr_text};
use crate::result::{ValidationKind, ValidationResult};
use crate::traits::LanguageValidator;

fn traceback_line_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r#"File "[^"]+", line (\d+)"#).unwrap())
}

fn exception_class_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"(?m)^([A-Za-z_][A-Za-z0-9_.]*(?:Error|Warning)): (.*)$").unwrap())
}

pub struct PythonValidator;

impl LanguageValidator for PythonValidator {
    fn build_command(&self, candidate_path: &Path) -> Option<ValidatorCommand> {
        Some(ValidatorCommand {
            program: "python3".to_string(),
            args: vec!["-m".to_string(), "py_compile".to_string(), candidate_path.display().to_string()],
        })
    }

    fn execute_command(&self, candidate_path: &Path) -> Option<ValidatorCommand> {
        Some(ValidatorCommand {
            program: "python3".to_string(),
            args: vec![candidate_path.display().to_string()],
        })
    }

    fn classify(&self, output: &Output, _candidate_source: &str) -> ValidationResult {
        if output.status.success() {
            return ValidationResult::ok();
        }

        let stderr = stderr_text(output);
        let locations = extract_line_numbers(&stderr, traceback_line_re());

        let Some(caps) = exception_class_re().captures_iter(&stderr).last() else {
            return ValidationResult::failure(ValidationKind::RuntimeFailure, pattern_key("py", "unknown"), &stderr, locations);
        };
        let class = caps.get(1).unwrap().as_str();

        let kind = if class.contains("Syntax") || class.contains("Indentation") {
            ValidationKind::SyntaxError
        } else if class.contains("Import") || class.contains("ModuleNotFound") {
            ValidationKind::ImportError
        } else if class.contains("Name") {
            ValidationKind::UndefinedIdentifier
        } else {
            ValidationKind::RuntimeFailure
        };

        ValidationResult::failure(kind, pattern_key("py", class), &stderr, locations)
    }
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
    fn a_successful_exit_is_ok() {
        let result = PythonValidator.classify(&output_with_stderr("", true), "");
        assert!(result.ok);
        assert_eq!(result.kind, ValidationKind::Ok);
    }

    #[test]
    fn a_syntax_error_traceback_is_classified_and_located() {
        let stderr = "  File \"f.py\", line 3\n    def f(:\n          ^\nSyntaxError: invalid syntax\n";
        let result = PythonValidator.classify(&output_with_stderr(stderr, false), "");
        assert_eq!(result.kind, ValidationKind::SyntaxError);
        assert_eq!(result.locations, vec![3]);
        assert_eq!(result.pattern_key, "py_syntaxerror");
    }

    #[test]
    fn a_name_error_is_classified_as_undefined_identifier() {
        let stderr = "Traceback (most recent call last):\n  File \"f.py\", line 5, in <module>\nNameError: name '_tel' is not defined\n";
        let result = PythonValidator.classify(&output_with_stderr(stderr, false), "");
        assert_eq!(result.kind, ValidationKind::UndefinedIdentifier);
    }
}
