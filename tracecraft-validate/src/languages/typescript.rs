use std::path::Path;
use std::process::Output;
use std::sync::OnceLock;

use tracecraft_sandbox::ValidatorCommand;

use crate::languages::common::{extract_line_numbers, pattern_key, stderr_text};
use crate::result::{ValidationKind, ValidationResult};
use crate::traits::LanguageValidator;

fn diagnostic_location_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"\((\d+),\d+\):").unwrap())
}

fn diagnostic_code_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"error (TS\d+): (.*)").unwrap())
}

pub struct TypeScriptValidator;

impl LanguageValidator for TypeScriptValidator {
    fn build_command(&self, candidate_path: &Path) -> Option<ValidatorCommand> {
        Some(ValidatorCommand {
            program: "tsc".to_string(),
            args: vec!["--noEmit".to_string(), "--strict".to_string(), candidate_path.display().to_string()],
        })
    }

    /// `tsc` already type-checks; there's no separate "run it" step for a
    /// bare `.ts` file the way there is for Python/JS, so this is always a
    /// compile-only check.
    fn execute_command(&self, _candidate_path: &Path) -> Option<ValidatorCommand> {
        None
    }

    fn classify(&self, output: &Output, _candidate_source: &str) -> ValidationResult {
        if output.status.success() {
            return ValidationResult::ok();
        }

        // tsc writes diagnostics to stdout, not stderr.
        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        let locations = extract_line_numbers(&text, diagnostic_location_re());

        let Some(caps) = diagnostic_code_re().captures_iter(&text).next() else {
            return ValidationResult::failure(ValidationKind::RuntimeFailure, pattern_key("ts", "unknown"), &text, locations);
        };
        let code = caps.get(1).unwrap().as_str();
        let message = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        let kind = if message.contains("Cannot find name") {
            ValidationKind::UndefinedIdentifier
        } else if message.contains("is declared but") && message.contains("never used") {
            ValidationKind::UnusedIdentifier
        } else if message.contains("Cannot find module") {
            ValidationKind::ImportError
        } else {
            ValidationKind::SyntaxError
        };

        ValidationResult::failure(kind, pattern_key("ts", code), &text, locations)
    }
}
