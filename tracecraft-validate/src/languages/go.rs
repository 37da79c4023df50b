use std::path::Path;
use std::process::Output;
use std::sync::OnceLock;

use tracecraft_sandbox::ValidatorCommand;

use crate::languages::common::{extract_line_numbers, pattern_key, stderr_text};
use crate::result::{ValidationKind, ValidationResult};
use crate::traits::LanguageValidator;

fn location_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r":(\d+):\d+:").unwrap())
}

fn undefined_re() -> &'static regex::Regex {
    static RE: OnceLock<regex::Regex> = OnceLock::new();
    RE.get_or_init(|| regex::Regex::new(r"undefined: (\w+)").unwrap())
}

/// `requires_build` (spec.md §4.7): there's no bare `go run` equivalent to
/// a syntax check, so the caller-configured build command — typically
/// `go build ./...` — is the only signal this backend has. Absent one, it
/// must never be reported as a pass.
pub struct GoValidator {
    pub build_command: Option<Vec<String>>,
}

impl LanguageValidator for GoValidator {
    fn build_command(&self, candidate_path: &Path) -> Option<ValidatorCommand> {
        let configured = self.build_command.as_ref()?;
        let (program, rest) = configured.split_first()?;
        let mut args = rest.to_vec();
        args.push(candidate_path.display().to_string());
        Some(ValidatorCommand {
            program: program.clone(),
            args,
        })
    }

    /// A successful `go build` already proves the package compiles;
    /// there's no separate "run it and see" step this backend takes.
    fn execute_command(&self, _candidate_path: &Path) -> Option<ValidatorCommand> {
        None
    }

    fn classify(&self, output: &Output, _candidate_source: &str) -> ValidationResult {
        if output.status.success() {
            return ValidationResult::ok();
        }

        let stderr = stderr_text(output);
        let locations = extract_line_numbers(&stderr, location_re());

        if let Some(caps) = undefined_re().captures(&stderr) {
            let ident = caps.get(1).unwrap().as_str();
            return ValidationResult::failure(ValidationKind::UndefinedIdentifier, pattern_key("go", &format!("undefined_{ident}")), &stderr, locations);
        }
        if stderr.contains("declared and not used") {
            return ValidationResult::failure(ValidationKind::UnusedIdentifier, pattern_key("go", "declared_not_used"), &stderr, locations);
        }
        if stderr.contains("syntax error") {
            return ValidationResult::failure(ValidationKind::SyntaxError, pattern_key("go", "syntax_error"), &stderr, locations);
        }
        if stderr.contains("cannot find package") || stderr.contains("no required module") {
            return ValidationResult::failure(ValidationKind::ImportError, pattern_key("go", "missing_package"), &stderr, locations);
        }

        ValidationResult::failure(ValidationKind::CompileError, pattern_key("go", "build_failed"), &stderr, locations)
    }
}
