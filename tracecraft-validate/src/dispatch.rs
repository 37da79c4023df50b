//! Single dispatch point from `Language` to its `LanguageValidator`,
//! mirroring the teacher's `ParserManager::parser_for` (spec.md's note on
//! replacing dynamic dispatch with a tagged variant applies the other
//! direction here: one lookup site, not one `match` per call site).

use tracecraft_core::Language;

use crate::languages::{go::GoValidator, javascript::JavaScriptValidator, python::PythonValidator, typescript::TypeScriptValidator};
use crate::traits::LanguageValidator;

/// Caller-supplied build commands for languages that `requires_build`.
/// This crate never reads a config file itself — parsing and sourcing
/// these is an external collaborator's concern (spec.md CLI/config
/// non-goal); it only enforces what happens when one is missing.
#[derive(Debug, Clone, Default)]
pub struct BuildCommands {
    pub go: Option<Vec<String>>,
}

pub fn validator_for(language: Language, build_commands: &BuildCommands) -> Box<dyn LanguageValidator> {
    match language {
        Language::Python => Box::new(PythonValidator),
        Language::JavaScript => Box::new(JavaScriptValidator),
        Language::TypeScript => Box::new(TypeScriptValidator),
        Language::Go => Box::new(GoValidator {
            build_command: build_commands.go.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_without_a_build_command_still_dispatches_a_validator() {
        let validator = validator_for(Language::Go, &BuildCommands::default());
        assert!(validator.build_command(std::path::Path::new("main.go")).is_none());
    }
}
