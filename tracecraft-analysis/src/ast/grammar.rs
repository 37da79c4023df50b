//! Per-language tree-sitter grammar + node-kind tables.
//!
//! One dispatch point (`Grammar::for_language`) instead of `match language`
//! scattered through the analyzer — the same discipline
//! `ParserManager::parser_for` uses in the teacher crate.

use tracecraft_core::types::language::Language;

/// The concrete-syntax node kind names the analyzer looks for in a given
/// language's tree-sitter grammar.
pub struct Grammar {
    pub ts_language: tree_sitter::Language,
    pub function_kinds: &'static [&'static str],
    pub loop_kinds: &'static [&'static str],
    pub conditional_kinds: &'static [&'static str],
    pub assignment_kinds: &'static [&'static str],
    pub exception_handler_kinds: &'static [&'static str],
    pub return_kind: &'static str,
    pub block_kinds: &'static [&'static str],
}

impl Grammar {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Python => Self {
                ts_language: tree_sitter_python::LANGUAGE.into(),
                function_kinds: &["function_definition"],
                loop_kinds: &["for_statement", "while_statement"],
                conditional_kinds: &["if_statement"],
                assignment_kinds: &["assignment", "augmented_assignment"],
                exception_handler_kinds: &["try_statement"],
                return_kind: "return_statement",
                block_kinds: &["block", "module"],
            },
            Language::JavaScript => Self {
                ts_language: tree_sitter_javascript::LANGUAGE.into(),
                function_kinds: &[
                    "function_declaration",
                    "function_expression",
                    "arrow_function",
                    "method_definition",
                ],
                loop_kinds: &["for_statement", "for_in_statement", "while_statement", "do_statement"],
                conditional_kinds: &["if_statement"],
                assignment_kinds: &["assignment_expression", "variable_declarator"],
                exception_handler_kinds: &["try_statement"],
                return_kind: "return_statement",
                block_kinds: &["statement_block", "program"],
            },
            Language::TypeScript => Self {
                ts_language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
                function_kinds: &[
                    "function_declaration",
                    "function_expression",
                    "arrow_function",
                    "method_definition",
                ],
                loop_kinds: &["for_statement", "for_in_statement", "while_statement", "do_statement"],
                conditional_kinds: &["if_statement"],
                assignment_kinds: &["assignment_expression", "variable_declarator"],
                exception_handler_kinds: &["try_statement"],
                return_kind: "return_statement",
                block_kinds: &["statement_block", "program"],
            },
            Language::Go => Self {
                ts_language: tree_sitter_go::LANGUAGE.into(),
                function_kinds: &["function_declaration", "method_declaration"],
                loop_kinds: &["for_statement"],
                conditional_kinds: &["if_statement"],
                assignment_kinds: &["assignment_statement", "short_var_declaration"],
                exception_handler_kinds: &[], // Go has no exception handler construct.
                return_kind: "return_statement",
                block_kinds: &["block", "source_file"],
            },
        }
    }

    pub fn is_function(&self, kind: &str) -> bool {
        self.function_kinds.contains(&kind)
    }

    pub fn is_loop(&self, kind: &str) -> bool {
        self.loop_kinds.contains(&kind)
    }

    pub fn is_conditional(&self, kind: &str) -> bool {
        self.conditional_kinds.contains(&kind)
    }

    pub fn is_assignment(&self, kind: &str) -> bool {
        self.assignment_kinds.contains(&kind)
    }

    pub fn is_exception_handler(&self, kind: &str) -> bool {
        self.exception_handler_kinds.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_has_no_exception_handler_kind() {
        let g = Grammar::for_language(Language::Go);
        assert!(g.exception_handler_kinds.is_empty());
        assert!(!g.is_exception_handler("try_statement"));
    }

    #[test]
    fn python_recognizes_both_loop_forms() {
        let g = Grammar::for_language(Language::Python);
        assert!(g.is_loop("for_statement"));
        assert!(g.is_loop("while_statement"));
    }
}
