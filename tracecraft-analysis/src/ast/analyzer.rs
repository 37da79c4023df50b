//! C1 AST Analyzer: turns one source file into an ordered `Construct`
//! inventory, filtering variable assignments through C2's `ScopeTracker`.

use tracecraft_core::errors::ErrorCode;
use tracecraft_core::types::language::Language;
use tree_sitter::{Node, Parser};

use super::grammar::Grammar;
use super::types::{AnalysisOutput, Construct, ExitKind, ExitSite, SkippedAssignment, Span};
use crate::scope::{ScopeKind, ScopeTracker};
use crate::snippets::RESERVED_TELEMETRY_PREFIX;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("failed to load grammar for {language}")]
    GrammarLoad { language: Language },
    #[error("{path} is not valid {language} — unparseable (line {line})")]
    Parse {
        path: String,
        language: Language,
        line: usize,
    },
}

impl ErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::GrammarLoad { .. } => tracecraft_core::errors::error_code::CONFIG_ERROR,
            Self::Parse { .. } => tracecraft_core::errors::error_code::PARSE_ERROR,
        }
    }
}

/// Analyze one file's source. Unparseable input fails the whole file — per
/// spec.md §4.1, the file is never partially instrumented from a broken
/// parse.
pub fn analyze(source: &[u8], language: Language, path: &str) -> Result<AnalysisOutput, AnalysisError> {
    let grammar = Grammar::for_language(language);

    let mut parser = Parser::new();
    parser
        .set_language(&grammar.ts_language)
        .map_err(|_| AnalysisError::GrammarLoad { language })?;

    let tree = parser.parse(source, None).ok_or(AnalysisError::Parse {
        path: path.to_string(),
        language,
        line: 0,
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let line = first_error_line(root).unwrap_or(0);
        return Err(AnalysisError::Parse {
            path: path.to_string(),
            language,
            line,
        });
    }

    let mut walker = Walker {
        grammar: &grammar,
        source,
        language,
        scope: ScopeTracker::new(language),
        skipped: Vec::new(),
    };

    let mut constructs = Vec::new();
    walker.walk_block(&root, None, &mut constructs);

    Ok(AnalysisOutput {
        constructs,
        skipped: walker.skipped,
    })
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(line) = first_error_line(child) {
            return Some(line);
        }
    }
    None
}

struct Walker<'a> {
    grammar: &'a Grammar,
    source: &'a [u8],
    language: Language,
    scope: ScopeTracker,
    skipped: Vec<SkippedAssignment>,
}

impl<'a> Walker<'a> {
    fn text(&self, node: &Node) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    fn span_of(&self, node: &Node) -> Span {
        Span {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: node.start_position().row,
            end_line: node.end_position().row,
        }
    }

    /// Walk every statement in a block-like node, in source order, pushing
    /// discovered top-level Constructs into `out`. Recurses into nested
    /// blocks (loop/conditional/exception bodies) but stops at nested
    /// function boundaries — those become their own Construct with their
    /// own recursive walk.
    fn walk_block(&mut self, node: &Node, enclosing_function: Option<&str>, out: &mut Vec<Construct>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_statement(&child, enclosing_function, out);
        }
    }

    fn walk_statement(&mut self, node: &Node, enclosing_function: Option<&str>, out: &mut Vec<Construct>) {
        let kind = node.kind();

        if self.grammar.is_function(kind) {
            if let Some(construct) = self.handle_function(node) {
                out.push(construct);
            }
            return;
        }

        if self.grammar.is_loop(kind) {
            self.scope.push_scope(ScopeKind::Block);
            if let Some(left) = node.child_by_field_name("left") {
                // `for x in xs:` / `for (const x of xs)` — the loop
                // variable is bound at the loop header line for the
                // duration of the loop body.
                self.bind_pattern(&left, node.start_position().row);
            }
            let mut construct = Construct::loop_construct(
                self.span_of(node),
                enclosing_function.map(str::to_string),
                self.language,
            );
            if let Some(body) = node.child_by_field_name("body") {
                self.walk_block(&body, enclosing_function, &mut construct.children);
            }
            self.scope.pop_scope();
            out.push(construct);
            return;
        }

        if self.grammar.is_conditional(kind) {
            let branch_count = count_branches(node);
            self.scope.push_scope(ScopeKind::Block);
            let mut construct = Construct::conditional(
                self.span_of(node),
                branch_count,
                enclosing_function.map(str::to_string),
                self.language,
            );
            if let Some(body) = node.child_by_field_name("consequence") {
                self.walk_block(&body, enclosing_function, &mut construct.children);
            }
            if let Some(alt) = node.child_by_field_name("alternative") {
                self.walk_statement(&alt, enclosing_function, &mut construct.children);
            }
            self.scope.pop_scope();
            out.push(construct);
            return;
        }

        if !self.grammar.exception_handler_kinds.is_empty() && self.grammar.is_exception_handler(kind) {
            self.scope.push_scope(ScopeKind::Block);
            let mut construct = Construct::exception_handler(
                self.span_of(node),
                enclosing_function.map(str::to_string),
                self.language,
            );
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                self.walk_statement(&child, enclosing_function, &mut construct.children);
            }
            self.scope.pop_scope();
            out.push(construct);
            return;
        }

        if self.grammar.is_assignment(kind) {
            if let Some(construct) = self.handle_assignment(node, enclosing_function) {
                out.push(construct);
            }
            return;
        }

        // Not a construct of interest itself — still recurse into its
        // children (e.g. a `block` wrapping an `if`, or an expression
        // statement wrapping an assignment) so nested constructs surface.
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk_statement(&child, enclosing_function, out);
        }
    }

    fn handle_function(&mut self, node: &Node) -> Option<Construct> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(&n))
            .unwrap_or_else(|| "<anonymous>".to_string());

        let start_line = node.start_position().row;
        self.scope.push_scope(ScopeKind::Function);

        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.collect_param_names(&p, start_line))
            .unwrap_or_default();

        let body = node.child_by_field_name("body");
        let exits = body.as_ref().map(|b| self.collect_exits(b)).unwrap_or_default();

        let mut construct = Construct::function(
            name.clone(),
            params,
            self.span_of(node),
            exits,
            self.language,
        );

        if let Some(body) = body {
            self.walk_block(&body, Some(name.as_str()), &mut construct.children);
        }

        self.scope.pop_scope();
        Some(construct)
    }

    fn collect_param_names(&mut self, params_node: &Node, bind_line: usize) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = params_node.walk();
        for child in params_node.children(&mut cursor) {
            match child.kind() {
                "identifier" => names.push(self.text(&child)),
                // Go's `parameter_declaration` groups several names under
                // one type (`a, b int`) as sibling `identifier` children
                // rather than a single `name` field.
                "parameter_declaration" => {
                    let mut inner = child.walk();
                    for grandchild in child.children(&mut inner) {
                        if grandchild.kind() == "identifier" {
                            names.push(self.text(&grandchild));
                        }
                    }
                }
                // Python typed/default params and single-name JS/TS params
                // carry the name in a `name` field.
                _ => {
                    if let Some(n) = child.child_by_field_name("name") {
                        names.push(self.text(&n));
                    } else if let Some(n) = child.child_by_field_name("pattern") {
                        names.push(self.text(&n));
                    }
                }
            }
        }
        names.retain(|n| !n.is_empty());
        for name in &names {
            self.scope.bind_at(name, bind_line);
        }
        names
    }

    /// Collect every `return` reachable inside `body` without crossing
    /// into a nested function, plus a fall-through exit if the last
    /// top-level statement doesn't unconditionally return.
    fn collect_exits(&self, body: &Node) -> Vec<ExitSite> {
        let mut exits = Vec::new();
        collect_returns(body, self.grammar, &mut exits);

        let last_is_return = body
            .named_child(body.named_child_count().saturating_sub(1))
            .map(|n| n.kind() == self.grammar.return_kind)
            .unwrap_or(false);

        if !last_is_return {
            exits.push(ExitSite {
                kind: ExitKind::FallThrough,
                line: body.end_position().row,
            });
        }

        exits
    }

    fn bind_pattern(&mut self, node: &Node, line: usize) {
        match node.kind() {
            "identifier" => self.scope.bind_at(&self.text(node), line),
            _ => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.kind() == "identifier" {
                        self.bind_pattern(&child, line);
                    }
                }
            }
        }
    }

    fn handle_assignment(&mut self, node: &Node, enclosing_function: Option<&str>) -> Option<Construct> {
        let target = node
            .child_by_field_name("left")
            .or_else(|| node.child_by_field_name("name"))
            .or_else(|| node.named_child(0))?;

        if target.kind() != "identifier" {
            // Compound target (attribute access, subscript, tuple
            // destructuring) — conservatively not instrumented.
            self.skipped.push(SkippedAssignment {
                name: self.text(&target),
                line: node.start_position().row,
                reason: "compound assignment target",
            });
            return None;
        }

        let name = self.text(&target);
        let line = node.start_position().row;

        if name.starts_with(RESERVED_TELEMETRY_PREFIX) {
            // A prior instrumentation pass's own capture variable
            // (`_tel_ret_0`, …) re-surfacing on the next `analyze()` pass
            // over the growing baseline — never itself a construct to
            // instrument.
            self.scope.bind_assignment(&name, line);
            return None;
        }

        let is_compound = is_compound_assignment(node);

        if is_compound && !self.scope.is_bound(&name, line) {
            self.skipped.push(SkippedAssignment {
                name,
                line,
                reason: "not yet bound at assignment line",
            });
            return None;
        }

        self.scope.bind_assignment(&name, line);

        Some(Construct::variable_assignment(
            name,
            line,
            self.span_of(node),
            enclosing_function.map(str::to_string),
            self.language,
        ))
    }
}

fn is_compound_assignment(node: &Node) -> bool {
    node.kind() == "augmented_assignment"
        || node
            .child_by_field_name("operator")
            .map(|op| op.kind() != "=")
            .unwrap_or(false)
}

fn collect_returns(node: &Node, grammar: &Grammar, out: &mut Vec<ExitSite>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if grammar.is_function(child.kind()) {
            continue; // Don't cross into a nested function's own returns.
        }
        if child.kind() == grammar.return_kind {
            out.push(ExitSite {
                kind: ExitKind::Return,
                line: child.start_position().row,
            });
        }
        collect_returns(&child, grammar, out);
    }
}

fn count_branches(node: &Node) -> usize {
    let mut count = 1;
    if let Some(alt) = node.child_by_field_name("alternative") {
        match alt.kind() {
            "if_statement" => count += count_branches(&alt),
            _ => count += 1,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_arg_python_function_has_one_fallthrough_exit() {
        let source = b"def calculate(x, y):\n    return x + y\n";
        let output = analyze(source, Language::Python, "calc.py").unwrap();
        assert_eq!(output.constructs.len(), 1);
        let func = &output.constructs[0];
        assert_eq!(func.name.as_deref(), Some("calculate"));
        assert_eq!(func.params, vec!["x", "y"]);
        assert_eq!(func.exits.len(), 1);
        assert_eq!(func.exits[0].kind, ExitKind::Return);
    }

    #[test]
    fn empty_function_body_has_exactly_one_fallthrough_exit() {
        let source = b"def noop():\n    pass\n";
        let output = analyze(source, Language::Python, "noop.py").unwrap();
        let func = &output.constructs[0];
        assert_eq!(func.exits.len(), 1);
        assert_eq!(func.exits[0].kind, ExitKind::FallThrough);
    }

    #[test]
    fn multiple_return_sites_each_produce_one_exit() {
        let source = b"def classify(x):\n    if x > 0:\n        return 1\n    return -1\n";
        let output = analyze(source, Language::Python, "classify.py").unwrap();
        let func = &output.constructs[0];
        assert_eq!(
            func.exits.iter().filter(|e| e.kind == ExitKind::Return).count(),
            2
        );
    }

    #[test]
    fn unparseable_input_fails_the_whole_file() {
        let source = b"def broken(:\n    return\n";
        let result = analyze(source, Language::Python, "broken.py");
        assert!(result.is_err());
    }

    #[test]
    fn assignment_not_yet_bound_is_skipped() {
        let source = b"def accumulate(xs):\n    for x in xs:\n        total += x\n    return total\n";
        let output = analyze(source, Language::Python, "acc.py").unwrap();
        assert!(output
            .skipped
            .iter()
            .any(|s| s.name == "total" && s.reason == "not yet bound at assignment line"));
    }

    #[test]
    fn plain_assignment_after_declaration_is_instrumented() {
        let source =
            b"def accumulate(xs):\n    total = 0\n    for x in xs:\n        total += x\n    return total\n";
        let output = analyze(source, Language::Python, "acc.py").unwrap();
        let func = &output.constructs[0];
        let var_assignments: Vec<_> = func
            .children
            .iter()
            .filter(|c| c.kind == super::super::types::ConstructKind::VariableAssignment)
            .collect();
        assert_eq!(var_assignments.len(), 1);
        assert_eq!(var_assignments[0].assigned_name.as_deref(), Some("total"));
    }

    #[test]
    fn go_multi_value_return_does_not_cross_into_nested_function() {
        let source = b"func Div(a, b int) (int, error) {\n\tif b == 0 {\n\t\treturn 0, nil\n\t}\n\treturn a / b, nil\n}\n";
        let output = analyze(source, Language::Go, "div.go").unwrap();
        let func = &output.constructs[0];
        assert_eq!(
            func.exits.iter().filter(|e| e.kind == ExitKind::Return).count(),
            2
        );
    }
}
