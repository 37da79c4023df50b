//! C2 Scope Tracker.
//!
//! Maintains a stack of lexical scopes during the same traversal C1 uses
//! and answers, for a given name and line, whether it is bound at that
//! point. Contract (spec.md §4.2): never reports a name bound if it is
//! first assigned strictly after the use site in linear reading order,
//! except for hoisted forms in languages that have them (none of the four
//! supported languages hoist `var`-style declarations across function
//! boundaries in a way this engine needs to special-case beyond the
//! per-scope-kind bind-at rules below).

use tracecraft_core::types::language::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Class,
    Function,
    Comprehension,
    Block,
}

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    /// Line at which the binding takes effect. A use at exactly this line
    /// is considered bound (parameters, `for` loop variables) unless
    /// `bound_strictly_after` is set, in which case the use must be on a
    /// later line (plain assignment: `x = 1` doesn't bind `x` for uses on
    /// the same line preceding it, e.g. `x = x + 1` where the right-hand
    /// `x` must already exist from an outer scope).
    bound_at_line: usize,
}

struct Scope {
    kind: ScopeKind,
    bindings: Vec<Binding>,
}

/// A stack of lexical scopes, pushed/popped in traversal order.
pub struct ScopeTracker {
    stack: Vec<Scope>,
    language: Language,
}

impl ScopeTracker {
    pub fn new(language: Language) -> Self {
        Self {
            stack: vec![Scope {
                kind: ScopeKind::Module,
                bindings: Vec::new(),
            }],
            language,
        }
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.stack.push(Scope {
            kind,
            bindings: Vec::new(),
        });
    }

    pub fn pop_scope(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Bind `name` as of `line` in the innermost scope. Used for function
    /// parameters (bound at the function's first line) and `for` loop
    /// variables (bound at the loop header line).
    pub fn bind_at(&mut self, name: &str, line: usize) {
        if let Some(scope) = self.stack.last_mut() {
            scope.bindings.push(Binding {
                name: name.to_string(),
                bound_at_line: line,
            });
        }
    }

    /// Bind `name` as of `line` for a plain assignment: subsequent uses are
    /// bound starting the line *after* the assignment, since the
    /// right-hand side of the assignment itself must not see the new
    /// binding (it still refers to whatever was previously in scope, or is
    /// itself undefined).
    pub fn bind_assignment(&mut self, name: &str, line: usize) {
        self.bind_at(name, line + 1);
    }

    /// Is `name` bound at `use_line`, considering every enclosing scope
    /// (innermost first, skipping class scopes per lexical rules: class
    /// bodies don't contribute to the enclosing scope of nested functions).
    pub fn is_bound(&self, name: &str, use_line: usize) -> bool {
        for scope in self.stack.iter().rev() {
            if scope.kind == ScopeKind::Class {
                // Class-level fields aren't visible as bare names inside
                // nested function/method bodies in any of the four
                // supported languages; only the instance/self-qualified
                // form is, which this engine doesn't track as a bare name.
                continue;
            }
            if scope
                .bindings
                .iter()
                .any(|b| b.name == name && b.bound_at_line <= use_line)
            {
                return true;
            }
        }
        false
    }

    pub fn language(&self) -> Language {
        self.language
    }
}
