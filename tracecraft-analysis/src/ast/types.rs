//! Construct — the unit of instrumentation (spec.md §3).

use serde::{Deserialize, Serialize};
use tracecraft_core::types::language::Language;

/// Byte/line span in the original source. `start_line`/`end_line` are
/// 0-indexed, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_line: usize,
    pub end_line: usize,
}

impl Span {
    pub fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// The kind of a Construct, per spec.md §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructKind {
    Function,
    Loop,
    Conditional,
    VariableAssignment,
    ExceptionHandler,
}

impl ConstructKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Loop => "loop",
            Self::Conditional => "conditional",
            Self::VariableAssignment => "variable_assignment",
            Self::ExceptionHandler => "exception_handler",
        }
    }
}

/// A site where a function exits: a `return` statement, or the fall-through
/// end of the body if control can reach it without an explicit `return`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Return,
    FallThrough,
}

#[derive(Debug, Clone)]
pub struct ExitSite {
    pub kind: ExitKind,
    pub line: usize,
}

/// A unit to be instrumented. Immutable once produced by the analyzer.
#[derive(Debug, Clone)]
pub struct Construct {
    pub kind: ConstructKind,
    pub name: Option<String>,
    pub enclosing_function: Option<String>,
    pub span: Span,
    pub children: Vec<Construct>,
    pub language: Language,
    /// Function-only: parameter names, in declaration order.
    pub params: Vec<String>,
    /// Function-only: exit sites (returns + fall-through).
    pub exits: Vec<ExitSite>,
    /// Conditional-only: number of branches (if/elif/else arms).
    pub branch_count: usize,
    /// VariableAssignment-only: the assigned name and the line it occurs on.
    pub assigned_name: Option<String>,
    pub assigned_line: Option<usize>,
}

impl Construct {
    pub fn function(
        name: String,
        params: Vec<String>,
        span: Span,
        exits: Vec<ExitSite>,
        language: Language,
    ) -> Self {
        Self {
            kind: ConstructKind::Function,
            name: Some(name),
            enclosing_function: None,
            span,
            children: Vec::new(),
            language,
            params,
            exits,
            branch_count: 0,
            assigned_name: None,
            assigned_line: None,
        }
    }

    pub fn loop_construct(span: Span, enclosing_function: Option<String>, language: Language) -> Self {
        Self {
            kind: ConstructKind::Loop,
            name: None,
            enclosing_function,
            span,
            children: Vec::new(),
            language,
            params: Vec::new(),
            exits: Vec::new(),
            branch_count: 0,
            assigned_name: None,
            assigned_line: None,
        }
    }

    pub fn conditional(
        span: Span,
        branch_count: usize,
        enclosing_function: Option<String>,
        language: Language,
    ) -> Self {
        Self {
            kind: ConstructKind::Conditional,
            name: None,
            enclosing_function,
            span,
            children: Vec::new(),
            language,
            params: Vec::new(),
            exits: Vec::new(),
            branch_count,
            assigned_name: None,
            assigned_line: None,
        }
    }

    pub fn variable_assignment(
        assigned_name: String,
        line: usize,
        span: Span,
        enclosing_function: Option<String>,
        language: Language,
    ) -> Self {
        Self {
            kind: ConstructKind::VariableAssignment,
            name: None,
            enclosing_function,
            span,
            children: Vec::new(),
            language,
            params: Vec::new(),
            exits: Vec::new(),
            branch_count: 0,
            assigned_name: Some(assigned_name),
            assigned_line: Some(line),
        }
    }

    pub fn exception_handler(span: Span, enclosing_function: Option<String>, language: Language) -> Self {
        Self {
            kind: ConstructKind::ExceptionHandler,
            name: None,
            enclosing_function,
            span,
            children: Vec::new(),
            language,
            params: Vec::new(),
            exits: Vec::new(),
            branch_count: 0,
            assigned_name: None,
            assigned_line: None,
        }
    }
}

/// A variable use the analyzer decided was *not* in scope, kept only for
/// the per-file "skipped" diagnostic (spec.md §8 boundary behavior).
#[derive(Debug, Clone)]
pub struct SkippedAssignment {
    pub name: String,
    pub line: usize,
    pub reason: &'static str,
}

/// The result of C1 analysis for one file.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutput {
    pub constructs: Vec<Construct>,
    pub skipped: Vec<SkippedAssignment>,
}
