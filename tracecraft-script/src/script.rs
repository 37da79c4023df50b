//! Insertion Script data model (spec.md §3).

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// A line number plus a fingerprint of that line's original contents.
/// Resolving an anchor means: read the line at `line`, hash it, and
/// compare against `fingerprint`. A mismatch means the file drifted since
/// the script was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub line: usize,
    pub fingerprint: u64,
}

impl Anchor {
    pub fn new(line: usize, source_line: &str) -> Self {
        Self {
            line,
            fingerprint: hash_line(source_line),
        }
    }

    pub fn matches(&self, source_line: &str) -> bool {
        self.fingerprint == hash_line(source_line)
    }
}

fn hash_line(line: &str) -> u64 {
    xxh3_64(line.trim_end_matches(['\r', '\n']).as_bytes())
}

/// One anchored edit operation. The four shapes named in spec.md §3.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScriptOp {
    /// Insert a new line immediately before or after `anchor`.
    InsertLine { anchor: Anchor, before: bool, text: String },
    /// Replace the anchored line's text outright.
    ReplaceLine { anchor: Anchor, text: String },
    /// Wrap a block with prelude/postlude text, bracketed by two anchors.
    WrapBlock {
        start: Anchor,
        end: Anchor,
        prelude: String,
        postlude: String,
    },
    /// Rewrite a `return` line so the returned value is captured and
    /// reported before the function actually returns. Never used for a
    /// language whose `return` can carry multiple values (spec.md DESIGN
    /// NOTES, "Return-rewriting risk").
    RewriteReturn { anchor: Anchor, capture_var: String, text: String },
}

impl ScriptOp {
    /// The line every anchor in this op refers to, used for span
    /// validation and descending-order application.
    pub fn anchor_line(&self) -> usize {
        match self {
            Self::InsertLine { anchor, .. } => anchor.line,
            Self::ReplaceLine { anchor, .. } => anchor.line,
            Self::WrapBlock { start, .. } => start.line,
            Self::RewriteReturn { anchor, .. } => anchor.line,
        }
    }
}

/// An ordered, deterministic program of `ScriptOp`s. Applying it to the
/// original file's line sequence yields the instrumented file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InsertionScript(pub Vec<ScriptOp>);

impl InsertionScript {
    pub fn new(ops: Vec<ScriptOp>) -> Self {
        Self(ops)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ops(&self) -> &[ScriptOp] {
        &self.0
    }

    /// Every op's anchor line, in application order (as authored — callers
    /// that need descending-order application sort this themselves).
    pub fn anchor_lines(&self) -> Vec<usize> {
        self.0.iter().map(ScriptOp::anchor_line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_matches_only_its_exact_original_text() {
        let anchor = Anchor::new(3, "    return x + y");
        assert!(anchor.matches("    return x + y"));
        assert!(!anchor.matches("    return x - y"));
    }

    #[test]
    fn anchor_is_insensitive_to_trailing_line_endings() {
        let anchor = Anchor::new(1, "total += x\n");
        assert!(anchor.matches("total += x"));
        assert!(anchor.matches("total += x\r\n"));
    }
}
