//! The languages this engine instruments.
//!
//! Adding a language is adding one variant plus one entry in each of the
//! dispatch tables downstream (`tracecraft-analysis`'s parser table,
//! `tracecraft-validate`'s validator table) — see spec.md's DESIGN NOTES on
//! replacing dynamic dispatch with a tagged variant.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Go,
}

impl Language {
    /// Detect a language from a file extension (no leading dot).
    pub fn from_extension(ext: Option<&str>) -> Option<Self> {
        match ext?.to_ascii_lowercase().as_str() {
            "py" | "pyi" => Some(Self::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Self::JavaScript),
            "ts" | "tsx" => Some(Self::TypeScript),
            "go" => Some(Self::Go),
            _ => None,
        }
    }

    /// Stable lowercase identifier, used as the cache's first path
    /// component and in learning-store pattern keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Go => "go",
        }
    }

    /// Whether the language requires a build step to validate, as opposed
    /// to being runnable/parseable directly. Drives C7's `config_error`
    /// rule: a `requires_build` language with no build command configured
    /// is a failure, never a silent success.
    pub fn requires_build(&self) -> bool {
        matches!(self, Self::Go)
    }

    /// Whether a `return` statement in this language can carry multiple
    /// values, which makes rewriting the return expression unsafe (spec.md
    /// DESIGN NOTES: "Return-rewriting risk"). The synthesizer must insert
    /// the exit call before the `return` instead.
    pub fn has_multi_value_return(&self) -> bool {
        matches!(self, Self::Go)
    }

    /// Whether a declared-but-unused local is a compile error in this
    /// language, forcing the synthesizer to either consume or inline the
    /// telemetry handle rather than ever leaving it unused.
    pub fn rejects_unused_locals(&self) -> bool {
        matches!(self, Self::Go)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_supported_extensions() {
        assert_eq!(Language::from_extension(Some("py")), Some(Language::Python));
        assert_eq!(Language::from_extension(Some("tsx")), Some(Language::TypeScript));
        assert_eq!(Language::from_extension(Some("go")), Some(Language::Go));
        assert_eq!(Language::from_extension(Some("rb")), None);
        assert_eq!(Language::from_extension(None), None);
    }

    #[test]
    fn only_go_requires_build_among_supported_languages() {
        assert!(Language::Go.requires_build());
        assert!(!Language::Python.requires_build());
        assert!(!Language::JavaScript.requires_build());
        assert!(!Language::TypeScript.requires_build());
    }
}
