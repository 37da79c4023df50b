//! Append-only per-language log of `LearningRecord`s plus the
//! prompt-injection view C4/C8 consult (spec.md §4.9).
//!
//! Concurrent appenders are safe via a per-language exclusive `fd-lock`
//! around the append, mirroring `drift_core::workspace::lock::WorkspaceLock`.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracecraft_analysis::ConstructKind;
use tracecraft_core::types::language::Language;

use crate::record::LearningRecord;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("learning store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed learning record on line {line}: {source}")]
    Malformed { line: usize, source: serde_json::Error },
    #[error("failed to acquire the learning store's append lock for {language}")]
    Locked { language: Language },
}

impl tracecraft_core::errors::ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        tracecraft_core::errors::error_code::LEARNING_STORE_ERROR
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}

/// One consolidated bad/good/why/how fragment, ready to be injected as
/// plain text into a generation prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub language: Language,
    pub construct_kind: ConstructKind,
    pub failure_pattern: String,
    pub bad_example: String,
    pub good_example: String,
    pub why: String,
    pub how: String,
    pub occurrence_count: usize,
    pub success_rate: f64,
}

/// Root directory holding one `<language>.jsonl` append-only file per
/// language.
pub struct LearningStore {
    root: PathBuf,
}

impl LearningStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, language: Language) -> PathBuf {
        self.root.join(format!("{}.jsonl", language.as_str()))
    }

    /// Append one record under an exclusive advisory lock. Never rewrites
    /// existing lines.
    pub fn append(&self, record: &LearningRecord) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(record.language);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut lock = fd_lock::RwLock::new(file);
        let mut guard = lock
            .try_write()
            .map_err(|_| StoreError::Locked { language: record.language })?;
        let line = serde_json::to_string(record).map_err(|e| StoreError::Malformed { line: 0, source: e })?;
        writeln!(guard, "{line}")?;
        guard.flush()?;
        Ok(())
    }

    pub fn load(&self, language: Language) -> Result<Vec<LearningRecord>, StoreError> {
        let path = self.path_for(language);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: LearningRecord =
                serde_json::from_str(&line).map_err(|e| StoreError::Malformed { line: idx + 1, source: e })?;
            records.push(record);
        }
        Ok(records)
    }

    pub fn load_all(&self) -> Result<Vec<LearningRecord>, StoreError> {
        let mut all = Vec::new();
        for language in [Language::Python, Language::JavaScript, Language::TypeScript, Language::Go] {
            all.extend(self.load(language)?);
        }
        Ok(all)
    }

    /// Up to `k` patterns for (language, construct_kind, failure_class),
    /// ordered by relevance: exact failure match first, then same
    /// construct kind, then same language (spec.md §4.9).
    pub fn prompt_view(
        &self,
        patterns: &[Pattern],
        language: Language,
        construct_kind: ConstructKind,
        failure_class: &str,
        k: usize,
    ) -> Vec<Pattern> {
        let mut scored: Vec<(u8, &Pattern)> = patterns
            .iter()
            .filter(|p| p.language == language)
            .map(|p| {
                let rank = if p.failure_pattern == failure_class {
                    0
                } else if p.construct_kind == construct_kind {
                    1
                } else {
                    2
                };
                (rank, p)
            })
            .collect();
        scored.sort_by_key(|(rank, _)| *rank);
        scored.into_iter().take(k).map(|(_, p)| p.clone()).collect()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
