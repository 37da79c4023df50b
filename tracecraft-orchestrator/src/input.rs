//! `ProcessFileInput` — everything `process_file` needs, gathered in one
//! place so the signature stays a single argument (spec.md §6).

use std::path::PathBuf;
use std::sync::Arc;

use tracecraft_core::{CancellationToken, Language, ModelClient, OrchestratorConfig};
use tracecraft_validate::BuildCommands;

pub struct ProcessFileInput {
    pub path: PathBuf,
    pub source: Vec<u8>,
    pub language: Language,
    pub runtime_api_version: u32,
    pub model: Arc<dyn ModelClient>,
    pub cache_root: PathBuf,
    pub learning_root: PathBuf,
    pub config: OrchestratorConfig,
    pub cancellation: CancellationToken,
    /// Build commands for `requires_build` languages; see
    /// `tracecraft_validate::BuildCommands`.
    pub build_commands: BuildCommands,
    /// `(file name, contents)` for the language-appropriate runtime-utility
    /// template, written verbatim alongside the instrumented file.
    pub runtime_template: Option<(String, Vec<u8>)>,
}
