//! Progress reporting hook.
//!
//! Progress logging is named as an external-collaborator concern in
//! spec.md §1 — the core never decides *how* progress is surfaced (a
//! progress bar, a log line, a websocket push), only *that* it happens.
//! Default methods are no-ops, same pattern as `DriftEventHandler`.

use crate::types::language::Language;

pub trait ProgressSink: Send + Sync {
    fn on_construct_started(&self, _language: Language, _construct_kind: &str) {}
    fn on_construct_finished(&self, _language: Language, _construct_kind: &str, _attempts: u32, _ok: bool) {}
    fn on_file_finished(&self, _path: &str, _ok: bool) {}
}

/// A `ProgressSink` that discards everything — the default when the caller
/// doesn't care to observe progress.
#[derive(Default)]
pub struct NoOpProgressSink;

impl ProgressSink for NoOpProgressSink {}
