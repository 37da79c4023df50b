//! # tracecraft-learning
//!
//! C9 Learning Store: an append-only per-language log of `LearningRecord`s,
//! consolidated into `Pattern`s and exposed as a relevance-ordered
//! prompt-injection view for C4's slow path and C8's repair prompts.

pub mod consolidate;
pub mod record;
pub mod store;

pub use consolidate::consolidate;
pub use record::LearningRecord;
pub use store::{LearningStore, Pattern, StoreError};
