//! # tracecraft-cache
//!
//! C5 Script Cache: a `moka::sync::Cache` hot layer (same construction as
//! the teacher's parse cache) in front of an on-disk content-addressed
//! tree, keyed by Fingerprint. Per-key counter updates go through an
//! `fd-lock`-guarded read-modify-write, mirroring `drift_core::workspace`.

pub mod disk;
pub mod error;
pub mod store;
pub mod version;

pub use error::CacheError;
pub use store::ScriptCache;
pub use version::VersionFile;
