//! `ScriptCache` — the C5 public surface: `lookup`, `store`, `mark_failure`,
//! `mark_success`, `invalidate`, `version_sweep` (spec.md §4.5).

use std::fs::OpenOptions;
use std::path::PathBuf;

use chrono::Utc;
use moka::sync::Cache;

use tracecraft_core::types::language::Language;
use tracecraft_script::{Fingerprint, InsertionScript, ScriptRecord};

use crate::disk;
use crate::error::CacheError;
use crate::version::VersionFile;

const DEFAULT_FAILURE_STREAK_LIMIT: u32 = 3;

/// Two-layer content-addressed cache: an in-memory Moka hot layer in front
/// of the on-disk tree. A single file's processing never holds an
/// exclusive cache lock; only per-key counter updates take an advisory
/// lock, scoped to the update itself.
pub struct ScriptCache {
    root: PathBuf,
    memory: Cache<String, ScriptRecord>,
    version: VersionFile,
    failure_streak_limit: u32,
}

impl ScriptCache {
    pub fn new(root: impl Into<PathBuf>, memory_capacity: u64) -> Self {
        let root = root.into();
        Self {
            version: VersionFile::new(&root),
            root,
            memory: Cache::new(memory_capacity),
            failure_streak_limit: DEFAULT_FAILURE_STREAK_LIMIT,
        }
    }

    pub fn with_failure_streak_limit(mut self, limit: u32) -> Self {
        self.failure_streak_limit = limit;
        self
    }

    /// Look up a record. Never returns a record whose
    /// `runtime_api_version` doesn't match `current_api_version` — a
    /// stale record here is as good as a miss.
    pub fn lookup(
        &self,
        language: Language,
        fingerprint: &Fingerprint,
        current_api_version: u32,
    ) -> Result<Option<ScriptRecord>, CacheError> {
        let key = fingerprint.to_hex();
        if let Some(record) = self.memory.get(&key) {
            if record.runtime_api_version == current_api_version {
                return Ok(Some(record));
            }
            self.memory.invalidate(&key);
            return Ok(None);
        }

        let path = disk::path_for(&self.root, language, fingerprint);
        match disk::read(&path)? {
            Some(record) if record.runtime_api_version == current_api_version => {
                self.memory.insert(key, record.clone());
                Ok(Some(record))
            }
            _ => Ok(None),
        }
    }

    pub fn store(
        &self,
        language: Language,
        fingerprint: Fingerprint,
        script: InsertionScript,
        runtime_api_version: u32,
    ) -> Result<(), CacheError> {
        let record = ScriptRecord::new(fingerprint, script, runtime_api_version, Utc::now());
        let path = disk::path_for(&self.root, language, &fingerprint);
        disk::write_atomic(&path, &record)?;
        self.memory.insert(fingerprint.to_hex(), record);
        Ok(())
    }

    pub fn mark_success(&self, language: Language, fingerprint: &Fingerprint) -> Result<(), CacheError> {
        self.with_locked_record(language, fingerprint, |record| {
            record.record_hit();
            record.record_success(Utc::now());
        })
    }

    /// Increments the failure streak; evicts the entry once it crosses
    /// the configured limit (default 3).
    pub fn mark_failure(&self, language: Language, fingerprint: &Fingerprint) -> Result<(), CacheError> {
        let limit = self.failure_streak_limit;
        let mut evicted = false;
        self.with_locked_record(language, fingerprint, |record| {
            record.record_failure();
            evicted = record.should_evict(limit);
        })?;
        if evicted {
            self.invalidate(language, fingerprint)?;
        }
        Ok(())
    }

    pub fn invalidate(&self, language: Language, fingerprint: &Fingerprint) -> Result<(), CacheError> {
        self.memory.invalidate(&fingerprint.to_hex());
        let path = disk::path_for(&self.root, language, fingerprint);
        disk::remove(&path)
    }

    /// Evict every on-disk entry whose stored API version doesn't match
    /// `current_api_version`, then record the new version. Returns the
    /// number of entries evicted.
    pub fn version_sweep(&self, current_api_version: u32) -> Result<usize, CacheError> {
        let mut evicted = 0;
        for (path, record) in disk::walk_all(&self.root)? {
            if record.runtime_api_version != current_api_version {
                disk::remove(&path)?;
                self.memory.invalidate(&record.fingerprint.to_hex());
                evicted += 1;
            }
        }
        self.version.write(current_api_version)?;
        Ok(evicted)
    }

    /// Read-modify-write one disk record under an exclusive advisory lock
    /// scoped to this call, mirroring `drift_core::workspace::lock`.
    fn with_locked_record(
        &self,
        language: Language,
        fingerprint: &Fingerprint,
        mutate: impl FnOnce(&mut ScriptRecord),
    ) -> Result<(), CacheError> {
        let path = disk::path_for(&self.root, language, fingerprint);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let lock_path = path.with_extension("json.lock");
        let lock_file = OpenOptions::new().create(true).write(true).open(&lock_path)?;
        let mut lock = fd_lock::RwLock::new(lock_file);
        let _guard = lock.try_write().map_err(|_| CacheError::Locked {
            fingerprint: fingerprint.to_hex(),
        })?;

        let Some(mut record) = disk::read(&path)? else {
            return Ok(());
        };
        mutate(&mut record);
        disk::write_atomic(&path, &record)?;
        self.memory.insert(fingerprint.to_hex(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracecraft_analysis::ConstructKind;

    fn fp(n: u32) -> Fingerprint {
        Fingerprint::of(Language::Go, ConstructKind::Function, &format!("func f{n}() {{}}"), 1, 1)
    }

    #[test]
    fn store_then_lookup_is_a_hit() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScriptCache::new(dir.path(), 100);
        let fingerprint = fp(1);
        cache
            .store(Language::Go, fingerprint, InsertionScript::default(), 1)
            .unwrap();

        let hit = cache.lookup(Language::Go, &fingerprint, 1).unwrap();
        assert!(hit.is_some());
    }

    #[test]
    fn lookup_rejects_mismatched_api_version() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScriptCache::new(dir.path(), 100);
        let fingerprint = fp(2);
        cache
            .store(Language::Go, fingerprint, InsertionScript::default(), 1)
            .unwrap();

        let miss = cache.lookup(Language::Go, &fingerprint, 2).unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn failure_streak_past_limit_evicts_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScriptCache::new(dir.path(), 100).with_failure_streak_limit(2);
        let fingerprint = fp(3);
        cache
            .store(Language::Go, fingerprint, InsertionScript::default(), 1)
            .unwrap();

        cache.mark_failure(Language::Go, &fingerprint).unwrap();
        assert!(cache.lookup(Language::Go, &fingerprint, 1).unwrap().is_some());
        cache.mark_failure(Language::Go, &fingerprint).unwrap();
        assert!(cache.lookup(Language::Go, &fingerprint, 1).unwrap().is_none());
    }

    #[test]
    fn version_sweep_evicts_stale_entries_and_records_new_version() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ScriptCache::new(dir.path(), 100);
        let fingerprint = fp(4);
        cache
            .store(Language::Go, fingerprint, InsertionScript::default(), 1)
            .unwrap();

        let evicted = cache.version_sweep(2).unwrap();
        assert_eq!(evicted, 1);
        assert_eq!(cache.version.read().unwrap(), Some(2));
    }
}
