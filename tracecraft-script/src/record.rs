//! `ScriptRecord` — the on-disk/in-memory cache payload (spec.md §3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::script::InsertionScript;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptRecord {
    #[serde(with = "fingerprint_hex")]
    pub fingerprint: Fingerprint,
    pub script: InsertionScript,
    pub created_at: DateTime<Utc>,
    pub hit_count: u64,
    pub last_validated_ok: Option<DateTime<Utc>>,
    pub failure_streak: u32,
    pub runtime_api_version: u32,
}

impl ScriptRecord {
    pub fn new(fingerprint: Fingerprint, script: InsertionScript, runtime_api_version: u32, now: DateTime<Utc>) -> Self {
        Self {
            fingerprint,
            script,
            created_at: now,
            hit_count: 0,
            last_validated_ok: Some(now),
            failure_streak: 0,
            runtime_api_version,
        }
    }

    pub fn record_hit(&mut self) {
        self.hit_count += 1;
    }

    pub fn record_success(&mut self, now: DateTime<Utc>) {
        self.failure_streak = 0;
        self.last_validated_ok = Some(now);
    }

    pub fn record_failure(&mut self) {
        self.failure_streak += 1;
    }

    /// Default eviction threshold per spec.md §4.5: failure streak ≥ 3.
    pub fn should_evict(&self, failure_streak_limit: u32) -> bool {
        self.failure_streak >= failure_streak_limit
    }
}

mod fingerprint_hex {
    use super::Fingerprint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(fp: &Fingerprint, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&fp.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Fingerprint, D::Error> {
        let hex = String::deserialize(d)?;
        let hash = blake3::Hash::from_hex(&hex).map_err(serde::de::Error::custom)?;
        Ok(Fingerprint::from_hash(hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracecraft_analysis::ConstructKind;
    use tracecraft_core::types::language::Language;

    #[test]
    fn failure_streak_crosses_eviction_threshold_at_configured_limit() {
        let fp = Fingerprint::of(Language::Go, ConstructKind::Function, "func f() {}", 1, 1);
        let mut record = ScriptRecord::new(fp, InsertionScript::default(), 1, Utc::now());
        for _ in 0..2 {
            record.record_failure();
        }
        assert!(!record.should_evict(3));
        record.record_failure();
        assert!(record.should_evict(3));
    }

    #[test]
    fn success_resets_failure_streak() {
        let fp = Fingerprint::of(Language::Go, ConstructKind::Function, "func f() {}", 1, 1);
        let mut record = ScriptRecord::new(fp, InsertionScript::default(), 1, Utc::now());
        record.record_failure();
        record.record_failure();
        record.record_success(Utc::now());
        assert_eq!(record.failure_streak, 0);
    }
}
