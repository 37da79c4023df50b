//! Fast, non-cryptographic hash map/set aliases used wherever ordering
//! doesn't matter and the keys aren't attacker-controlled.

pub type FxHashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;
pub type FxHashSet<K> = std::collections::HashSet<K, rustc_hash::FxBuildHasher>;
