//! Fast hash map and hash set type aliases.
//!
//! The index groups paths and canonical identifiers by string keys in several
//! places (walker de-duplication, duplicate-format grouping, conflict
//! detection). These aliases swap in the Fx hash algorithm from `rustc-hash`.
//!
//! # Examples
//!
//! ```
//! use dirsrc_core::{FxHashMap, fx_hash_map};
//!
//! let mut by_canonical: FxHashMap<&str, usize> = fx_hash_map();
//! *by_canonical.entry("http://x/p").or_default() += 1;
//! assert_eq!(by_canonical["http://x/p"], 1);
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_groups_by_key() {
        let mut map: FxHashMap<&str, Vec<u32>> = fx_hash_map();
        map.entry("a").or_default().push(1);
        map.entry("a").or_default().push(2);
        map.entry("b").or_default().push(3);

        assert_eq!(map.get("a"), Some(&vec![1, 2]));
        assert_eq!(map.get("b"), Some(&vec![3]));
        assert_eq!(map.get("c"), None);
    }

    #[test]
    fn test_fx_hash_set_deduplicates() {
        let mut set: FxHashSet<String> = fx_hash_set();
        assert!(set.insert("/root/a.xml".to_owned()));
        assert!(!set.insert("/root/a.xml".to_owned()));
        assert_eq!(set.len(), 1);
    }
}
