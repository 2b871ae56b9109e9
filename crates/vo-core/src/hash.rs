//! Fast hash map type aliases.
//!
//! Parameter indices are small maps keyed by short strings and use the Fx
//! hash from `rustc-hash`.

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Creates a new empty [`FxHashMap`].
///
/// # Examples
///
/// ```
/// use vo_core::fx_hash_map;
///
/// let map: vo_core::FxHashMap<String, usize> = fx_hash_map();
/// assert!(map.is_empty());
/// ```
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fx_hash_map_operations() {
        let mut map: FxHashMap<&str, usize> = fx_hash_map();
        map.insert("POS", 0);
        map.insert("BAND", 1);
        assert_eq!(map.get("BAND"), Some(&1));
        assert_eq!(map.get("TIME"), None);
    }
}
