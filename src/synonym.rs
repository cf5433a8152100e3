use std::collections::btree_map::{self, BTreeMap};
use std::iter::FromIterator;

/// A map where some keys are aliases of others.
///
/// Values only ever live under their canonical key. A synonym is a second
/// name for a canonical key and resolves to it on lookup.
#[derive(Clone, PartialEq)]
pub struct SynonymMap<K, V> {
    vals: BTreeMap<K, V>,
    syns: BTreeMap<K, K>,
}

impl<K: Ord, V> SynonymMap<K, V> {
    pub fn new() -> SynonymMap<K, V> {
        SynonymMap {
            vals: BTreeMap::new(),
            syns: BTreeMap::new(),
        }
    }

    /// Makes `from` an alias of `to`.
    ///
    /// Returns `false` (and does nothing) when `to` has no value or `from`
    /// is already a canonical key.
    pub fn insert_synonym(&mut self, from: K, to: K) -> bool {
        if !self.vals.contains_key(&to) || self.vals.contains_key(&from) {
            return false;
        }
        self.syns.insert(from, to);
        true
    }

    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        self.syns.remove(&k);
        self.vals.insert(k, v)
    }

    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.vals.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.vals.iter()
    }

    pub fn synonyms(&self) -> btree_map::Iter<'_, K, K> {
        self.syns.iter()
    }

    /// Maps a key through the synonym table.
    pub fn resolve<'a>(&'a self, k: &'a K) -> &'a K {
        self.syns.get(k).unwrap_or(k)
    }

    pub fn find(&self, k: &K) -> Option<&V> {
        self.vals.get(self.resolve(k))
    }

    pub fn contains_key(&self, k: &K) -> bool {
        self.vals.contains_key(self.resolve(k))
    }

    pub fn len(&self) -> usize {
        self.vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }
}

impl<K: Ord, V> Default for SynonymMap<K, V> {
    fn default() -> SynonymMap<K, V> {
        SynonymMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SynonymMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> SynonymMap<K, V> {
        let mut map = SynonymMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
