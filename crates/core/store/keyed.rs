//! Identity-keyed value store.

use rustc_hash::FxHashMap;

/// A map from identity string to value.
///
/// Adding an existing identity replaces its value. Iteration order is
/// unspecified. There is no internal synchronization: mutation needs `&mut`.
///
/// # Examples
///
/// ```
/// use geocluster::store::KeyedSet;
///
/// let mut set = KeyedSet::new();
/// set.add("a", 1);
/// set.add("a", 2);
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.get("a"), Some(&2));
/// ```
#[derive(Debug, Clone)]
pub struct KeyedSet<V> {
    entries: FxHashMap<String, V>,
}

impl<V> KeyedSet<V> {
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert or replace. Returns the previous value for `id`, if any.
    pub fn add(&mut self, id: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(id.into(), value)
    }

    /// Remove `id`, returning its value. Absent identities are a no-op.
    pub fn remove(&mut self, id: &str) -> Option<V> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of present entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All present values, in no particular order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// All `(id, value)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(id, value)| (id.as_str(), value))
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &mut V) -> bool) {
        self.entries.retain(|id, value| keep(id, value));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V> Default for KeyedSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for KeyedSet<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (id, value) in iter {
            set.add(id, value);
        }
        set
    }
}
