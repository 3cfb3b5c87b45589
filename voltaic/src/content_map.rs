use std::fmt;

use zwohash::HashMap;

/// A map keyed by the content of byte sequences.
///
/// Two keys are the same key when their bytes are equal, independent of where they are stored.
/// Lookups take a borrowed `&[u8]`, so a key can be looked up straight from an input buffer without
/// decoding or copying it first.
pub struct ContentMap<V> {
    entries: HashMap<Box<[u8]>, V>,
}

impl<V> Default for ContentMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ContentMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        ContentMap {
            entries: HashMap::default(),
        }
    }

    /// Inserts a copy of `key` mapped to `value`.
    ///
    /// If the key was already present, the value is replaced and the previous value returned.
    pub fn insert(&mut self, key: &[u8], value: V) -> Option<V> {
        if let Some(slot) = self.entries.get_mut(key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.insert(key.into(), value);
        None
    }

    /// Returns the value stored for a key with the same content as `key`.
    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns `true` if a key with the same content as `key` is present.
    #[inline]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &V)> {
        self.entries.iter().map(|(key, value)| (&**key, value))
    }
}

impl<K: AsRef<[u8]>, V> FromIterator<(K, V)> for ContentMap<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key.as_ref(), value);
        }
        map
    }
}

impl<V: fmt::Debug> fmt::Debug for ContentMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(key, value)| (bstr::BStr::new(&**key), value)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_content() {
        let mut map = ContentMap::new();
        assert_eq!(map.insert(b"red", 1), None);
        assert_eq!(map.insert(b"green", 2), None);

        let wire = b"{\"color\":\"green\"}".to_vec();
        assert_eq!(map.get(&wire[10..15]), Some(&2));
        assert_eq!(map.get(b"blue"), None);
        assert!(map.contains_key(b"red"));
    }

    #[test]
    fn insert_reports_previous() {
        let mut map = ContentMap::new();
        map.insert(b"a", 1);
        assert_eq!(map.insert(b"a", 2), Some(1));
        assert_eq!(map.get(b"a"), Some(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn empty_key() {
        let map: ContentMap<_> = [("", 'e'), ("x", 'x')].into_iter().collect();
        assert_eq!(map.get(b""), Some(&'e'));
        assert_eq!(map.len(), 2);
        assert!(!map.is_empty());
    }
}
