// SPDX-FileCopyrightText: © 2025 Claudio Cicconetti <c.cicconetti@iit.cnr.it>
// SPDX-License-Identifier: MIT

/// Map from string keys to values that remembers the insertion order.
///
/// Two maps are equal only if they hold the same entries in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the index of `key` in the insertion order, if present.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Set the value of `key`.
    ///
    /// An existing key keeps its position, a new key is appended at the end.
    /// Return the previous value, if any.
    pub fn insert_or_update(&mut self, key: &str, value: V) -> Option<V> {
        match self.position(key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key.to_string(), value));
                None
            }
        }
    }

    /// Set the value of `key` and move it to the end, wherever it was before.
    /// Return the previous value, if any.
    pub fn reinsert(&mut self, key: &str, value: V) -> Option<V> {
        let old = self.remove(key);
        self.entries.push((key.to_string(), value));
        old
    }

    /// Remove `key`, the relative order of the other entries is unchanged.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert_or_update(k.as_ref(), v);
        }
        map
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V: serde::Serialize> serde::Serialize for OrderedMap<V> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::OrderedMap;

    fn abc() -> OrderedMap<u32> {
        [("a", 1), ("b", 2), ("c", 3)].into_iter().collect()
    }

    #[test]
    fn test_ordered_map_insert_or_update_keeps_position() {
        let mut map = abc();
        assert_eq!(Some(1), map.insert_or_update("a", 10));
        assert_eq!(None, map.insert_or_update("d", 4));
        assert_eq!(vec!["a", "b", "c", "d"], map.keys().collect::<Vec<_>>());
        assert_eq!(vec![10, 2, 3, 4], map.values().cloned().collect::<Vec<_>>());
    }

    #[test]
    fn test_ordered_map_reinsert_moves_to_end() {
        let mut map = abc();
        assert_eq!(Some(1), map.reinsert("a", 10));
        assert_eq!(vec!["b", "c", "a"], map.keys().collect::<Vec<_>>());
        assert_eq!(Some(&10), map.get("a"));
    }

    #[test]
    fn test_ordered_map_remove() {
        let mut map = abc();
        assert_eq!(Some(2), map.remove("b"));
        assert_eq!(None, map.remove("b"));
        assert_eq!(vec!["a", "c"], map.keys().collect::<Vec<_>>());
        assert!(!map.contains_key("b"));
        assert_eq!(Some(1), map.position("c"));
    }

    #[test]
    fn test_ordered_map_equality_is_order_sensitive() {
        let reversed: OrderedMap<u32> = [("c", 3), ("b", 2), ("a", 1)].into_iter().collect();
        assert_ne!(abc(), reversed);
        assert_eq!(abc(), abc());
    }

    #[test]
    fn test_ordered_map_serialize() -> anyhow::Result<()> {
        assert_eq!(r#"{"a":1,"b":2,"c":3}"#, serde_json::to_string(&abc())?);
        Ok(())
    }
}
