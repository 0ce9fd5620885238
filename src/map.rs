mod inorder;

pub use inorder::*;

use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Index;

use compare::{Compare, Natural};

use crate::error::Error;
use crate::tree::{self, AvlTree, Handle};

/// An owning in-order iterator over the entries of a map
pub type IntoIter<K, V> = tree::IntoIter<(K, V)>;

/// Orders key/value pairs by their keys only
#[derive(Debug, Clone, Default)]
struct ByKey<C>(C);

impl<K, V, C: Compare<K>> Compare<(K, V)> for ByKey<C> {
    fn compare(&self, left: &(K, V), right: &(K, V)) -> Ordering {
        self.0.compare(&left.0, &right.0)
    }
}

/// An ordered map based on a self-balancing binary search tree
///
/// Each key appears at most once. Entries are kept in the order given by the key comparator `C`.
/// Positions returned as [`Handle`]s stay valid until the entry they refer to is erased.
///
/// The behavior of this map is unspecified if a key's ordering relative to any other key changes
/// while the key is in the map.
#[derive(Clone)]
pub struct AvlMap<K, V, C = Natural<K>> {
    tree: AvlTree<(K, V), ByKey<C>>,
}

impl<K, V, C: Default> Default for AvlMap<K, V, C> {
    fn default() -> Self {
        Self::with_cmp(C::default())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for AvlMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlMap<K, V, C> {}

impl<K: Ord, V> AvlMap<K, V> {
    /// Creates an empty map ordered by the natural order of its keys
    pub fn new() -> Self {
        Self::with_cmp(compare::natural())
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    /// Creates an empty map ordered by the given key comparator
    pub fn with_cmp(cmp: C) -> Self {
        Self {tree: AvlTree::with_cmp(ByKey(cmp))}
    }

    /// Returns a reference to the key comparator of this map
    pub fn cmp(&self) -> &C {
        &self.tree.cmp().0
    }

    /// Returns the number of entries in the map
    ///
    /// Time complexity: `O(1)`
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the map contains no entries
    ///
    /// Time complexity: `O(1)`
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The largest number of entries a map of this type could theoretically hold
    pub fn max_size(&self) -> usize {
        self.tree.max_size()
    }

    /// Removes every entry from the map
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Exchanges the contents of two maps
    pub fn swap(&mut self, other: &mut Self) {
        self.tree.swap(&mut other.tree);
    }

    /// Returns the position of the entry with the smallest key, or the end sentinel
    pub fn begin(&self) -> Handle {
        self.tree.begin()
    }

    /// Returns the end sentinel
    pub fn end(&self) -> Handle {
        self.tree.end()
    }

    /// Returns the position after `pos`, wrapping from the end sentinel to the first entry
    pub fn next(&self, pos: Handle) -> Result<Handle, Error> {
        self.tree.next(pos)
    }

    /// Returns the position before `pos`, wrapping from the end sentinel to the last entry
    pub fn prev(&self, pos: Handle) -> Result<Handle, Error> {
        self.tree.prev(pos)
    }

    /// Returns the entry at `pos`
    pub fn get_at(&self, pos: Handle) -> Result<(&K, &V), Error> {
        let (key, value) = self.tree.get_at(pos)?;
        Ok((key, value))
    }

    /// Returns the entry at `pos` with a mutable reference to its value
    pub fn get_at_mut(&mut self, pos: Handle) -> Result<(&K, &mut V), Error> {
        let (key, value) = self.tree.get_at_mut(pos)?;
        Ok((&*key, value))
    }

    /// Erases the entry at `pos` and returns it
    ///
    /// Fails with [`Error::InvalidPosition`] for the end sentinel or an erased position.
    pub fn erase(&mut self, pos: Handle) -> Result<(K, V), Error> {
        self.tree.erase(pos)
    }

    /// Iterates over the entries of the map in key order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.tree.iter())
    }

    /// Iterates over the entries of the map in key order with mutable references to the values
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self.tree.iter_mut())
    }

    /// Iterates over the keys of the map in order
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Iterates over the values of the map in key order
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Iterates over mutable references to the values of the map in key order
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut::new(self.iter_mut())
    }
}

impl<K, V, C: Compare<K>> AvlMap<K, V, C> {
    /// Inserts an entry unless the key is already present
    ///
    /// Returns the position of the new entry and `true`, or the position of the existing entry and
    /// `false`. An existing value is never overwritten, see [`AvlMap::insert_or_assign`] for that.
    ///
    /// Time complexity: `O(log n)`
    pub fn insert(&mut self, key: K, value: V) -> (Handle, bool) {
        self.tree.insert((key, value))
    }

    /// Inserts a key/value pair unless the key is already present
    pub fn insert_pair(&mut self, entry: (K, V)) -> (Handle, bool) {
        self.tree.insert(entry)
    }

    /// Inserts an entry, or overwrites the value if the key is already present
    ///
    /// Overwriting keeps the entry in place, so its position does not change. Returns the position
    /// of the entry and whether a new entry was inserted.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Handle, bool) {
        let pos = self.find(&key);
        if let Ok(entry) = self.tree.get_at_mut(pos) {
            entry.1 = value;
            return (pos, false);
        }

        self.insert(key, value)
    }

    /// Inserts every entry of `entries` with [`AvlMap::insert`], returning the result of each
    pub fn insert_many<I>(&mut self, entries: I) -> Vec<(Handle, bool)>
        where I: IntoIterator<Item=(K, V)>,
    {
        self.tree.insert_many(entries)
    }

    /// Returns the position of the entry with the given key, or the end sentinel
    ///
    /// Time complexity: `O(log n)`
    pub fn find(&self, key: &K) -> Handle {
        let cmp = self.cmp();
        self.tree.find_by(|entry| cmp.compare(&entry.0, key))
    }

    /// Returns the position of the first entry whose key is not less than `key`
    pub fn lower_bound(&self, key: &K) -> Handle {
        let cmp = self.cmp();
        self.tree.lower_bound_by(|entry| cmp.compare(&entry.0, key))
    }

    /// Returns the position of the first entry whose key is greater than `key`
    pub fn upper_bound(&self, key: &K) -> Handle {
        let cmp = self.cmp();
        self.tree.upper_bound_by(|entry| cmp.compare(&entry.0, key))
    }

    /// Returns true if the map contains the given key
    pub fn contains(&self, key: &K) -> bool {
        !self.find(key).is_end()
    }

    /// Returns a reference to the value for the given key, or `None` if the key is not present
    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get_at(self.find(key)).ok().map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value for the given key, or `None` if the key is not
    /// present
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let pos = self.find(key);
        self.tree.get_at_mut(pos).ok().map(|(_, value)| value)
    }

    /// Returns a reference to the value for the given key
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is not present.
    pub fn at(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value for the given key
    ///
    /// Fails with [`Error::KeyNotFound`] if the key is not present.
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, Error> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value for the given key, inserting the default value
    /// first if the key is not present
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
        where V: Default,
    {
        let mut pos = self.find(&key);
        if pos.is_end() {
            pos = self.insert(key, V::default()).0;
        }

        match self.tree.get_at_mut(pos) {
            Ok((_, value)) => value,
            Err(_) => unreachable!("bug: entry missing right after lookup or insertion"),
        }
    }

    /// Removes the entry with the given key and returns its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let pos = self.find(key);
        self.tree.erase(pos).ok().map(|(_, value)| value)
    }

    /// Moves every entry of `other` into this map
    ///
    /// Entries whose key is already present in this map are dropped. `other` is left empty.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge(&mut other.tree);
    }
}

impl<K, V, C: Compare<K>> Index<&K> for AvlMap<K, V, C> {
    type Output = V;

    /// Returns a reference to the value for the given key
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for AvlMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for AvlMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C> IntoIterator for AvlMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut AvlMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;

    use rand::prelude::*;

    #[test]
    fn test_map_insert_get() {
        let mut map = AvlMap::new();

        assert!(!map.contains(&3));
        assert_eq!(map.get(&3), None);
        assert!(map.insert(3, "three").1);
        assert_eq!(map.get(&3), Some(&"three"));

        assert!(map.insert(1, "one").1);
        assert!(map.insert(2, "two").1);
        assert_eq!(map.len(), 3);

        // Inserting an existing key does not overwrite
        let (pos, inserted) = map.insert(2, "deux");
        assert!(!inserted);
        assert_eq!(map.get_at(pos), Ok((&2, &"two")));
        assert_eq!(map.len(), 3);

        let pairs: Vec<_> = map.iter().map(|(&key, &value)| (key, value)).collect();
        assert_eq!(pairs, vec![(1, "one"), (2, "two"), (3, "three")]);
    }

    #[test]
    fn insert_or_assign() {
        let mut map = AvlMap::new();
        let (first, inserted) = map.insert_or_assign("a", 1);
        assert!(inserted);

        let (pos, inserted) = map.insert_or_assign("a", 2);
        assert!(!inserted);
        // Overwriting keeps the entry where it was
        assert_eq!(pos, first);
        assert_eq!(map.at(&"a"), Ok(&2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn at_and_index() {
        let mut map: AvlMap<_, _> = vec![(1, 10), (2, 20)].into_iter().collect();

        assert_eq!(map.at(&1), Ok(&10));
        assert_eq!(map.at(&5), Err(Error::KeyNotFound));
        *map.at_mut(&2).unwrap() += 1;
        assert_eq!(map[&2], 21);
        assert_eq!(map.at_mut(&7), Err(Error::KeyNotFound));

        // The failed lookups did not insert anything
        assert_eq!(map.len(), 2);
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_missing_key() {
        let map: AvlMap<i32, i32> = AvlMap::new();
        let _value: i32 = map[&1];
    }

    #[test]
    fn get_or_insert_default() {
        let mut counts: AvlMap<&str, usize> = AvlMap::new();
        for word in "the quick fox jumps over the lazy fox".split(' ') {
            *counts.get_or_insert_default(word) += 1;
        }

        assert_eq!(counts.at(&"the"), Ok(&2));
        assert_eq!(counts.at(&"fox"), Ok(&2));
        assert_eq!(counts.at(&"lazy"), Ok(&1));
        assert_eq!(counts.len(), 6);

        // Reading through the index operator of a missing key inserts the default
        assert_eq!(*counts.get_or_insert_default("dog"), 0);
        assert_eq!(counts.len(), 7);
    }

    #[test]
    fn merge_maps() {
        let mut map: AvlMap<_, _> = vec![(1, 2), (2, 3), (3, 4), (4, 5)].into_iter().collect();
        let mut other: AvlMap<_, _> = vec![(5, 6), (6, 7)].into_iter().collect();

        map.merge(&mut other);

        assert_eq!(map.len(), 6);
        assert_eq!(map.at(&5), Ok(&6));
        assert_eq!(map.at(&1), Ok(&2));
        assert!(other.is_empty());

        // Keys already present keep their values
        let mut other: AvlMap<_, _> = vec![(1, 100), (7, 8)].into_iter().collect();
        map.merge(&mut other);
        assert_eq!(map.at(&1), Ok(&2));
        assert_eq!(map.at(&7), Ok(&8));
        assert!(other.is_empty());
    }

    #[test]
    fn erase_and_remove() {
        let mut map: AvlMap<_, _> = (0..10).map(|i| (i, i * i)).collect();

        let pos = map.find(&3);
        assert_eq!(map.erase(pos), Ok((3, 9)));
        assert!(map.find(&3).is_end());
        assert_eq!(map.erase(pos), Err(Error::InvalidPosition));
        assert_eq!(map.erase(map.end()), Err(Error::InvalidPosition));

        assert_eq!(map.remove(&4), Some(16));
        assert_eq!(map.remove(&4), None);
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn bounds_and_navigation() {
        let map: AvlMap<_, _> = vec![(10, 'a'), (20, 'b'), (30, 'c')].into_iter().collect();

        assert_eq!(map.get_at(map.lower_bound(&15)), Ok((&20, &'b')));
        assert_eq!(map.get_at(map.upper_bound(&20)), Ok((&30, &'c')));
        assert!(map.upper_bound(&30).is_end());

        let last = map.prev(map.end()).unwrap();
        assert_eq!(map.get_at(last), Ok((&30, &'c')));
        assert_eq!(map.next(last).unwrap(), map.end());
        assert_eq!(map.next(map.end()).unwrap(), map.begin());
    }

    #[test]
    fn iterators() {
        let mut map: AvlMap<_, _> = vec![("b", 2), ("a", 1), ("c", 3)].into_iter().collect();

        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(map.iter().rev().next(), Some((&"c", &3)));

        for value in map.values_mut() {
            *value *= 10;
        }
        for (key, value) in &mut map {
            if *key == "a" {
                *value += 1;
            }
        }

        let (_, value) = map.get_at_mut(map.begin()).unwrap();
        *value += 1;

        assert_eq!(map.into_iter().collect::<Vec<_>>(), vec![("a", 12), ("b", 20), ("c", 30)]);
    }

    #[test]
    fn custom_comparator() {
        let mut map = AvlMap::with_cmp(compare::natural().rev());
        map.insert_many(vec![(1, "x"), (3, "y"), (2, "z")]);

        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert!(map.cmp().compares_gt(&1, &2));
        assert_eq!(format!("{:?}", map), r#"{3: "y", 2: "z", 1: "x"}"#);
    }

    #[test]
    fn clone_swap_clear() {
        let mut map: AvlMap<_, _> = (0..4).map(|i| (i, i.to_string())).collect();
        let mut copy = map.clone();
        assert_eq!(map, copy);

        copy.insert_or_assign(0, "zero".to_string());
        assert_ne!(map, copy);
        assert_eq!(map.at(&0).map(String::as_str), Ok("0"));

        let mut empty = AvlMap::new();
        map.swap(&mut empty);
        assert!(map.is_empty());
        assert_eq!(empty.len(), 4);

        empty.clear();
        assert!(empty.is_empty());
        assert_eq!(empty.begin(), empty.end());
        assert!(empty.max_size() > 0);
    }

    #[test]
    fn test_random_operations() {
        cfg_if::cfg_if! {
            if #[cfg(miri)] {
                const TEST_CASES: usize = 16;
                const OPERATIONS: usize = 24;

                (0..TEST_CASES).into_iter().for_each(|_| test_case());

            } else {
                use rayon::prelude::*;

                const TEST_CASES: usize = 512;
                const OPERATIONS: usize = 128;

                (0..TEST_CASES).into_par_iter().for_each(|_| test_case());
            }
        }

        fn test_case() {
            let mut map = AvlMap::new();
            // Compare against a BTreeMap
            let mut expected = BTreeMap::new();
            // The list of keys that have been inserted
            let mut keys = Vec::new();

            let mut rng = rand::thread_rng();
            for _ in 0..rng.gen_range(OPERATIONS..=OPERATIONS*2) {
                assert_eq!(map.is_empty(), expected.is_empty());
                assert_eq!(map.len(), expected.len());

                match rng.gen_range(1..=100) {
                    // Check for a key that hasn't been inserted
                    1..=15 => {
                        // Not inserting any negative numbers
                        let key = -rng.gen_range(1..=64);
                        assert_eq!(map.get(&key), expected.get(&key));
                        assert_eq!(map.at(&key), Err(Error::KeyNotFound));
                    },

                    // Check for a key that has been inserted
                    16..=30 => {
                        let key = match keys.choose(&mut rng).copied() {
                            Some(key) => key,
                            None => continue,
                        };

                        assert_eq!(map.get(&key), expected.get(&key));
                    },

                    // Remove an existing key
                    31..=50 => {
                        let key = match keys.choose(&mut rng).copied() {
                            Some(key) => key,
                            None => continue,
                        };

                        assert_eq!(map.remove(&key), expected.remove(&key));
                        // Should always return `None`
                        assert_eq!(map.remove(&key), expected.remove(&key));
                    },

                    // Insert or overwrite a value
                    51..=75 => {
                        let key = rng.gen_range(0..=64);
                        let value: u16 = rng.gen();
                        keys.push(key);

                        let (_, inserted) = map.insert_or_assign(key, value);
                        assert_eq!(inserted, expected.insert(key, value).is_none());
                    },

                    // Insert without overwriting
                    76..=100 => {
                        let key = rng.gen_range(0..=64);
                        let value: u16 = rng.gen();
                        keys.push(key);

                        let (pos, inserted) = map.insert(key, value);
                        assert_eq!(inserted, !expected.contains_key(&key));
                        let current = *expected.entry(key).or_insert(value);
                        assert_eq!(map.get_at(pos), Ok((&key, &current)));
                    },

                    _ => unreachable!(),
                }
            }

            let pairs: Vec<_> = map.iter().map(|(&key, &value)| (key, value)).collect();
            let expected_pairs: Vec<_> = expected.into_iter().collect();
            assert_eq!(pairs, expected_pairs);
        }
    }
}
