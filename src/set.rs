use std::fmt;
use std::iter::FromIterator;

use compare::{Compare, Natural};

use crate::error::Error;
use crate::tree::{AvlTree, Cursor, Handle, IntoIter, Iter};

/// An ordered set based on a self-balancing binary search tree
///
/// Duplicate values are not allowed. Inserting a value that already exists in the set does not
/// modify the set.
///
/// Values are kept in the order given by the comparator `C`. Positions returned as [`Handle`]s
/// stay valid until the value they refer to is erased.
#[derive(Clone)]
pub struct AvlSet<T, C = Natural<T>> {
    items: AvlTree<T, C>,
}

impl<T, C: Default> Default for AvlSet<T, C> {
    fn default() -> Self {
        Self {
            items: Default::default(),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for AvlSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.items.eq(&other.items)
    }
}

impl<T: Eq, C> Eq for AvlSet<T, C> {}

impl<T: Ord> AvlSet<T> {
    /// Creates an empty `AvlSet` ordered by the natural order of its values
    ///
    /// The set is initially created with a capacity of 0, so it will not allocate until it is first
    /// inserted into.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_containers::AvlSet;
    /// let mut set: AvlSet<&str> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with the specified capacity.
    ///
    /// The set will be able to hold at least `capacity` elements without reallocating. If
    /// `capacity` is 0, the set will not allocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: AvlTree::with_capacity(capacity),
        }
    }
}

impl<T, C> AvlSet<T, C> {
    /// Creates an empty set ordered by the given comparator
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_containers::AvlSet;
    /// use compare::{Compare, natural};
    ///
    /// let mut set = AvlSet::with_cmp(natural().rev());
    /// set.insert_many(vec![1, 3, 2]);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            items: AvlTree::with_cmp(cmp),
        }
    }

    /// Returns a reference to the comparator of this set
    pub fn cmp(&self) -> &C {
        self.items.cmp()
    }

    /// Returns the number of values in the set
    ///
    /// Time complexity: `O(1)`
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_containers::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the set contains no values
    ///
    /// Time complexity: `O(1)`
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The largest number of values a set of this type could theoretically hold
    pub fn max_size(&self) -> usize {
        self.items.max_size()
    }

    /// Returns the number of elements the set can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Reserves capacity for at least `additional` more elements to be inserted in the set.
    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional)
    }

    /// Shrinks the capacity of the set as much as possible.
    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit()
    }

    /// Clears the set, removing all elements
    ///
    /// Note that this method has no effect on the allocated capacity of the set.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Exchanges the contents of two sets
    pub fn swap(&mut self, other: &mut Self) {
        self.items.swap(&mut other.items);
    }

    /// Returns the position of the smallest value, or the end sentinel if the set is empty
    pub fn begin(&self) -> Handle {
        self.items.begin()
    }

    /// Returns the end sentinel
    pub fn end(&self) -> Handle {
        self.items.end()
    }

    /// Returns the position after `pos`, wrapping from the end sentinel to the first value
    pub fn next(&self, pos: Handle) -> Result<Handle, Error> {
        self.items.next(pos)
    }

    /// Returns the position before `pos`, wrapping from the end sentinel to the last value
    pub fn prev(&self, pos: Handle) -> Result<Handle, Error> {
        self.items.prev(pos)
    }

    /// Returns the value at `pos`
    pub fn get_at(&self, pos: Handle) -> Result<&T, Error> {
        self.items.get_at(pos)
    }

    /// Returns a cursor pointing at `pos`
    pub fn cursor(&self, pos: Handle) -> Result<Cursor<'_, T>, Error> {
        self.items.cursor(pos)
    }

    /// Erases the value at `pos` and returns it
    ///
    /// Fails with [`Error::InvalidPosition`] for the end sentinel or an erased position.
    pub fn erase(&mut self, pos: Handle) -> Result<T, Error> {
        self.items.erase(pos)
    }

    /// Returns the smallest value in the set
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Returns the largest value in the set
    pub fn last(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Iterates over the values of the set in order
    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }
}

impl<T, C: Compare<T>> AvlSet<T, C> {
    /// Inserts a new value into the set
    ///
    /// Returns the position of the value and whether it was inserted. If the set already had an
    /// equal value, `false` is returned and the set is not modified.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_containers::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// # assert!(set.is_empty());
    /// assert!(set.insert(37).1);
    /// assert!(!set.is_empty());
    ///
    /// assert!(!set.insert(37).1);
    /// assert!(set.contains(&37));
    /// ```
    pub fn insert(&mut self, value: T) -> (Handle, bool) {
        self.items.insert(value)
    }

    /// Inserts every value of `values`, returning the result of each insertion
    pub fn insert_many<I>(&mut self, values: I) -> Vec<(Handle, bool)>
        where I: IntoIterator<Item=T>,
    {
        self.items.insert_many(values)
    }

    /// Returns the position of the value equal to `value`, or the end sentinel
    ///
    /// Time complexity: `O(log n)`
    pub fn find(&self, value: &T) -> Handle {
        self.items.find(value)
    }

    /// Returns true if the set contains a value equal to `value`
    ///
    /// Time complexity: `O(log n)`
    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    /// Returns a reference to the value in the set equal to `value`
    pub fn get(&self, value: &T) -> Option<&T> {
        self.items.get(value)
    }

    /// Returns the position of the first value not less than `value`
    pub fn lower_bound(&self, value: &T) -> Handle {
        self.items.lower_bound(value)
    }

    /// Returns the position of the first value greater than `value`
    pub fn upper_bound(&self, value: &T) -> Handle {
        self.items.upper_bound(value)
    }

    /// Removes a value from the set. Returns whether the value was present in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_containers::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(String::from("abc"));
    /// assert!(set.remove(&String::from("abc")));
    /// assert!(!set.remove(&String::from("def")));
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the value in the set, if any, that is equal to the given one.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let pos = self.items.find(value);
        self.items.erase(pos).ok()
    }

    /// Moves every value of `other` into this set
    ///
    /// Values already present in this set are dropped. `other` is left empty.
    pub fn merge(&mut self, other: &mut Self) {
        self.items.merge(&mut other.items);
    }
}

impl<T, C: Compare<T>> Extend<T> for AvlSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter)
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for AvlSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T, C> IntoIterator for AvlSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T, C> IntoIterator for &'a AvlSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use rand::prelude::*;

    #[test]
    fn test_set_insert_get() {
        let mut set = AvlSet::new();

        assert!(!set.contains(&3));
        assert!(set.insert(3).1);
        assert!(set.contains(&3));

        assert!(!set.contains(&4));
        assert!(set.insert(4).1);
        assert!(set.contains(&3));
        assert!(set.contains(&4));

        assert!(!set.contains(&0));
        assert!(set.insert(0).1);
        assert!(set.contains(&3));
        assert!(set.contains(&4));
        assert!(set.contains(&0));
    }

    #[test]
    fn test_set_insert_replace() {
        let mut set = AvlSet::new();

        let (three, inserted) = set.insert(3);
        assert!(inserted);
        assert!(set.insert(4).1);

        let (pos, inserted) = set.insert(3);
        assert!(!inserted);
        assert_eq!(pos, three);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ordered_scenario() {
        let mut set = AvlSet::new();
        for &value in &[30, 5, 43, 1, 20, 40, 60, 35, 32] {
            set.insert(value);
        }

        assert_eq!(set.len(), 9);
        assert_eq!(set.first(), Some(&1));
        assert_eq!(set.last(), Some(&60));
        assert_eq!(set.get_at(set.begin()), Ok(&1));
        assert_eq!(set.get_at(set.lower_bound(&33)), Ok(&35));
        assert_eq!(set.get_at(set.upper_bound(&35)), Ok(&40));
    }

    #[test]
    fn erase_single_element() {
        let mut set = AvlSet::new();
        let (pos, _) = set.insert("x");

        assert_eq!(set.erase(pos), Ok("x"));
        assert_eq!(set.len(), 0);
        assert_eq!(set.begin(), set.end());
        assert_eq!(set.erase(set.end()), Err(Error::InvalidPosition));
        assert!(set.find(&"x").is_end());
    }

    #[test]
    fn merge_sets() {
        let mut a: AvlSet<_> = vec![1, 2, 3].into_iter().collect();
        let mut b: AvlSet<_> = vec![3, 4].into_iter().collect();
        a.merge(&mut b);

        assert!(b.is_empty());
        assert_eq!(a.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn navigation_and_cursor() {
        let set: AvlSet<_> = vec!['b', 'a', 'c'].into_iter().collect();

        let last = set.prev(set.end()).unwrap();
        assert_eq!(set.get_at(last), Ok(&'c'));
        assert_eq!(set.next(set.end()).unwrap(), set.begin());

        let mut cursor = set.cursor(set.find(&'b')).unwrap();
        cursor.move_prev();
        assert_eq!(cursor.current(), Some(&'a'));
        cursor.move_prev();
        assert!(cursor.is_end());
    }

    #[test]
    fn clone_swap_debug() {
        let mut set: AvlSet<_> = (1..=3).collect();
        let copy = set.clone();
        assert_eq!(set, copy);
        assert_eq!(format!("{:?}", copy), "{1, 2, 3}");

        let mut other = AvlSet::with_capacity(4);
        other.insert(9);
        set.swap(&mut other);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![9]);
        assert_eq!((&other).into_iter().count(), 3);
        assert!(other.capacity() >= 3);
        assert!(other.max_size() > 0);
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

                const TEST_CASES: usize = 1024;
                const OPERATIONS: usize = 128;

                (0..TEST_CASES).into_par_iter().for_each(|_| test_case());
            }
        }

        fn test_case() {
            let mut set = AvlSet::new();
            // Compare against a HashSet
            let mut expected = HashSet::new();
            // The list of values that have been inserted
            let mut values = Vec::new();

            let mut rng = rand::thread_rng();
            for _ in 0..rng.gen_range(OPERATIONS..=OPERATIONS*2) {
                assert_eq!(set.is_empty(), expected.is_empty());
                assert_eq!(set.len(), expected.len());

                match rng.gen_range(1..=100) {
                    // Check for a value that hasn't been inserted
                    1..=20 => {
                        // Not inserting any negative numbers
                        let value = -rng.gen_range(1..=64);
                        assert_eq!(set.contains(&value), expected.contains(&value));
                        assert_eq!(set.get(&value), expected.get(&value));
                    },

                    // Check for a value that has been inserted
                    21..=40 => {
                        let value = match values.choose(&mut rng).copied() {
                            Some(value) => value,
                            None => continue,
                        };

                        assert_eq!(set.contains(&value), expected.contains(&value));
                        assert_eq!(set.get(&value), expected.get(&value));
                    },

                    // Remove an existing value
                    41..=60 => {
                        let value = match values.choose(&mut rng).copied() {
                            Some(value) => value,
                            None => continue,
                        };

                        assert_eq!(set.take(&value), expected.take(&value));
                        // Should always return `None`
                        assert_eq!(set.take(&value), expected.take(&value));
                        // Should always be `false` since value has been removed already
                        assert_eq!(set.remove(&value), expected.remove(&value));
                    },

                    // Insert a value
                    61..=100 => {
                        // Only inserting positive values
                        let value = rng.gen_range(0..=64);
                        values.push(value);

                        assert_eq!(set.contains(&value), expected.contains(&value));
                        assert_eq!(set.insert(value).1, expected.insert(value));
                        assert_eq!(set.get(&value), expected.get(&value));
                    },

                    _ => unreachable!(),
                }
            }

            let mut sorted: Vec<_> = expected.iter().copied().collect();
            sorted.sort_unstable();
            assert_eq!(set.iter().copied().collect::<Vec<_>>(), sorted);

            set.clear();
            expected.clear();

            assert_eq!(set.is_empty(), expected.is_empty());
            assert_eq!(set.len(), expected.len());

            for &value in &values {
                assert_eq!(set.contains(&value), expected.contains(&value));
            }
        }
    }
}
