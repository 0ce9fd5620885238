use std::fmt;
use std::iter::FromIterator;

use compare::{Compare, Natural};

use crate::error::Error;
use crate::tree::{AvlTree, Cursor, Handle, IntoIter, Iter};

/// An ordered multiset based on a self-balancing binary search tree
///
/// Unlike [`AvlSet`](crate::AvlSet), equal values may appear any number of times. All values equal
/// to each other form a contiguous run in iteration order, delimited by
/// [`AvlMultiset::lower_bound`] and [`AvlMultiset::upper_bound`]. Within a run, values are kept in
/// the order they were inserted.
#[derive(Clone)]
pub struct AvlMultiset<T, C = Natural<T>> {
    items: AvlTree<T, C>,
}

impl<T, C: Default> Default for AvlMultiset<T, C> {
    fn default() -> Self {
        Self {
            items: Default::default(),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlMultiset<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for AvlMultiset<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.items.eq(&other.items)
    }
}

impl<T: Eq, C> Eq for AvlMultiset<T, C> {}

impl<T: Ord> AvlMultiset<T> {
    /// Creates an empty multiset ordered by the natural order of its values
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty multiset with the specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: AvlTree::with_capacity(capacity),
        }
    }
}

impl<T, C> AvlMultiset<T, C> {
    /// Creates an empty multiset ordered by the given comparator
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            items: AvlTree::with_cmp(cmp),
        }
    }

    /// Returns a reference to the comparator of this multiset
    pub fn cmp(&self) -> &C {
        self.items.cmp()
    }

    /// Returns the number of values in the multiset, counting every copy
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.items.max_size()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional)
    }

    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn swap(&mut self, other: &mut Self) {
        self.items.swap(&mut other.items);
    }

    pub fn begin(&self) -> Handle {
        self.items.begin()
    }

    pub fn end(&self) -> Handle {
        self.items.end()
    }

    pub fn next(&self, pos: Handle) -> Result<Handle, Error> {
        self.items.next(pos)
    }

    pub fn prev(&self, pos: Handle) -> Result<Handle, Error> {
        self.items.prev(pos)
    }

    pub fn get_at(&self, pos: Handle) -> Result<&T, Error> {
        self.items.get_at(pos)
    }

    pub fn cursor(&self, pos: Handle) -> Result<Cursor<'_, T>, Error> {
        self.items.cursor(pos)
    }

    /// Erases the single value at `pos` and returns it
    ///
    /// Other copies of an equal value are left in place.
    pub fn erase(&mut self, pos: Handle) -> Result<T, Error> {
        self.items.erase(pos)
    }

    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Iterates over every value of the multiset in order
    pub fn iter(&self) -> Iter<'_, T> {
        self.items.iter()
    }
}

impl<T, C: Compare<T>> AvlMultiset<T, C> {
    /// Inserts a value, keeping any equal values already present
    ///
    /// The value is placed after the existing equal values. Always returns `true` as the second
    /// element.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_containers::AvlMultiset;
    ///
    /// let mut set = AvlMultiset::new();
    /// set.insert(5);
    /// assert!(set.insert(5).1);
    /// assert_eq!(set.count(&5), 2);
    /// ```
    pub fn insert(&mut self, value: T) -> (Handle, bool) {
        self.items.insert_non_unique(value)
    }

    /// Inserts every value of `values`, keeping duplicates
    pub fn insert_many<I>(&mut self, values: I) -> Vec<(Handle, bool)>
        where I: IntoIterator<Item=T>,
    {
        self.items.insert_many_non_unique(values)
    }

    /// Returns the position of the first value equal to `value`, or the end sentinel
    pub fn find(&self, value: &T) -> Handle {
        self.items.find(value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.items.contains(value)
    }

    /// Returns the first stored value equal to `value`
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

    /// Returns the bounds of the run of values equal to `value`
    ///
    /// Both positions are equal when there is no such value.
    pub fn equal_range(&self, value: &T) -> (Handle, Handle) {
        (self.lower_bound(value), self.upper_bound(value))
    }

    /// Iterates over the run of values equal to `value`
    pub fn equal_range_iter(&self, value: &T) -> Iter<'_, T> {
        let (first, last) = self.equal_range(value);
        match self.items.range(first, last) {
            Ok(range) => range,
            Err(_) => unreachable!("bug: bounds of a run are always valid positions"),
        }
    }

    /// Returns the number of values equal to `value`
    ///
    /// Time complexity: `O(log n + k)` where `k` is the result
    pub fn count(&self, value: &T) -> usize {
        self.equal_range_iter(value).len()
    }

    /// Removes a single value equal to `value`. Returns whether one was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the first value equal to `value`
    pub fn take(&mut self, value: &T) -> Option<T> {
        let pos = self.items.find(value);
        self.items.erase(pos).ok()
    }

    /// Removes every value equal to `value`, returning how many were removed
    pub fn remove_all(&mut self, value: &T) -> usize {
        let mut removed = 0;
        while self.take(value).is_some() {
            removed += 1;
        }

        removed
    }

    /// Moves every value of `other` into this multiset, keeping duplicates
    ///
    /// `other` is left empty.
    pub fn merge(&mut self, other: &mut Self) {
        self.items.merge_non_unique(&mut other.items);
    }
}

impl<T, C: Compare<T>> Extend<T> for AvlMultiset<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for AvlMultiset<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, C> IntoIterator for AvlMultiset<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T, C> IntoIterator for &'a AvlMultiset<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
