use std::fmt;
use std::iter::FromIterator;
use std::mem;
use std::ops::{Index, IndexMut};
use std::slice;

use crate::error::Error;

/// A growable array with bounds-checked access
///
/// When the vector runs out of room it at least doubles its capacity, so pushing to the back is
/// amortized `O(1)`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Vector<T> {
    items: Vec<T>,
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self {items: Vec::new()}
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Vector<T> {
    /// Creates an empty vector without allocating
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a vector of `len` default values
    ///
    /// Fails with [`Error::InvalidSize`] if `len` exceeds [`Vector::max_size`].
    pub fn with_len(len: usize) -> Result<Self, Error>
        where T: Default,
    {
        let max = Self::max_len();
        if len > max {
            return Err(Error::InvalidSize {requested: len, max});
        }

        let mut items = Vec::with_capacity(len);
        items.resize_with(len, T::default);
        Ok(Self {items})
    }

    fn max_len() -> usize {
        isize::MAX as usize / mem::size_of::<T>().max(1)
    }

    /// Returns the number of values in the vector
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The largest number of values a vector of this type could theoretically hold
    pub fn max_size(&self) -> usize {
        Self::max_len()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Grows the capacity to hold at least `capacity` values
    ///
    /// Does nothing if the capacity is already large enough. Otherwise the new capacity is the
    /// larger of `capacity` and twice the current capacity. Fails with [`Error::InvalidSize`] if
    /// `capacity` exceeds [`Vector::max_size`].
    pub fn reserve(&mut self, capacity: usize) -> Result<(), Error> {
        let max = Self::max_len();
        if capacity > max {
            return Err(Error::InvalidSize {requested: capacity, max});
        }

        let current = self.items.capacity();
        if capacity > current {
            let target = capacity.max(current.saturating_mul(2)).min(max);
            self.items.reserve_exact(target - self.items.len());
        }

        Ok(())
    }

    /// Reduces the capacity to the number of values in the vector
    pub fn shrink_to_fit(&mut self) {
        self.items.shrink_to_fit();
    }

    /// Removes every value, keeping the capacity
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the value at `index`
    ///
    /// Fails with [`Error::IndexOutOfRange`] if `index` is not less than the length.
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        let len = self.items.len();
        self.items.get(index).ok_or(Error::IndexOutOfRange {index, len})
    }

    /// Returns a mutable reference to the value at `index`
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        let len = self.items.len();
        self.items.get_mut(index).ok_or(Error::IndexOutOfRange {index, len})
    }

    /// Returns the first value, or [`Error::Empty`]
    pub fn front(&self) -> Result<&T, Error> {
        self.items.first().ok_or(Error::Empty)
    }

    /// Returns the last value, or [`Error::Empty`]
    pub fn back(&self) -> Result<&T, Error> {
        self.items.last().ok_or(Error::Empty)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Inserts `value` at `index`, shifting every later value one place to the back
    ///
    /// `index` may be equal to the length to append. Fails with [`Error::IndexOutOfRange`]
    /// otherwise.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), Error> {
        let len = self.items.len();
        if index > len {
            return Err(Error::IndexOutOfRange {index, len});
        }

        self.grow_for(1)?;
        self.items.insert(index, value);
        Ok(())
    }

    /// Removes and returns the value at `index`, shifting every later value one place forward
    pub fn erase(&mut self, index: usize) -> Result<T, Error> {
        let len = self.items.len();
        if index >= len {
            return Err(Error::IndexOutOfRange {index, len});
        }

        Ok(self.items.remove(index))
    }

    /// Appends a value to the back of the vector
    ///
    /// # Panics
    ///
    /// Panics if the vector already holds [`Vector::max_size`] values.
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.grow_for(1) {
            panic!("cannot push to vector: {}", err);
        }
        self.items.push(value);
    }

    /// Removes and returns the last value, or `None` if the vector is empty
    pub fn pop_back(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Exchanges the contents of two vectors
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.items, &mut other.items);
    }

    /// Inserts every value of `values` starting at `index`, keeping their order
    ///
    /// Returns the index of the first inserted value. Fails with [`Error::IndexOutOfRange`] if
    /// `index` is greater than the length, before anything is inserted.
    pub fn insert_many<I>(&mut self, index: usize, values: I) -> Result<usize, Error>
        where I: IntoIterator<Item=T>,
    {
        let len = self.items.len();
        if index > len {
            return Err(Error::IndexOutOfRange {index, len});
        }

        let values: Vec<T> = values.into_iter().collect();
        self.grow_for(values.len())?;
        self.items.splice(index..index, values);

        Ok(index)
    }

    /// Appends every value of `values` to the back of the vector
    pub fn insert_many_back<I>(&mut self, values: I)
        where I: IntoIterator<Item=T>,
    {
        for value in values {
            self.push_back(value);
        }
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Makes room for `additional` more values using the doubling growth policy
    fn grow_for(&mut self, additional: usize) -> Result<(), Error> {
        let max = Self::max_len();
        let needed = self.items.len().checked_add(additional)
            .ok_or(Error::InvalidSize {requested: usize::MAX, max})?;
        if needed <= self.items.capacity() {
            return Ok(());
        }

        self.reserve(needed)
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> Extend<T> for Vector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter)
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        // Sized exactly to the input, like constructing from a literal list
        Self {items: iter.into_iter().collect()}
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
