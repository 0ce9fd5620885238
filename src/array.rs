use std::fmt;
use std::ops::{Index, IndexMut};
use std::slice;

use crate::error::Error;

/// A fixed-size array with bounds-checked access
///
/// The length is always `N`. Every slot holds a value, starting from `T::default()`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Array<T, const N: usize> {
    items: [T; N],
}

impl<T: Default, const N: usize> Default for Array<T, N> {
    fn default() -> Self {
        Self {items: [(); N].map(|_| T::default())}
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Array<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Default, const N: usize> Array<T, N> {
    /// Creates an array filled with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an array whose first slots hold `values` in order, with the rest left at their
    /// default value
    ///
    /// Fails with [`Error::InvalidSize`] if there are more than `N` values.
    pub fn from_items<I>(values: I) -> Result<Self, Error>
        where I: IntoIterator<Item=T>,
    {
        let mut array = Self::new();
        let mut values = values.into_iter();
        for (slot, value) in array.items.iter_mut().zip(&mut values) {
            *slot = value;
        }

        let extra = values.count();
        if extra > 0 {
            return Err(Error::InvalidSize {requested: N + extra, max: N});
        }

        Ok(array)
    }
}

impl<T, const N: usize> Array<T, N> {
    /// Always `N`
    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Always `N`
    pub fn max_size(&self) -> usize {
        N
    }

    /// Returns the value at `index`
    ///
    /// Fails with [`Error::IndexOutOfRange`] if `index` is not less than `N`.
    pub fn at(&self, index: usize) -> Result<&T, Error> {
        self.items.get(index).ok_or(Error::IndexOutOfRange {index, len: N})
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        self.items.get_mut(index).ok_or(Error::IndexOutOfRange {index, len: N})
    }

    /// Returns the first value, or [`Error::Empty`] if `N` is zero
    pub fn front(&self) -> Result<&T, Error> {
        self.items.first().ok_or(Error::Empty)
    }

    /// Returns the last value, or [`Error::Empty`] if `N` is zero
    pub fn back(&self) -> Result<&T, Error> {
        self.items.last().ok_or(Error::Empty)
    }

    /// Sets every slot to a clone of `value`
    pub fn fill(&mut self, value: T)
        where T: Clone,
    {
        self.items.fill(value);
    }

    /// Exchanges the contents of two arrays of the same size
    pub fn swap(&mut self, other: &mut Self) {
        self.items.swap_with_slice(&mut other.items);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T, N> {
    fn from(items: [T; N]) -> Self {
        Self {items}
    }
}

impl<T, const N: usize> Index<usize> for Array<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Array<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a Array<T, N> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a mut Array<T, N> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_items() {
        let array: Array<i32, 4> = Array::from_items(vec![1, 2]).unwrap();
        assert_eq!(array.as_slice(), &[1, 2, 0, 0]);

        let full: Array<i32, 2> = Array::from_items(vec![1, 2]).unwrap();
        assert_eq!(full.as_slice(), &[1, 2]);

        let err = Array::<i32, 2>::from_items(vec![1, 2, 3, 4]).unwrap_err();
        assert_eq!(err, Error::InvalidSize {requested: 4, max: 2});
    }

    #[test]
    fn bounds_checked_access() {
        let mut array = Array::from([10, 20, 30]);
        assert_eq!(array.len(), 3);
        assert_eq!(array.max_size(), 3);
        assert_eq!(array.at(2), Ok(&30));
        assert_eq!(array.at(3), Err(Error::IndexOutOfRange {index: 3, len: 3}));
        assert_eq!(array.front(), Ok(&10));
        assert_eq!(array.back(), Ok(&30));

        *array.at_mut(0).unwrap() = 11;
        array[1] += 1;
        assert_eq!(array.as_slice(), &[11, 21, 30]);

        let empty: Array<u8, 0> = Array::new();
        assert!(empty.is_empty());
        assert_eq!(empty.front(), Err(Error::Empty));
        assert_eq!(empty.back(), Err(Error::Empty));
    }

    #[test]
    fn fill_swap_iterate() {
        let mut a: Array<String, 2> = Array::new();
        a.fill("x".to_string());
        let mut b = Array::from(["y".to_string(), "z".to_string()]);

        a.swap(&mut b);
        assert_eq!(a.iter().map(String::as_str).collect::<Vec<_>>(), vec!["y", "z"]);
        assert_eq!(b, Array::from(["x".to_string(), "x".to_string()]));

        for value in &mut a {
            value.push('!');
        }
        assert_eq!(format!("{:?}", a), r#"["y!", "z!"]"#);
    }
}
