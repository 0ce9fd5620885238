use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::mem;

use crate::error::Error;

struct StackNode<T> {
    value: T,
    below: Link<T>,
}

type Link<T> = Option<Box<StackNode<T>>>;

/// A last-in first-out stack backed by a singly linked list
pub struct Stack<T> {
    top: Link<T>,
    len: usize,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self {top: None, len: 0}
    }
}

impl<T: Clone> Clone for Stack<T> {
    fn clone(&self) -> Self {
        let mut values: Vec<_> = self.iter().cloned().collect();
        // Rebuild from the bottom so the order is preserved
        values.reverse();
        values.into_iter().collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Stack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Stack<T> {}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        // Unlink iteratively so a long stack cannot overflow the call stack while dropping
        self.clear();
    }
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of values on the stack
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    /// Pushes a value onto the top of the stack
    pub fn push(&mut self, value: T) {
        let below = self.top.take();
        self.top = Some(Box::new(StackNode {value, below}));
        self.len += 1;
    }

    /// Removes and returns the top value, or fails with [`Error::Empty`]
    pub fn pop(&mut self) -> Result<T, Error> {
        let node = self.top.take().ok_or(Error::Empty)?;
        let StackNode {value, below} = *node;
        self.top = below;
        self.len -= 1;

        Ok(value)
    }

    /// Returns the top value, or [`Error::Empty`]
    pub fn top(&self) -> Result<&T, Error> {
        self.top.as_ref().map(|node| &node.value).ok_or(Error::Empty)
    }

    pub fn top_mut(&mut self) -> Result<&mut T, Error> {
        self.top.as_mut().map(|node| &mut node.value).ok_or(Error::Empty)
    }

    /// Exchanges the contents of two stacks
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.top, &mut other.top);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Removes every value
    pub fn clear(&mut self) {
        let mut link = self.top.take();
        while let Some(mut node) = link {
            link = node.below.take();
        }
        self.len = 0;
    }

    /// Pushes every value of `values` in order, so the last one ends up on top
    pub fn insert_many_back<I>(&mut self, values: I)
        where I: IntoIterator<Item=T>,
    {
        for value in values {
            self.push(value);
        }
    }

    /// Returns an iterator from the top of the stack to the bottom
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            next: self.top.as_deref(),
            len: self.len,
        }
    }
}

impl<T> Extend<T> for Stack<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter)
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stack = Self::new();
        stack.extend(iter);
        stack
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the values of a stack, from the top to the bottom
pub struct Iter<'a, T> {
    next: Option<&'a StackNode<T>>,
    len: usize,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.below.as_deref();
        self.len -= 1;

        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}
