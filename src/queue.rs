use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::mem;

use crate::error::Error;
use crate::slab::{Ptr, Slab};

#[derive(Debug, Clone)]
struct QueueNode<T> {
    value: T,
    next: Ptr,
}

/// A first-in first-out queue backed by a singly linked list
///
/// Values are pushed at the back and popped from the front.
#[derive(Clone)]
pub struct Queue<T> {
    nodes: Slab<QueueNode<T>>,
    head: Ptr,
    tail: Ptr,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self {
            nodes: Slab::new(),
            head: Ptr::null(),
            tail: Ptr::null(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Queue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Queue<T> {}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of values in the queue
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a value to the back of the queue
    pub fn push(&mut self, value: T) {
        let ptr = self.nodes.push(QueueNode {value, next: Ptr::null()});
        if self.tail.is_null() {
            self.head = ptr;
        } else {
            self.nodes[self.tail].next = ptr;
        }
        self.tail = ptr;
    }

    /// Removes and returns the front value, or fails with [`Error::Empty`]
    pub fn pop(&mut self) -> Result<T, Error> {
        let QueueNode {value, next} = self.nodes.remove(self.head).ok_or(Error::Empty)?;
        self.head = next;
        if next.is_null() {
            self.tail = Ptr::null();
        }

        Ok(value)
    }

    /// Returns the front value, or [`Error::Empty`]
    pub fn front(&self) -> Result<&T, Error> {
        self.nodes.get(self.head).map(|node| &node.value).ok_or(Error::Empty)
    }

    /// Returns the back value, or [`Error::Empty`]
    pub fn back(&self) -> Result<&T, Error> {
        self.nodes.get(self.tail).map(|node| &node.value).ok_or(Error::Empty)
    }

    pub fn front_mut(&mut self) -> Result<&mut T, Error> {
        self.nodes.get_mut(self.head).map(|node| &mut node.value).ok_or(Error::Empty)
    }

    pub fn back_mut(&mut self) -> Result<&mut T, Error> {
        self.nodes.get_mut(self.tail).map(|node| &mut node.value).ok_or(Error::Empty)
    }

    /// Exchanges the contents of two queues
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Removes every value
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = Ptr::null();
        self.tail = Ptr::null();
    }

    /// Pushes every value of `values` to the back, in order
    pub fn insert_many_back<I>(&mut self, values: I)
        where I: IntoIterator<Item=T>,
    {
        for value in values {
            self.push(value);
        }
    }

    /// Returns an iterator from the front of the queue to the back
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            next: self.head,
            len: self.len(),
        }
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter)
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the values of a queue, from the front to the back
pub struct Iter<'a, T> {
    nodes: &'a Slab<QueueNode<T>>,
    next: Ptr,
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
        let node = self.nodes.get(self.next)?;
        self.next = node.next;
        self.len -= 1;

        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;

    use rand::prelude::*;

    #[test]
    fn push_pop_front_back() {
        let mut queue = Queue::new();
        assert_eq!(queue.pop(), Err(Error::Empty));
        assert_eq!(queue.front(), Err(Error::Empty));
        assert_eq!(queue.back(), Err(Error::Empty));

        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.front(), Ok(&1));
        assert_eq!(queue.back(), Ok(&3));

        *queue.back_mut().unwrap() = 30;
        assert_eq!(queue.pop(), Ok(1));
        assert_eq!(queue.pop(), Ok(2));
        assert_eq!(queue.front(), Ok(&30));
        assert_eq!(queue.pop(), Ok(30));
        assert!(queue.is_empty());
        assert_eq!(queue.back(), Err(Error::Empty));

        // Still usable after being emptied
        queue.push(4);
        assert_eq!(queue.front(), queue.back());
    }

    #[test]
    fn insert_many_back_and_iterate() {
        let mut queue: Queue<_> = vec!["a"].into_iter().collect();
        queue.insert_many_back(vec!["b", "c"]);

        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(queue.iter().len(), 3);
        assert_eq!(format!("{:?}", queue), r#"["a", "b", "c"]"#);
    }

    #[test]
    fn clone_swap_clear() {
        let mut a: Queue<_> = (1..=3).collect();
        let b = a.clone();
        assert_eq!(a, b);

        let mut c = Queue::new();
        a.swap(&mut c);
        assert!(a.is_empty());
        assert_eq!(c, b);

        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.pop(), Err(Error::Empty));
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

                const TEST_CASES: usize = 128;
                const OPERATIONS: usize = 128;

                (0..TEST_CASES).into_par_iter().for_each(|_| test_case());
            }
        }

        fn test_case() {
            let mut queue = Queue::new();
            let mut expected = VecDeque::new();

            let mut rng = rand::thread_rng();
            for _ in 0..rng.gen_range(OPERATIONS..=OPERATIONS*2) {
                if rng.gen_bool(0.6) {
                    let value: u32 = rng.gen();
                    queue.push(value);
                    expected.push_back(value);
                } else {
                    assert_eq!(queue.pop().ok(), expected.pop_front());
                }

                assert_eq!(queue.len(), expected.len());
                assert_eq!(queue.front().ok(), expected.front());
                assert_eq!(queue.back().ok(), expected.back());
            }
        }
    }
}
