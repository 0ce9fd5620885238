use std::iter::FusedIterator;
use std::vec;

use crate::slab::Ptr;

use super::node::{self, Nodes};

/// An in-order iterator over the values of a tree
///
/// Walks parent links from both ends, so no stack is allocated.
pub struct Iter<'a, T> {
    nodes: &'a Nodes<T>,
    front: Ptr,
    back: Ptr,
    /// Number of values not yet yielded from either end
    len: usize,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(nodes: &'a Nodes<T>, root: Ptr) -> Self {
        Self {
            nodes,
            front: node::leftmost(nodes, root),
            back: node::rightmost(nodes, root),
            len: nodes.len(),
        }
    }

    /// An iterator that yields nothing
    pub(crate) fn empty(nodes: &'a Nodes<T>) -> Self {
        Self {nodes, front: Ptr::null(), back: Ptr::null(), len: 0}
    }

    /// Iterates over the values from `first` up to but not including `last`, where `len` is the
    /// number of values in that range
    pub(crate) fn range(nodes: &'a Nodes<T>, first: Ptr, last: Ptr, len: usize) -> Self {
        if len == 0 {
            return Self::empty(nodes);
        }

        let back = if last.is_null() {
            // `first` is reachable, so it has a root to walk up to
            let mut root = first;
            while !nodes[root].parent.is_null() {
                root = nodes[root].parent;
            }
            node::rightmost(nodes, root)
        } else {
            node::predecessor(nodes, last)
        };

        Self {nodes, front: first, back, len}
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let node = &self.nodes[self.front];
        self.front = node::successor(self.nodes, self.front);
        self.len -= 1;

        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let node = &self.nodes[self.back];
        self.back = node::predecessor(self.nodes, self.back);
        self.len -= 1;

        Some(&node.value)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

/// An in-order iterator over mutable references to the values of a tree
pub struct IterMut<'a, T> {
    values: vec::IntoIter<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new(nodes: &'a mut Nodes<T>, root: Ptr) -> Self {
        let order = node::inorder_ptrs(nodes, root);

        // Every slot is borrowed at most once, so the borrows can be handed out in sorted order
        let mut slots: Vec<_> = nodes.slots_mut().collect();
        let values: Vec<_> = order.into_iter()
            .filter_map(|ptr| {
                ptr.into_index()
                    .and_then(|index| slots.get_mut(index))
                    .and_then(Option::take)
            })
            .map(|node| &mut node.value)
            .collect();

        Self {values: values.into_iter()}
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.values.next_back()
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}
impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// An owning in-order iterator over the values of a tree
pub struct IntoIter<T> {
    values: vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(super) fn new(mut nodes: Nodes<T>, root: Ptr) -> Self {
        let order = node::inorder_ptrs(&nodes, root);
        let values: Vec<_> = order.into_iter()
            .filter_map(|ptr| nodes.remove(ptr))
            .map(|node| node.value)
            .collect();

        Self {values: values.into_iter()}
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.values.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
