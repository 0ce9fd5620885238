use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::mem;
use std::vec;

use crate::error::Error;
use crate::slab::{Ptr, Slab};
use crate::tree::Handle;

#[derive(Debug, Clone)]
struct ListNode<T> {
    value: T,
    prev: Ptr,
    next: Ptr,
}

/// A doubly linked list
///
/// Nodes are stored in a slab and linked by index. Positions are [`Handle`]s, which stay valid
/// until the element they refer to is erased, including across [`List::sort`] and
/// [`List::reverse`] since those only relink nodes. The end sentinel sits both after the last
/// element and before the first one.
#[derive(Clone)]
pub struct List<T> {
    nodes: Slab<ListNode<T>>,
    head: Ptr,
    tail: Ptr,
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self {
            nodes: Slab::new(),
            head: Ptr::null(),
            tail: Ptr::null(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T> List<T> {
    /// Creates an empty list without allocating
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list of `len` default values
    ///
    /// Fails with [`Error::InvalidSize`] if `len` exceeds [`List::max_size`].
    pub fn with_len(len: usize) -> Result<Self, Error>
        where T: Default,
    {
        let mut list = Self::new();
        let max = list.max_size();
        if len > max {
            return Err(Error::InvalidSize {requested: len, max});
        }

        list.nodes.reserve(len);
        for _ in 0..len {
            list.push_back(T::default());
        }

        Ok(list)
    }

    /// Returns the number of elements in the list
    ///
    /// Time complexity: `O(1)`
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.nodes.is_empty(), self.head.is_null());
        self.nodes.is_empty()
    }

    /// The largest number of elements a list of this type could theoretically hold
    pub fn max_size(&self) -> usize {
        self.nodes.max_size()
    }

    /// Returns the first element, or [`Error::Empty`]
    pub fn front(&self) -> Result<&T, Error> {
        self.nodes.get(self.head).map(|node| &node.value).ok_or(Error::Empty)
    }

    /// Returns the last element, or [`Error::Empty`]
    pub fn back(&self) -> Result<&T, Error> {
        self.nodes.get(self.tail).map(|node| &node.value).ok_or(Error::Empty)
    }

    pub fn front_mut(&mut self) -> Result<&mut T, Error> {
        self.nodes.get_mut(self.head).map(|node| &mut node.value).ok_or(Error::Empty)
    }

    pub fn back_mut(&mut self) -> Result<&mut T, Error> {
        self.nodes.get_mut(self.tail).map(|node| &mut node.value).ok_or(Error::Empty)
    }

    /// Returns the position of the first element, or the end sentinel if the list is empty
    pub fn begin(&self) -> Handle {
        Handle::new(self.head)
    }

    /// Returns the end sentinel
    pub fn end(&self) -> Handle {
        Handle::end()
    }

    /// Returns the position after `pos`, wrapping from the end sentinel to the first element
    pub fn next(&self, pos: Handle) -> Result<Handle, Error> {
        if pos.is_end() {
            return Ok(Handle::new(self.head));
        }

        let node = self.nodes.get(pos.ptr()).ok_or(Error::InvalidPosition)?;
        Ok(Handle::new(node.next))
    }

    /// Returns the position before `pos`, wrapping from the end sentinel to the last element
    pub fn prev(&self, pos: Handle) -> Result<Handle, Error> {
        if pos.is_end() {
            return Ok(Handle::new(self.tail));
        }

        let node = self.nodes.get(pos.ptr()).ok_or(Error::InvalidPosition)?;
        Ok(Handle::new(node.prev))
    }

    /// Returns the element at `pos`
    pub fn get_at(&self, pos: Handle) -> Result<&T, Error> {
        self.nodes.get(pos.ptr()).map(|node| &node.value).ok_or(Error::InvalidPosition)
    }

    pub fn get_at_mut(&mut self, pos: Handle) -> Result<&mut T, Error> {
        self.nodes.get_mut(pos.ptr()).map(|node| &mut node.value).ok_or(Error::InvalidPosition)
    }

    /// Appends an element and returns its position
    pub fn push_back(&mut self, value: T) -> Handle {
        Handle::new(self.link_before(Ptr::null(), value))
    }

    /// Prepends an element and returns its position
    pub fn push_front(&mut self, value: T) -> Handle {
        Handle::new(self.link_before(self.head, value))
    }

    /// Removes and returns the last element, or fails with [`Error::Empty`]
    pub fn pop_back(&mut self) -> Result<T, Error> {
        if self.tail.is_null() {
            return Err(Error::Empty);
        }
        Ok(self.unlink(self.tail))
    }

    /// Removes and returns the first element, or fails with [`Error::Empty`]
    pub fn pop_front(&mut self) -> Result<T, Error> {
        if self.head.is_null() {
            return Err(Error::Empty);
        }
        Ok(self.unlink(self.head))
    }

    /// Inserts `value` before `pos` and returns the position of the new element
    ///
    /// Inserting before the end sentinel appends.
    pub fn insert(&mut self, pos: Handle, value: T) -> Result<Handle, Error> {
        self.check_position(pos)?;
        Ok(Handle::new(self.link_before(pos.ptr(), value)))
    }

    /// Erases the element at `pos` and returns it
    ///
    /// Fails with [`Error::InvalidPosition`] for the end sentinel or an erased position.
    pub fn erase(&mut self, pos: Handle) -> Result<T, Error> {
        if !self.nodes.contains(pos.ptr()) {
            return Err(Error::InvalidPosition);
        }
        Ok(self.unlink(pos.ptr()))
    }

    /// Inserts every value of `values` before `pos`, keeping their order
    ///
    /// Returns the position of the first inserted element, or `pos` if `values` was empty.
    pub fn insert_many<I>(&mut self, pos: Handle, values: I) -> Result<Handle, Error>
        where I: IntoIterator<Item=T>,
    {
        self.check_position(pos)?;

        let mut first = None;
        for value in values {
            let ptr = self.link_before(pos.ptr(), value);
            first.get_or_insert(Handle::new(ptr));
        }

        Ok(first.unwrap_or(pos))
    }

    /// Inserts every value of `values` at the front, keeping their order
    pub fn insert_many_front<I>(&mut self, values: I)
        where I: IntoIterator<Item=T>,
    {
        let head = self.head;
        for value in values {
            self.link_before(head, value);
        }
    }

    /// Appends every value of `values`
    pub fn insert_many_back<I>(&mut self, values: I)
        where I: IntoIterator<Item=T>,
    {
        for value in values {
            self.link_before(Ptr::null(), value);
        }
    }

    /// Exchanges the contents of two lists
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Removes every element
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = Ptr::null();
        self.tail = Ptr::null();
    }

    /// Reverses the order of the elements in place
    ///
    /// Handles stay valid and keep referring to the same elements.
    pub fn reverse(&mut self) {
        let mut current = self.head;
        while !current.is_null() {
            let node = &mut self.nodes[current];
            mem::swap(&mut node.prev, &mut node.next);
            // After the swap `prev` holds the old `next`
            current = node.prev;
        }

        mem::swap(&mut self.head, &mut self.tail);
    }

    /// Moves every element of `other` before `pos`, keeping their order
    ///
    /// `other` is left empty. Its elements get new positions in this list.
    pub fn splice(&mut self, pos: Handle, other: &mut Self) -> Result<(), Error> {
        self.check_position(pos)?;
        for value in other.drain() {
            self.link_before(pos.ptr(), value);
        }

        Ok(())
    }

    /// Moves every element out of the list in order, leaving it empty
    pub fn drain(&mut self) -> IntoIter<T> {
        let list = mem::take(self);
        list.into_iter()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            len: self.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let order = self.ptrs();

        let mut slots: Vec<_> = self.nodes.slots_mut().collect();
        let values: Vec<_> = order.into_iter()
            .filter_map(|ptr| {
                ptr.into_index()
                    .and_then(|index| slots.get_mut(index))
                    .and_then(Option::take)
            })
            .map(|node| &mut node.value)
            .collect();

        IterMut {values: values.into_iter()}
    }

    fn check_position(&self, pos: Handle) -> Result<(), Error> {
        if pos.is_end() || self.nodes.contains(pos.ptr()) {
            Ok(())
        } else {
            Err(Error::InvalidPosition)
        }
    }

    /// Collects the node pointers in list order
    fn ptrs(&self) -> Vec<Ptr> {
        let mut order = Vec::with_capacity(self.len());
        let mut current = self.head;
        while !current.is_null() {
            order.push(current);
            current = self.nodes[current].next;
        }

        order
    }

    /// Links the nodes in `order` into a list, replacing the current links
    fn relink(&mut self, order: &[Ptr]) {
        let mut prev = Ptr::null();
        for &ptr in order {
            let node = &mut self.nodes[ptr];
            node.prev = prev;
            node.next = Ptr::null();
            if prev.is_null() {
                self.head = ptr;
            } else {
                self.nodes[prev].next = ptr;
            }
            prev = ptr;
        }

        self.tail = prev;
        if order.is_empty() {
            self.head = Ptr::null();
        }
    }

    /// Creates a node for `value` and links it before `next` (null meaning the back of the list)
    fn link_before(&mut self, next: Ptr, value: T) -> Ptr {
        let prev = if next.is_null() { self.tail } else { self.nodes[next].prev };
        let ptr = self.nodes.push(ListNode {value, prev, next});

        if prev.is_null() {
            self.head = ptr;
        } else {
            self.nodes[prev].next = ptr;
        }

        if next.is_null() {
            self.tail = ptr;
        } else {
            self.nodes[next].prev = ptr;
        }

        ptr
    }

    /// Unlinks and frees the (valid) node `ptr`
    fn unlink(&mut self, ptr: Ptr) -> T {
        let ListNode {value, prev, next} = match self.nodes.remove(ptr) {
            Some(node) => node,
            None => unreachable!("bug: unlinking a vacant node"),
        };

        if prev.is_null() {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }

        if next.is_null() {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }

        value
    }
}

impl<T: PartialEq> List<T> {
    /// Removes consecutive duplicate elements, keeping the first of each run
    pub fn unique(&mut self) {
        let mut current = self.head;
        while !current.is_null() {
            let next = self.nodes[current].next;
            if !next.is_null() && self.nodes[next].value == self.nodes[current].value {
                self.unlink(next);
            } else {
                current = next;
            }
        }
    }
}

impl<T: Ord> List<T> {
    /// Sorts the list, keeping equal elements in their original order
    ///
    /// Nodes are relinked, not moved, so handles keep referring to the same elements.
    ///
    /// Time complexity: `O(n log n)`
    pub fn sort(&mut self) {
        let mut order = self.ptrs();
        log::debug!("sorting list of {} elements", order.len());

        let nodes = &self.nodes;
        order.sort_by(|&a, &b| nodes[a].value.cmp(&nodes[b].value));
        self.relink(&order);
    }

    /// Merges the sorted list `other` into this sorted list, keeping the result sorted
    ///
    /// Among equal elements, the ones already in this list come first. `other` is left empty.
    pub fn merge(&mut self, other: &mut Self) {
        log::debug!("merging list of {} elements into {}", other.len(), self.len());

        let mut current = self.head;
        for value in other.drain() {
            while !current.is_null() && self.nodes[current].value <= value {
                current = self.nodes[current].next;
            }
            self.link_before(current, value);
        }
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_many_back(iter)
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        let order = self.ptrs();
        let values: Vec<_> = order.into_iter()
            .filter_map(|ptr| self.nodes.remove(ptr))
            .map(|node| node.value)
            .collect();

        IntoIter {values: values.into_iter()}
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut List<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An iterator over the elements of a list, front to back
pub struct Iter<'a, T> {
    nodes: &'a Slab<ListNode<T>>,
    front: Ptr,
    back: Ptr,
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
        if self.len == 0 {
            return None;
        }

        let node = &self.nodes[self.front];
        self.front = node.next;
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
        self.back = node.prev;
        self.len -= 1;

        Some(&node.value)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

/// An iterator over mutable references to the elements of a list, front to back
pub struct IterMut<'a, T> {
    values: vec::IntoIter<&'a mut T>,
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

/// An owning iterator over the elements of a list, front to back
pub struct IntoIter<T> {
    values: vec::IntoIter<T>,
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
