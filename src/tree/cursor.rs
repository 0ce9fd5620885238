use std::fmt;
use std::ptr;

use crate::error::Error;
use crate::slab::Ptr;

use super::node::{self, Nodes};
use super::AvlTree;

/// A position in a linked container (a tree or a [`List`](crate::List)): either an element or the
/// end sentinel
///
/// Handles are detached from the container they came from, so they can be held across mutations.
/// Inserting never invalidates a handle because nodes are relinked rather than moved. Erasing an
/// element invalidates only the handles to that element. Using an invalidated handle is reported
/// as [`Error::InvalidPosition`] as long as its slot has not been reused by a later insertion.
///
/// The end sentinel is never part of the balanced structure of a tree. It is both one past the
/// last element and one before the first: stepping forward from it yields the first element and
/// stepping backward yields the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(Ptr);

impl Handle {
    #[inline]
    pub(crate) fn new(ptr: Ptr) -> Self {
        Handle(ptr)
    }

    #[inline]
    pub(crate) fn ptr(self) -> Ptr {
        self.0
    }

    /// The end sentinel of every tree
    #[inline]
    pub fn end() -> Self {
        Handle(Ptr::null())
    }

    /// Returns true if this handle is the end sentinel
    #[inline]
    pub fn is_end(self) -> bool {
        self.0.is_null()
    }
}

/// A bidirectional cursor over a tree, borrowing it immutably
///
/// Moving past either end lands on the end sentinel, and moving again wraps around to the other
/// end. Two cursors are equal when they point at the same position of the same tree.
pub struct Cursor<'a, T> {
    nodes: &'a Nodes<T>,
    root: Ptr,
    current: Ptr,
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        Self {..*self}
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.nodes, other.nodes) && self.current == other.current
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor")
            .field(&self.current())
            .finish()
    }
}

impl<'a, T> Cursor<'a, T> {
    pub(super) fn new(nodes: &'a Nodes<T>, root: Ptr, current: Ptr) -> Self {
        Self {nodes, root, current}
    }

    /// Returns the position this cursor points at
    pub fn handle(&self) -> Handle {
        Handle(self.current)
    }

    /// Returns true if the cursor is on the end sentinel
    pub fn is_end(&self) -> bool {
        self.current.is_null()
    }

    /// Returns the element the cursor points at, or `None` on the end sentinel
    pub fn current(&self) -> Option<&'a T> {
        self.nodes.get(self.current).map(|node| &node.value)
    }

    /// Moves to the next element in sorted order
    pub fn move_next(&mut self) {
        self.current = next_ptr(self.nodes, self.root, self.current);
    }

    /// Moves to the previous element in sorted order
    pub fn move_prev(&mut self) {
        self.current = prev_ptr(self.nodes, self.root, self.current);
    }

    /// Returns the element after the current one without moving
    pub fn peek_next(&self) -> Option<&'a T> {
        let next = next_ptr(self.nodes, self.root, self.current);
        self.nodes.get(next).map(|node| &node.value)
    }

    /// Returns the element before the current one without moving
    pub fn peek_prev(&self) -> Option<&'a T> {
        let prev = prev_ptr(self.nodes, self.root, self.current);
        self.nodes.get(prev).map(|node| &node.value)
    }
}

/// A bidirectional cursor over a tree that can modify the element it points at and erase it
///
/// Modifying an element in a way that changes how it compares to the others is a logic error. The
/// tree stays memory safe but lookups may no longer find the element.
pub struct CursorMut<'a, T, C> {
    tree: &'a mut AvlTree<T, C>,
    current: Ptr,
}

impl<'a, T: fmt::Debug, C> fmt::Debug for CursorMut<'a, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut")
            .field(&self.tree.nodes.get(self.current).map(|node| &node.value))
            .finish()
    }
}

impl<'a, T, C> CursorMut<'a, T, C> {
    pub(super) fn new(tree: &'a mut AvlTree<T, C>, current: Ptr) -> Self {
        Self {tree, current}
    }

    /// Returns the position this cursor points at
    pub fn handle(&self) -> Handle {
        Handle(self.current)
    }

    /// Returns true if the cursor is on the end sentinel
    pub fn is_end(&self) -> bool {
        self.current.is_null()
    }

    /// Returns the element the cursor points at, or `None` on the end sentinel
    pub fn current(&mut self) -> Option<&mut T> {
        self.tree.nodes.get_mut(self.current).map(|node| &mut node.value)
    }

    /// Moves to the next element in sorted order
    pub fn move_next(&mut self) {
        self.current = next_ptr(&self.tree.nodes, self.tree.root, self.current);
    }

    /// Moves to the previous element in sorted order
    pub fn move_prev(&mut self) {
        self.current = prev_ptr(&self.tree.nodes, self.tree.root, self.current);
    }

    /// Returns a read-only cursor at the same position
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(&self.tree.nodes, self.tree.root, self.current)
    }

    /// Erases the current element and moves the cursor to its successor
    ///
    /// Fails with [`Error::InvalidPosition`] on the end sentinel, leaving the tree untouched.
    pub fn remove_current(&mut self) -> Result<T, Error> {
        if !self.tree.nodes.contains(self.current) {
            return Err(Error::InvalidPosition);
        }

        // Nodes are relinked, not moved, so the successor keeps its pointer across the erase
        let next = node::successor(&self.tree.nodes, self.current);
        let value = self.tree.erase(Handle(self.current))?;
        self.current = next;

        Ok(value)
    }
}

/// Steps forward, wrapping from the end sentinel to the first element
pub(super) fn next_ptr<T>(nodes: &Nodes<T>, root: Ptr, current: Ptr) -> Ptr {
    if current.is_null() {
        node::leftmost(nodes, root)
    } else {
        node::successor(nodes, current)
    }
}

/// Steps backward, wrapping from the end sentinel to the last element
pub(super) fn prev_ptr<T>(nodes: &Nodes<T>, root: Ptr, current: Ptr) -> Ptr {
    if current.is_null() {
        node::rightmost(nodes, root)
    } else {
        node::predecessor(nodes, current)
    }
}
