mod node;
mod cursor;
mod inorder;

pub use cursor::*;
pub use inorder::*;

use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::mem;

use compare::{Compare, Natural};

use crate::error::Error;
use crate::slab::Ptr;

use node::{InnerNode, Nodes};

/// A self-balancing binary search tree (AVL tree)
///
/// Values are kept in the order given by the comparator `C`. For each node with value `v`:
/// - Every value in the left subtree compares less than `v`
/// - Every value in the right subtree compares greater than or equal to `v`
///
/// After every insertion or erase the heights of the two subtrees of any node differ by at most
/// one, so the tree height stays logarithmic in the number of values.
///
/// Nodes live in a slab and refer to each other by index. Relinking nodes during rebalancing or
/// erase never moves a value, which is what keeps [`Handle`]s to other values valid.
///
/// The tree can either reject values equal to one already present ([`AvlTree::insert`]) or keep
/// all of them ([`AvlTree::insert_non_unique`]). Equal values are placed after the existing ones,
/// so they are iterated in insertion order.
#[derive(Clone)]
pub struct AvlTree<T, C = Natural<T>> {
    nodes: Nodes<T>,
    root: Ptr,
    cmp: C,
}

impl<T, C: Default> Default for AvlTree<T, C> {
    fn default() -> Self {
        Self::with_cmp(C::default())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, C> PartialEq for AvlTree<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for AvlTree<T, C> {}

impl<T: Ord> AvlTree<T> {
    /// Creates an empty tree ordered by the natural order of its values
    pub fn new() -> Self {
        Self::with_cmp(compare::natural())
    }

    /// Creates an empty tree with room for at least `capacity` values before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Nodes::with_capacity(capacity),
            root: Ptr::null(),
            cmp: compare::natural(),
        }
    }
}

impl<T, C> AvlTree<T, C> {
    /// Creates an empty tree ordered by the given comparator
    pub fn with_cmp(cmp: C) -> Self {
        Self {
            nodes: Nodes::new(),
            root: Ptr::null(),
            cmp,
        }
    }

    /// Returns a reference to the comparator of this tree
    pub fn cmp(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of values in the tree
    ///
    /// Time complexity: `O(1)`
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree contains no values
    ///
    /// Time complexity: `O(1)`
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.nodes.is_empty(), self.root.is_null());
        self.nodes.is_empty()
    }

    /// The largest number of values a tree of this type could theoretically hold
    pub fn max_size(&self) -> usize {
        self.nodes.max_size()
    }

    /// Returns the number of values the tree can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Reserves room for at least `additional` more values
    pub fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Shrinks the capacity of the tree as much as possible
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Returns the height of the tree: 0 when empty, 1 for a single value
    ///
    /// Time complexity: `O(1)`
    pub fn height(&self) -> u32 {
        node::height(&self.nodes, self.root)
    }

    /// Removes every value from the tree
    ///
    /// All handles into the tree are invalidated.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = Ptr::null();
    }

    /// Exchanges the contents (and comparators) of two trees
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Returns the position of the smallest value, or the end sentinel if the tree is empty
    pub fn begin(&self) -> Handle {
        Handle::new(node::leftmost(&self.nodes, self.root))
    }

    /// Returns the end sentinel
    pub fn end(&self) -> Handle {
        Handle::end()
    }

    /// Returns the position after `pos` in sorted order
    ///
    /// Stepping forward from the largest value yields the end sentinel, and stepping forward from
    /// the end sentinel wraps around to [`AvlTree::begin`].
    pub fn next(&self, pos: Handle) -> Result<Handle, Error> {
        self.check_position(pos)?;
        Ok(Handle::new(cursor::next_ptr(&self.nodes, self.root, pos.ptr())))
    }

    /// Returns the position before `pos` in sorted order
    ///
    /// Stepping back from the smallest value yields the end sentinel, and stepping back from the
    /// end sentinel yields the largest value.
    pub fn prev(&self, pos: Handle) -> Result<Handle, Error> {
        self.check_position(pos)?;
        Ok(Handle::new(cursor::prev_ptr(&self.nodes, self.root, pos.ptr())))
    }

    /// Returns the value at `pos`
    ///
    /// Fails with [`Error::InvalidPosition`] for the end sentinel or an erased position.
    pub fn get_at(&self, pos: Handle) -> Result<&T, Error> {
        self.nodes.get(pos.ptr())
            .map(|node| &node.value)
            .ok_or(Error::InvalidPosition)
    }

    /// Returns a mutable reference to the value at `pos`
    ///
    /// Changing the value in a way that changes its order relative to the other values is a logic
    /// error. The tree stays memory safe, but lookups may stop finding values.
    pub fn get_at_mut(&mut self, pos: Handle) -> Result<&mut T, Error> {
        self.nodes.get_mut(pos.ptr())
            .map(|node| &mut node.value)
            .ok_or(Error::InvalidPosition)
    }

    /// Returns a cursor pointing at `pos`
    pub fn cursor(&self, pos: Handle) -> Result<Cursor<'_, T>, Error> {
        self.check_position(pos)?;
        Ok(Cursor::new(&self.nodes, self.root, pos.ptr()))
    }

    /// Returns a mutable cursor pointing at `pos`
    pub fn cursor_mut(&mut self, pos: Handle) -> Result<CursorMut<'_, T, C>, Error> {
        self.check_position(pos)?;
        Ok(CursorMut::new(self, pos.ptr()))
    }

    /// Iterates over the values of the tree in sorted order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.root)
    }

    /// Iterates over the values from `first` up to but not including `last`
    ///
    /// If `last` is not reached by stepping forward from `first`, iteration continues to the
    /// largest value.
    ///
    /// Time complexity: `O(k)` where `k` is the number of values in the range
    pub fn range(&self, first: Handle, last: Handle) -> Result<Iter<'_, T>, Error> {
        self.check_position(first)?;
        self.check_position(last)?;

        let mut len = 0;
        let mut current = first.ptr();
        while current != last.ptr() && !current.is_null() {
            len += 1;
            current = node::successor(&self.nodes, current);
        }

        Ok(Iter::range(&self.nodes, first.ptr(), current, len))
    }

    /// Iterates over mutable references to the values of the tree in sorted order
    ///
    /// The same ordering caveat as [`AvlTree::get_at_mut`] applies.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(&mut self.nodes, self.root)
    }

    /// Moves every value out of the tree in sorted order, leaving it empty
    pub fn drain(&mut self) -> IntoIter<T> {
        let nodes = mem::take(&mut self.nodes);
        let root = mem::replace(&mut self.root, Ptr::null());
        log::debug!("draining {} values", nodes.len());

        IntoIter::new(nodes, root)
    }

    /// Erases the value at `pos` and returns it
    ///
    /// A node with two children is replaced by its in-order successor by relinking the successor
    /// into its place, so every other handle stays valid and keeps pointing at the same value.
    ///
    /// Fails with [`Error::InvalidPosition`] for the end sentinel or a position that was already
    /// erased. In that case the tree is not modified.
    ///
    /// Time complexity: `O(log n)`
    pub fn erase(&mut self, pos: Handle) -> Result<T, Error> {
        let target = pos.ptr();
        let InnerNode {value, parent, left, right, ..} = self.nodes.remove(target)
            .ok_or(Error::InvalidPosition)?;

        let retrace_from = if left.is_null() {
            self.replace_child(parent, target, right);
            parent

        } else if right.is_null() {
            self.replace_child(parent, target, left);
            parent

        } else {
            let successor = node::leftmost(&self.nodes, right);
            let retrace_from = if successor == right {
                successor
            } else {
                // Detach the successor (it has no left child) and hand it the right subtree
                let successor_parent = self.nodes[successor].parent;
                let successor_right = self.nodes[successor].right;
                self.replace_child(successor_parent, successor, successor_right);

                self.nodes[successor].right = right;
                self.nodes[right].parent = successor;
                successor_parent
            };

            self.replace_child(parent, target, successor);
            self.nodes[successor].left = left;
            self.nodes[left].parent = successor;

            retrace_from
        };

        log::trace!("erased {:?}, rebalancing from {:?}", target, retrace_from);
        self.retrace(retrace_from);

        Ok(value)
    }

    /// Returns the first position whose value is not less than the probed key
    ///
    /// `probe` orders a value of the tree relative to the key being searched for, like the
    /// function passed to `slice::binary_search_by`. It must agree with the order of the tree.
    pub fn lower_bound_by<F>(&self, mut probe: F) -> Handle
        where F: FnMut(&T) -> Ordering,
    {
        let mut found = Ptr::null();
        let mut current = self.root;
        while !current.is_null() {
            let node = &self.nodes[current];
            if probe(&node.value) == Ordering::Less {
                current = node.right;
            } else {
                found = current;
                current = node.left;
            }
        }

        Handle::new(found)
    }

    /// Returns the first position whose value is greater than the probed key
    ///
    /// See [`AvlTree::lower_bound_by`] for the meaning of `probe`.
    pub fn upper_bound_by<F>(&self, mut probe: F) -> Handle
        where F: FnMut(&T) -> Ordering,
    {
        let mut found = Ptr::null();
        let mut current = self.root;
        while !current.is_null() {
            let node = &self.nodes[current];
            if probe(&node.value) == Ordering::Greater {
                found = current;
                current = node.left;
            } else {
                current = node.right;
            }
        }

        Handle::new(found)
    }

    /// Returns the position of the first value equal to the probed key, or the end sentinel
    ///
    /// See [`AvlTree::lower_bound_by`] for the meaning of `probe`.
    pub fn find_by<F>(&self, mut probe: F) -> Handle
        where F: FnMut(&T) -> Ordering,
    {
        let lower = self.lower_bound_by(&mut probe);
        match self.nodes.get(lower.ptr()) {
            Some(node) if probe(&node.value) == Ordering::Equal => lower,
            _ => Handle::end(),
        }
    }

    fn check_position(&self, pos: Handle) -> Result<(), Error> {
        if pos.is_end() || self.nodes.contains(pos.ptr()) {
            Ok(())
        } else {
            Err(Error::InvalidPosition)
        }
    }

    /// Links `new` into the slot of `parent` that held `old`, or makes it the root if `parent` is
    /// null
    fn replace_child(&mut self, parent: Ptr, old: Ptr, new: Ptr) {
        if parent.is_null() {
            self.root = new;
        } else {
            let parent_node = &mut self.nodes[parent];
            if parent_node.left == old {
                parent_node.left = new;
            } else {
                debug_assert_eq!(parent_node.right, old, "bug: not a child of its parent");
                parent_node.right = new;
            }
        }

        if !new.is_null() {
            self.nodes[new].parent = parent;
        }
    }

    fn update_height(&mut self, ptr: Ptr) {
        let node = &self.nodes[ptr];
        let height = 1 + node::height(&self.nodes, node.left)
            .max(node::height(&self.nodes, node.right));
        self.nodes[ptr].height = height;
    }

    /// Height of the left subtree minus the height of the right subtree
    fn balance_factor(&self, ptr: Ptr) -> i64 {
        let node = &self.nodes[ptr];
        node::height(&self.nodes, node.left) as i64 - node::height(&self.nodes, node.right) as i64
    }

    /// Rotates the subtree at `ptr` to the left and returns its new root
    ///
    /// ```text
    ///     x                y
    ///   a   y     =>     x   c
    ///      b c          a b
    /// ```
    fn rotate_left(&mut self, x: Ptr) -> Ptr {
        let y = self.nodes[x].right;
        let b = self.nodes[y].left;
        let parent = self.nodes[x].parent;

        self.nodes[x].right = b;
        if !b.is_null() {
            self.nodes[b].parent = x;
        }

        self.replace_child(parent, x, y);
        self.nodes[y].left = x;
        self.nodes[x].parent = y;

        self.update_height(x);
        self.update_height(y);
        log::trace!("rotated left at {:?}", x);

        y
    }

    /// Rotates the subtree at `ptr` to the right and returns its new root
    ///
    /// ```text
    ///       y            x
    ///     x   c   =>   a   y
    ///    a b              b c
    /// ```
    fn rotate_right(&mut self, y: Ptr) -> Ptr {
        let x = self.nodes[y].left;
        let b = self.nodes[x].right;
        let parent = self.nodes[y].parent;

        self.nodes[y].left = b;
        if !b.is_null() {
            self.nodes[b].parent = y;
        }

        self.replace_child(parent, y, x);
        self.nodes[x].right = y;
        self.nodes[y].parent = x;

        self.update_height(y);
        self.update_height(x);
        log::trace!("rotated right at {:?}", y);

        x
    }

    /// Restores the balance of the subtree at `ptr`, assuming both of its children are balanced,
    /// and returns the root of the resulting subtree
    fn rebalance(&mut self, ptr: Ptr) -> Ptr {
        self.update_height(ptr);

        let balance = self.balance_factor(ptr);
        if balance > 1 {
            let left = self.nodes[ptr].left;
            // Left-right case
            if self.balance_factor(left) < 0 {
                self.rotate_left(left);
            }
            self.rotate_right(ptr)

        } else if balance < -1 {
            let right = self.nodes[ptr].right;
            // Right-left case
            if self.balance_factor(right) > 0 {
                self.rotate_right(right);
            }
            self.rotate_left(ptr)

        } else {
            ptr
        }
    }

    /// Rebalances every node from `ptr` up to the root
    fn retrace(&mut self, mut ptr: Ptr) {
        while !ptr.is_null() {
            let subtree = self.rebalance(ptr);
            ptr = self.nodes[subtree].parent;
        }
    }
}

impl<T, C: Compare<T>> AvlTree<T, C> {
    /// Inserts a value unless an equal value is already present
    ///
    /// Returns the position of the inserted value and `true`, or the position of the existing
    /// equal value and `false`. In the latter case `value` is dropped.
    ///
    /// Time complexity: `O(log n)`
    pub fn insert(&mut self, value: T) -> (Handle, bool) {
        self.insert_with(value, true)
    }

    /// Inserts a value even if equal values are already present
    ///
    /// The new value is placed after every value equal to it. Always returns `true`.
    ///
    /// Time complexity: `O(log n)`
    pub fn insert_non_unique(&mut self, value: T) -> (Handle, bool) {
        self.insert_with(value, false)
    }

    /// Inserts every value of `values` with [`AvlTree::insert`], returning the result of each
    pub fn insert_many<I>(&mut self, values: I) -> Vec<(Handle, bool)>
        where I: IntoIterator<Item=T>,
    {
        values.into_iter().map(|value| self.insert(value)).collect()
    }

    /// Inserts every value of `values` with [`AvlTree::insert_non_unique`]
    pub fn insert_many_non_unique<I>(&mut self, values: I) -> Vec<(Handle, bool)>
        where I: IntoIterator<Item=T>,
    {
        values.into_iter().map(|value| self.insert_non_unique(value)).collect()
    }

    fn insert_with(&mut self, value: T, unique: bool) -> (Handle, bool) {
        let mut parent = Ptr::null();
        let mut is_left = false;
        let mut current = self.root;
        while !current.is_null() {
            let node = &self.nodes[current];
            parent = current;
            match self.cmp.compare(&value, &node.value) {
                Ordering::Less => {
                    is_left = true;
                    current = node.left;
                },
                Ordering::Equal if unique => return (Handle::new(current), false),
                Ordering::Equal | Ordering::Greater => {
                    is_left = false;
                    current = node.right;
                },
            }
        }

        let ptr = self.nodes.push(InnerNode::leaf(value, parent));
        if parent.is_null() {
            self.root = ptr;
        } else if is_left {
            self.nodes[parent].left = ptr;
        } else {
            self.nodes[parent].right = ptr;
        }

        self.retrace(parent);

        (Handle::new(ptr), true)
    }

    /// Returns the position of the first value equal to `value`, or the end sentinel
    ///
    /// Time complexity: `O(log n)`
    pub fn find(&self, value: &T) -> Handle {
        self.find_by(|probe| self.cmp.compare(probe, value))
    }

    /// Returns the first position whose value is not less than `value`
    pub fn lower_bound(&self, value: &T) -> Handle {
        self.lower_bound_by(|probe| self.cmp.compare(probe, value))
    }

    /// Returns the first position whose value is greater than `value`
    pub fn upper_bound(&self, value: &T) -> Handle {
        self.upper_bound_by(|probe| self.cmp.compare(probe, value))
    }

    /// Returns true if a value equal to `value` is present
    pub fn contains(&self, value: &T) -> bool {
        !self.find(value).is_end()
    }

    /// Returns the first stored value equal to `value`
    pub fn get(&self, value: &T) -> Option<&T> {
        self.get_at(self.find(value)).ok()
    }

    /// Moves every value of `other` into this tree, dropping the ones equal to a value already
    /// present
    ///
    /// `other` is left empty.
    pub fn merge(&mut self, other: &mut Self) {
        log::debug!("merging {} values into a tree of {}", other.len(), self.len());
        self.reserve(other.len());
        for value in other.drain() {
            self.insert(value);
        }
    }

    /// Moves every value of `other` into this tree, keeping duplicates
    ///
    /// `other` is left empty.
    pub fn merge_non_unique(&mut self, other: &mut Self) {
        log::debug!("merging {} values into a tree of {}", other.len(), self.len());
        self.reserve(other.len());
        for value in other.drain() {
            self.insert_non_unique(value);
        }
    }

    /// Checks every structural invariant of the tree, panicking if one does not hold
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        if !self.root.is_null() {
            assert!(self.nodes[self.root].parent.is_null(), "root has a parent");
        }

        let reachable = self.check_subtree(self.root);
        assert_eq!(reachable, self.nodes.len(), "nodes unreachable from the root");

        let mut prev: Option<&T> = None;
        for value in self.iter() {
            if let Some(prev) = prev {
                assert_ne!(self.cmp.compare(prev, value), Ordering::Greater, "values out of order");
            }
            prev = Some(value);
        }
    }

    /// Returns the number of nodes in the subtree at `ptr`
    fn check_subtree(&self, ptr: Ptr) -> usize {
        if ptr.is_null() {
            return 0;
        }

        let node = &self.nodes[ptr];
        for &child in &[node.left, node.right] {
            if !child.is_null() {
                assert_eq!(self.nodes[child].parent, ptr, "broken parent link");
            }
        }

        let left_height = node::height(&self.nodes, node.left);
        let right_height = node::height(&self.nodes, node.right);
        assert_eq!(node.height, 1 + left_height.max(right_height), "stale height");
        assert!(self.balance_factor(ptr).abs() <= 1, "unbalanced node");

        1 + self.check_subtree(node.left) + self.check_subtree(node.right)
    }
}

impl<T, C: Compare<T>> Extend<T> for AvlTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for AvlTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<T, C> IntoIterator for AvlTree<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.nodes, self.root)
    }
}

impl<'a, T, C> IntoIterator for &'a AvlTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, C> IntoIterator for &'a mut AvlTree<T, C> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
