use crate::slab::{Ptr, Slab};

/// A single value-holding node of the tree
///
/// `left` and `right` are the owning links of the tree structure. `parent` is only a back-reference
/// used to walk upwards during iteration and rebalancing. All three are indexes into the same
/// slab, so relinking nodes never moves the values they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InnerNode<T> {
    pub value: T,
    pub parent: Ptr,
    pub left: Ptr,
    pub right: Ptr,
    /// Height of the subtree rooted at this node. A leaf has height 1 and a missing subtree has
    /// height 0.
    pub height: u32,
}

impl<T> InnerNode<T> {
    pub fn leaf(value: T, parent: Ptr) -> Self {
        Self {
            value,
            parent,
            left: Ptr::null(),
            right: Ptr::null(),
            height: 1,
        }
    }
}

pub(crate) type Nodes<T> = Slab<InnerNode<T>>;

/// Returns the height of the subtree at `ptr`, counting a null subtree as 0
#[inline]
pub(crate) fn height<T>(nodes: &Nodes<T>, ptr: Ptr) -> u32 {
    if ptr.is_null() {
        0
    } else {
        nodes[ptr].height
    }
}

/// Returns the leftmost (minimum) node of the subtree at `ptr`, or null if the subtree is empty
pub(crate) fn leftmost<T>(nodes: &Nodes<T>, mut ptr: Ptr) -> Ptr {
    if ptr.is_null() {
        return ptr;
    }

    loop {
        let left = nodes[ptr].left;
        if left.is_null() {
            return ptr;
        }
        ptr = left;
    }
}

/// Returns the rightmost (maximum) node of the subtree at `ptr`, or null if the subtree is empty
pub(crate) fn rightmost<T>(nodes: &Nodes<T>, mut ptr: Ptr) -> Ptr {
    if ptr.is_null() {
        return ptr;
    }

    loop {
        let right = nodes[ptr].right;
        if right.is_null() {
            return ptr;
        }
        ptr = right;
    }
}

/// Returns the in-order successor of the (non-null) node `ptr`, or null if it is the maximum
///
/// Walks parent links instead of keeping a stack: if there is a right subtree, the successor is
/// its minimum. Otherwise it is the first ancestor reached by moving up out of a left subtree.
pub(crate) fn successor<T>(nodes: &Nodes<T>, ptr: Ptr) -> Ptr {
    let node = &nodes[ptr];
    if !node.right.is_null() {
        return leftmost(nodes, node.right);
    }

    let mut child = ptr;
    let mut parent = node.parent;
    while !parent.is_null() && nodes[parent].right == child {
        child = parent;
        parent = nodes[parent].parent;
    }

    parent
}

/// Returns the in-order predecessor of the (non-null) node `ptr`, or null if it is the minimum
pub(crate) fn predecessor<T>(nodes: &Nodes<T>, ptr: Ptr) -> Ptr {
    let node = &nodes[ptr];
    if !node.left.is_null() {
        return rightmost(nodes, node.left);
    }

    let mut child = ptr;
    let mut parent = node.parent;
    while !parent.is_null() && nodes[parent].left == child {
        child = parent;
        parent = nodes[parent].parent;
    }

    parent
}

/// Collects the pointers of every node in the subtree at `root` in sorted order
pub(crate) fn inorder_ptrs<T>(nodes: &Nodes<T>, root: Ptr) -> Vec<Ptr> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut current = leftmost(nodes, root);
    while !current.is_null() {
        order.push(current);
        current = successor(nodes, current);
    }

    order
}
