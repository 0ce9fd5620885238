mod slab;

pub mod error;
pub mod tree;
pub mod map;
pub mod set;
pub mod multiset;
pub mod vector;
pub mod list;
pub mod stack;
pub mod queue;
pub mod array;

pub use error::Error;
pub use tree::{AvlTree, Handle, Cursor, CursorMut};
pub use map::AvlMap;
pub use set::AvlSet;
pub use multiset::AvlMultiset;
pub use vector::Vector;
pub use list::List;
pub use stack::Stack;
pub use queue::Queue;
pub use array::Array;

#[macro_export(local_inner_macros)]
macro_rules! avl_map {
    // trailing comma case
    ($($key:expr => $value:expr,)+) => (avl_map!($($key => $value),+));

    ( $($key:expr => $value:expr),* ) => {
        {
            let mut _map = $crate::AvlMap::new();
            $(
                let _ = _map.insert($key, $value);
            )*
            _map
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __avl_count {
    (@single $($x:tt)*) => (());
    ($($rest:expr),*) => (<[()]>::len(&[$($crate::__avl_count!(@single $rest)),*]));
}

#[macro_export(local_inner_macros)]
macro_rules! avl_set {
    ($($key:expr,)+) => { avl_set!($($key),+) };
    ($($key:expr),*) => {
        {
            let _cap = __avl_count!($($key),*);
            let mut _set = $crate::AvlSet::with_capacity(_cap);
            $(
                let _ = _set.insert($key);
            )*
            _set
        }
    };
}

#[macro_export(local_inner_macros)]
macro_rules! avl_multiset {
    ($($key:expr,)+) => { avl_multiset!($($key),+) };
    ($($key:expr),*) => {
        {
            let _cap = __avl_count!($($key),*);
            let mut _set = $crate::AvlMultiset::with_capacity(_cap);
            $(
                let _ = _set.insert($key);
            )*
            _set
        }
    };
}
