use std::collections::BTreeSet;

use rand::prelude::*;

use avl_containers::{AvlMap, AvlMultiset, AvlSet, AvlTree, Handle, avl_map};

fn for_each_case(test_case: fn()) {
    cfg_if::cfg_if! {
        if #[cfg(miri)] {
            (0..16).into_iter().for_each(|_| test_case());
        } else {
            use rayon::prelude::*;

            (0..128).into_par_iter().for_each(|_| test_case());
        }
    }
}

/// Collects every handle from `begin()` up to (but not including) `end()`
fn positions<T, C>(tree: &AvlTree<T, C>) -> Vec<Handle> {
    let mut handles = Vec::new();
    let mut pos = tree.begin();
    while !pos.is_end() {
        handles.push(pos);
        pos = tree.next(pos).unwrap();
    }
    handles
}

#[test]
fn balanced_after_every_insert() {
    for_each_case(|| {
        let mut rng = rand::thread_rng();
        let mut tree = AvlTree::new();
        let mut distinct = BTreeSet::new();

        for _ in 0..rng.gen_range(1..=200) {
            let value: u16 = rng.gen_range(0..300);
            let (_, inserted) = tree.insert(value);
            assert_eq!(inserted, distinct.insert(value));

            tree.assert_invariants();
            assert_eq!(tree.len(), distinct.len());
        }

        // Re-inserting anything already present changes nothing
        for &value in &distinct {
            let (pos, inserted) = tree.insert(value);
            assert!(!inserted);
            assert_eq!(tree.get_at(pos), Ok(&value));
        }
        assert_eq!(tree.len(), distinct.len());

        // Strictly increasing traversal
        let values: Vec<_> = tree.iter().copied().collect();
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    });
}

#[test]
fn multiset_traversal_is_non_decreasing() {
    for_each_case(|| {
        let mut rng = rand::thread_rng();
        let mut set = AvlMultiset::new();
        let count = rng.gen_range(1..=200);
        for _ in 0..count {
            set.insert(rng.gen_range(0..20u8));
        }

        assert_eq!(set.len(), count);
        let values: Vec<_> = set.iter().copied().collect();
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    });
}

#[test]
fn next_and_prev_are_inverse() {
    for_each_case(|| {
        let mut rng = rand::thread_rng();
        let tree: AvlTree<i32> = (0..rng.gen_range(1..=100)).map(|_| rng.gen_range(-500..500)).collect();

        let handles = positions(&tree);
        for (i, &pos) in handles.iter().enumerate() {
            if i > 0 {
                assert_eq!(tree.next(tree.prev(pos).unwrap()).unwrap(), pos);
            }
            assert_eq!(tree.prev(tree.next(pos).unwrap()).unwrap(), pos);
        }
    });
}

#[test]
fn erase_then_find_returns_end() {
    for_each_case(|| {
        let mut rng = rand::thread_rng();
        let mut set: AvlSet<u32> = (0..rng.gen_range(1..=100)).map(|_| rng.gen_range(0..200)).collect();

        let values: Vec<_> = set.iter().copied().collect();
        let value = *values.choose(&mut rng).unwrap();

        let pos = set.find(&value);
        assert_eq!(set.erase(pos), Ok(value));
        assert_eq!(set.find(&value), set.end());
        assert!(!set.contains(&value));
    });
}

#[test]
fn merge_sizes() {
    for_each_case(|| {
        let mut rng = rand::thread_rng();
        let a_values: Vec<u8> = (0..rng.gen_range(0..50)).map(|_| rng.gen()).collect();
        let b_values: Vec<u8> = (0..rng.gen_range(0..50)).map(|_| rng.gen()).collect();

        let mut a: AvlSet<_> = a_values.iter().copied().collect();
        let mut b: AvlSet<_> = b_values.iter().copied().collect();
        a.merge(&mut b);

        let union: BTreeSet<_> = a_values.iter().chain(&b_values).copied().collect();
        assert!(b.is_empty());
        assert_eq!(a.len(), union.len());
        assert!(a.iter().eq(union.iter()));

        let mut a: AvlMultiset<_> = a_values.iter().copied().collect();
        let mut b: AvlMultiset<_> = b_values.iter().copied().collect();
        a.merge(&mut b);

        assert!(b.is_empty());
        assert_eq!(a.len(), a_values.len() + b_values.len());
    });
}

#[test]
fn ordered_set_scenario() {
    let mut tree = AvlTree::new();
    let mut set = AvlSet::new();
    for &value in &[30, 5, 43, 1, 20, 40, 60, 35, 32] {
        tree.insert(value);
        set.insert(value);

        tree.assert_invariants();
        // ceil(log2(10)) + 1
        assert!(tree.height() <= 5);
    }

    assert_eq!(set.len(), 9);
    assert_eq!(set.first(), Some(&1));
    assert_eq!(set.last(), Some(&60));
}

#[test]
fn map_merge_scenario() {
    let mut map = avl_map! {1 => 2, 2 => 3, 3 => 4, 4 => 5};
    let mut other = avl_map! {5 => 6, 6 => 7};
    map.merge(&mut other);

    assert_eq!(map.len(), 6);
    assert_eq!(map.at(&5), Ok(&6));
    assert_eq!(map.at(&1), Ok(&2));
    assert!(other.is_empty());
}

#[test]
fn erase_only_element() {
    let mut set = AvlSet::new();
    set.insert("only");
    set.erase(set.begin()).unwrap();
    assert_eq!(set.len(), 0);
    assert_eq!(set.begin(), set.end());

    let mut map: AvlMap<_, _> = Some((1, 1)).into_iter().collect();
    map.erase(map.begin()).unwrap();
    assert!(map.is_empty());
    assert_eq!(map.begin(), map.end());
}
