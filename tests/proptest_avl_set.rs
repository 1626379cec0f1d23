use avl_collections::avl_tree::AvlSet;
use proptest::prelude::*;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug)]
enum Op {
    Insert(u16),
    Remove(u16),
    Find(u16),
    LowerBound(u16),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u16..512).prop_map(Op::Insert),
        2 => (0u16..512).prop_map(Op::Remove),
        1 => (0u16..512).prop_map(Op::Find),
        1 => (0u16..512).prop_map(Op::LowerBound),
    ]
}

fn run_btree_equivalence(ops: Vec<Op>) {
    let mut btree = BTreeSet::new();
    let mut avl = AvlSet::new();

    for (op_id, op) in ops.into_iter().enumerate() {
        match op {
            Op::Insert(key) => {
                assert_eq!(avl.insert(key), btree.insert(key), "Op #{}: {:?}", op_id, op);
            },
            Op::Remove(key) => {
                assert_eq!(avl.remove(&key), btree.take(&key), "Op #{}: {:?}", op_id, op);
            },
            Op::Find(key) => {
                assert_eq!(avl.find(&key).get(), btree.get(&key), "Op #{}: {:?}", op_id, op);
            },
            Op::LowerBound(key) => {
                assert_eq!(
                    avl.lower_bound(&key).get(),
                    btree.range(key..).next(),
                    "Op #{}: {:?}",
                    op_id,
                    op,
                );
            },
        }
        avl.assert_invariants();
        assert_eq!(avl.len(), btree.len());
    }

    assert!(avl.iter().eq(btree.iter()));
    assert!(avl.iter().rev().eq(btree.iter().rev()));
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(op_strategy(), 0..400)) {
        run_btree_equivalence(ops);
    }

    #[test]
    fn insert_is_idempotent(keys in proptest::collection::vec(any::<i32>(), 0..200)) {
        let once: AvlSet<i32> = keys.iter().cloned().collect();
        let mut twice = once.clone();
        twice.extend(&keys);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.len(), keys.iter().collect::<BTreeSet<_>>().len());
    }

    #[test]
    fn remove_absent_is_noop(
        keys in proptest::collection::vec(0u32..1000, 0..200),
        absent in 1000u32..2000
    ) {
        let mut set: AvlSet<u32> = keys.into_iter().collect();
        let before = set.clone();
        prop_assert_eq!(set.remove(&absent), None);
        prop_assert_eq!(&set, &before);
        set.assert_invariants();
    }

    #[test]
    fn height_is_logarithmic(keys in proptest::collection::vec(any::<u32>(), 1..2000)) {
        let set: AvlSet<u32> = keys.into_iter().collect();
        let bound = (1.4405 * ((set.len() + 2) as f64).log2()).floor() as usize;
        prop_assert!(set.height() <= bound);
    }
}
