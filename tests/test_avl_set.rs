use avl_collections::avl_tree::{AvlSet, Error};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

fn max_avl_height(len: usize) -> usize {
    (1.4405 * ((len + 2) as f64).log2()).floor() as usize
}

#[test]
fn int_test_avl_set() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut set = AvlSet::new();
    let mut expected = BTreeSet::new();
    for _ in 0..20_000 {
        let key = rng.gen_range(0..2_000u32);

        if rng.gen_bool(0.6) {
            assert_eq!(set.insert(key), expected.insert(key));
        } else {
            assert_eq!(set.remove(&key), expected.take(&key));
        }
        assert_eq!(set.len(), expected.len());
    }

    set.assert_invariants();
    assert!(set.height() <= max_avl_height(set.len()));
    assert_eq!(
        set.iter().collect::<Vec<&u32>>(),
        expected.iter().collect::<Vec<&u32>>(),
    );
}

#[test]
fn int_test_sequential_height() {
    let mut set = AvlSet::new();
    for key in 0..(1u32 << 12) {
        set.insert(key);
    }
    set.assert_invariants();
    assert_eq!(set.height(), 13);

    for key in (0..(1u32 << 12)).step_by(2) {
        set.remove(&key);
    }
    set.assert_invariants();
    assert!(set.height() <= max_avl_height(set.len()));
}

#[test]
fn int_test_traversal_directions() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut keys: Vec<i32> = (-500..500).collect();
    keys.shuffle(&mut rng);
    let set: AvlSet<i32> = keys.into_iter().collect();

    let mut forward = Vec::new();
    let mut cursor = set.begin();
    while let Some(key) = cursor.get() {
        forward.push(*key);
        cursor.move_next();
    }
    assert!(forward.windows(2).all(|pair| pair[0] < pair[1]));

    let mut backward = Vec::new();
    let mut cursor = set.end();
    cursor.move_prev();
    while let Some(key) = cursor.get() {
        backward.push(*key);
        cursor.move_prev();
    }
    backward.reverse();
    assert_eq!(forward, backward);
    assert_eq!(forward, set.iter().cloned().collect::<Vec<i32>>());
}

#[test]
fn int_test_lower_bound_matches_btreeset() {
    let mut rng = StdRng::seed_from_u64(11);
    let expected: BTreeSet<u32> = (0..300).map(|_| rng.gen_range(0..10_000u32)).collect();
    let set: AvlSet<u32> = expected.iter().cloned().collect();

    for probe in (0..10_100u32).step_by(37) {
        assert_eq!(set.lower_bound(&probe).get(), expected.range(probe..).next());
    }
}

#[test]
fn int_test_clone_round_trip() {
    let original: AvlSet<u32> = (0..1000).map(|key| key * 7 % 1009).collect();
    let mut copy = original.clone();
    assert!(original.iter().eq(copy.iter()));
    copy.assert_invariants();

    let doomed: Vec<u32> = original.iter().take(500).cloned().collect();
    for key in &doomed {
        assert_eq!(copy.remove(key), Some(*key));
    }
    assert!(doomed.iter().all(|key| original.contains(key)));
    assert_eq!(original.len(), 1000);
    assert_eq!(copy.len(), 500);
    original.assert_invariants();
}

#[test]
fn int_test_positions_across_mutations() {
    let mut set: AvlSet<u32> = (0..256).collect();
    let positions: Vec<_> = (0..256).map(|key| set.find(&key).position()).collect();

    for key in (0..256).filter(|key| key % 3 == 0) {
        set.remove(&key);
    }
    for key in 256..512 {
        set.insert(key);
    }

    for (key, position) in (0..256u32).zip(positions) {
        if key % 3 == 0 {
            assert_eq!(set.get(position), Err(Error::StalePosition));
        } else {
            assert_eq!(set.get(position), Ok(&key));
        }
    }
}
