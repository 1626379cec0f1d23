use crate::arena::{Entry, TypedArena};
use crate::avl_tree::node::Node;
use log::trace;
use std::borrow::Borrow;
use std::cmp::{self, Ordering};

pub type Arena<T> = TypedArena<Node<T>>;

pub fn height<T>(arena: &Arena<T>, tree: Option<Entry>) -> usize {
    match tree {
        None => 0,
        Some(entry) => arena[entry].height,
    }
}

pub fn balance_factor<T>(arena: &Arena<T>, entry: Entry) -> isize {
    let node = &arena[entry];
    height(arena, node.right) as isize - height(arena, node.left) as isize
}

// Must run bottom-up after any change to the children of `entry`.
pub fn update<T>(arena: &mut Arena<T>, entry: Entry) {
    let (left, right) = {
        let node = &arena[entry];
        (node.left, node.right)
    };
    for child in left.iter().chain(right.iter()) {
        arena[*child].parent = Some(entry);
    }
    arena[entry].height = cmp::max(height(arena, left), height(arena, right)) + 1;
}

fn rotate_right<T>(arena: &mut Arena<T>, entry: Entry) -> Entry {
    let child = match arena[entry].left {
        Some(child) => child,
        None => unreachable!(),
    };
    let grandchild = arena[child].right;
    arena[entry].left = grandchild;
    arena[child].right = Some(entry);
    update(arena, entry);
    update(arena, child);
    trace!("rotated right: {:?} promoted over {:?}", child, entry);
    child
}

fn rotate_left<T>(arena: &mut Arena<T>, entry: Entry) -> Entry {
    let child = match arena[entry].right {
        Some(child) => child,
        None => unreachable!(),
    };
    let grandchild = arena[child].left;
    arena[entry].right = grandchild;
    arena[child].left = Some(entry);
    update(arena, entry);
    update(arena, child);
    trace!("rotated left: {:?} promoted over {:?}", child, entry);
    child
}

/// Restores the height and balance of the subtree rooted at `entry`, assuming both of its
/// subtrees are already balanced and differ in height by at most two. Returns the new subtree
/// root.
pub fn rebalance<T>(arena: &mut Arena<T>, entry: Entry) -> Entry {
    update(arena, entry);

    match balance_factor(arena, entry) {
        -2 => {
            if let Some(child) = arena[entry].left {
                if balance_factor(arena, child) > 0 {
                    let new_child = rotate_left(arena, child);
                    arena[entry].left = Some(new_child);
                }
            }
            rotate_right(arena, entry)
        },
        2 => {
            if let Some(child) = arena[entry].right {
                if balance_factor(arena, child) < 0 {
                    let new_child = rotate_right(arena, child);
                    arena[entry].right = Some(new_child);
                }
            }
            rotate_left(arena, entry)
        },
        _ => entry,
    }
}

// The returned root's parent link is left for the caller to fix.
pub fn insert<T>(arena: &mut Arena<T>, tree: Option<Entry>, key: T) -> Entry
where
    T: Ord,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return arena.allocate(Node::new(key)),
    };

    match key.cmp(&arena[entry].key) {
        Ordering::Less => {
            let left = arena[entry].left;
            let new_left = insert(arena, left, key);
            arena[entry].left = Some(new_left);
        },
        Ordering::Greater => {
            let right = arena[entry].right;
            let new_right = insert(arena, right, key);
            arena[entry].right = Some(new_right);
        },
        Ordering::Equal => return entry,
    }

    rebalance(arena, entry)
}

// Unlinks the minimum of the subtree rooted at `entry` without freeing it.
fn remove_min<T>(arena: &mut Arena<T>, entry: Entry) -> Option<Entry> {
    let left = match arena[entry].left {
        Some(left) => left,
        None => return arena[entry].right,
    };
    let new_left = remove_min(arena, left);
    arena[entry].left = new_left;
    Some(rebalance(arena, entry))
}

/// Removes `key` from the subtree rooted at `tree`, returning the new subtree root and the
/// removed key. The removed node is replaced by the minimum of its right subtree.
pub fn remove<T, Q>(
    arena: &mut Arena<T>,
    tree: Option<Entry>,
    key: &Q,
) -> (Option<Entry>, Option<T>)
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return (None, None),
    };

    let ret = match key.cmp(arena[entry].key.borrow()) {
        Ordering::Less => {
            let left = arena[entry].left;
            let (new_left, ret) = remove(arena, left, key);
            arena[entry].left = new_left;
            ret
        },
        Ordering::Greater => {
            let right = arena[entry].right;
            let (new_right, ret) = remove(arena, right, key);
            arena[entry].right = new_right;
            ret
        },
        Ordering::Equal => {
            let Node { key, left, right, .. } = arena.free(&entry);
            let right = match right {
                Some(right) => right,
                None => return (left, Some(key)),
            };
            let successor = match min(arena, Some(right)) {
                Some(successor) => successor,
                None => unreachable!(),
            };
            let new_right = remove_min(arena, right);
            arena[successor].left = left;
            arena[successor].right = new_right;
            return (Some(rebalance(arena, successor)), Some(key));
        },
    };

    (Some(rebalance(arena, entry)), ret)
}

/// Frees every node of the subtree rooted at `tree`. Children are unlinked from a node before it
/// is freed, so no node is visited twice. Returns the number of freed nodes.
pub fn destroy<T>(arena: &mut Arena<T>, tree: Option<Entry>) -> usize {
    let mut stack: Vec<Entry> = tree.into_iter().collect();
    let mut freed = 0;
    while let Some(entry) = stack.pop() {
        let Node { left, right, .. } = arena.free(&entry);
        stack.extend(left);
        stack.extend(right);
        freed += 1;
    }
    freed
}

pub fn find<T, Q>(arena: &Arena<T>, tree: Option<Entry>, key: &Q) -> Option<Entry>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    tree.and_then(|entry| {
        let node = &arena[entry];
        match key.cmp(node.key.borrow()) {
            Ordering::Less => find(arena, node.left, key),
            Ordering::Greater => find(arena, node.right, key),
            Ordering::Equal => Some(entry),
        }
    })
}

/// Returns the node holding the smallest key that is not less than `key`.
pub fn lower_bound<T, Q>(arena: &Arena<T>, tree: Option<Entry>, key: &Q) -> Option<Entry>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    tree.and_then(|entry| {
        let node = &arena[entry];
        if node.key.borrow() < key {
            lower_bound(arena, node.right, key)
        } else {
            match lower_bound(arena, node.left, key) {
                None => Some(entry),
                res => res,
            }
        }
    })
}

pub fn min<T>(arena: &Arena<T>, tree: Option<Entry>) -> Option<Entry> {
    let mut curr = tree?;
    while let Some(left) = arena[curr].left {
        curr = left;
    }
    Some(curr)
}

pub fn max<T>(arena: &Arena<T>, tree: Option<Entry>) -> Option<Entry> {
    let mut curr = tree?;
    while let Some(right) = arena[curr].right {
        curr = right;
    }
    Some(curr)
}

/// In-order successor of `entry`, or `None` if `entry` holds the maximum.
pub fn next<T>(arena: &Arena<T>, entry: Entry) -> Option<Entry> {
    if let Some(right) = arena[entry].right {
        return min(arena, Some(right));
    }

    let mut curr = entry;
    let mut parent = arena[entry].parent;
    while let Some(parent_entry) = parent {
        if arena[parent_entry].right != Some(curr) {
            break;
        }
        curr = parent_entry;
        parent = arena[parent_entry].parent;
    }
    parent
}

/// In-order predecessor of `entry`, or `None` if `entry` holds the minimum.
pub fn prev<T>(arena: &Arena<T>, entry: Entry) -> Option<Entry> {
    if let Some(left) = arena[entry].left {
        return max(arena, Some(left));
    }

    let mut curr = entry;
    let mut parent = arena[entry].parent;
    while let Some(parent_entry) = parent {
        if arena[parent_entry].left != Some(curr) {
            break;
        }
        curr = parent_entry;
        parent = arena[parent_entry].parent;
    }
    parent
}

/// Checks the ordering, height, balance and parent invariants of the subtree rooted at `tree`
/// and returns the number of nodes in it.
///
/// # Panics
///
/// Panics on the first violated invariant.
pub fn assert_invariants<T>(arena: &Arena<T>, tree: Option<Entry>, parent: Option<Entry>) -> usize
where
    T: Ord,
{
    let entry = match tree {
        Some(entry) => entry,
        None => return 0,
    };
    let node = &arena[entry];

    assert_eq!(node.parent, parent, "parent link of {:?} is inconsistent", entry);
    assert_eq!(
        node.height,
        cmp::max(height(arena, node.left), height(arena, node.right)) + 1,
        "cached height of {:?} is stale",
        entry,
    );
    assert!(
        balance_factor(arena, entry).abs() <= 1,
        "{:?} is out of balance",
        entry,
    );
    if let Some(left_max) = max(arena, node.left) {
        assert!(arena[left_max].key < node.key, "left subtree of {:?} is out of order", entry);
    }
    if let Some(right_min) = min(arena, node.right) {
        assert!(node.key < arena[right_min].key, "right subtree of {:?} is out of order", entry);
    }

    1 + assert_invariants(arena, node.left, Some(entry))
        + assert_invariants(arena, node.right, Some(entry))
}
