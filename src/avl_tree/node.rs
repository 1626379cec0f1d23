use crate::arena::Entry;

/// A struct representing an internal node of an avl tree.
///
/// `left` and `right` are the owning links: a node is live exactly when it is reachable from the
/// root through them. `parent` is only read by cursors walking the tree.
pub struct Node<T> {
    pub key: T,
    pub height: usize,
    pub left: Option<Entry>,
    pub right: Option<Entry>,
    pub parent: Option<Entry>,
}

impl<T> Node<T> {
    pub fn new(key: T) -> Self {
        Node {
            key,
            height: 1,
            left: None,
            right: None,
            parent: None,
        }
    }
}
