use crate::arena::Entry;
use crate::avl_tree::tree::{self, Arena};
use crate::avl_tree::{Error, Result};
use log::debug;
use std::borrow::Borrow;
use std::fmt;
use std::iter::FromIterator;
use std::vec;

/// Number of nodes per arena chunk used by `AvlSet::new`.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of two child subtrees of any node differ by at most one. Nodes are stored in a typed
/// arena and link to their parent, so a [`Cursor`] can step in both directions without an
/// auxiliary stack.
///
/// # Examples
/// ```
/// use avl_collections::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.lower_bound(&2).get(), Some(&3));
///
/// assert_eq!(set.remove(&0), Some(0));
/// assert_eq!(set.remove(&1), None);
/// ```
pub struct AvlSet<T> {
    arena: Arena<T>,
    root: Option<Entry>,
    len: usize,
}

impl<T> AvlSet<T> {
    /// Constructs a new, empty `AvlSet<T>`.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `AvlSet<T>` whose nodes are allocated `chunk_size` at a time.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::with_chunk_size(16);
    /// set.insert(1);
    /// assert_eq!(set.chunk_size(), 16);
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        AvlSet {
            arena: Arena::new(chunk_size),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of nodes allocated per arena chunk.
    pub fn chunk_size(&self) -> usize {
        self.arena.chunk_size()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the height of the tree. An empty set has height zero.
    pub fn height(&self) -> usize {
        tree::height(&self.arena, self.root)
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        let freed = tree::destroy(&mut self.arena, self.root.take());
        self.len = 0;
        debug!("cleared avl set of {} keys", freed);
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<_> = [1, 3].into();
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.begin().get()
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<_> = [1, 3].into();
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        tree::max(&self.arena, self.root).map(|entry| &self.arena[entry].key)
    }

    /// Returns a cursor at the minimum key, or the end cursor if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<_> = [2, 1].into();
    /// let mut cursor = set.begin();
    /// assert_eq!(cursor.get(), Some(&1));
    /// cursor.move_next();
    /// cursor.move_next();
    /// assert_eq!(cursor, set.end());
    /// ```
    pub fn begin(&self) -> Cursor<T> {
        self.cursor(tree::min(&self.arena, self.root))
    }

    /// Returns the end cursor, which sits one past the maximum key. Moving it backwards yields
    /// the maximum key.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<_> = [2, 1].into();
    /// let mut cursor = set.end();
    /// assert_eq!(cursor.get(), None);
    /// cursor.move_prev();
    /// assert_eq!(cursor.get(), Some(&2));
    /// ```
    pub fn end(&self) -> Cursor<T> {
        self.cursor(None)
    }

    /// Returns a cursor at the element `position` was taken from.
    ///
    /// The end position always resolves. Positions are only meaningful for the set that produced
    /// them.
    ///
    /// # Errors
    ///
    /// Returns `Error::StalePosition` if that element has since been removed.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::{AvlSet, Error};
    ///
    /// let mut set: AvlSet<_> = [1, 2, 3].into();
    /// let two = set.find(&2).position();
    ///
    /// set.remove(&3);
    /// assert_eq!(set.cursor_at(two).unwrap().get(), Some(&2));
    ///
    /// set.remove(&2);
    /// assert_eq!(set.cursor_at(two).unwrap_err(), Error::StalePosition);
    /// ```
    pub fn cursor_at(&self, position: Position) -> Result<Cursor<T>> {
        match position.node {
            Some(entry) if !self.arena.contains(&entry) => Err(Error::StalePosition),
            node => Ok(self.cursor(node)),
        }
    }

    /// Returns the key at `position`.
    ///
    /// # Errors
    ///
    /// Returns `Error::EndPosition` for the end position and `Error::StalePosition` if the
    /// element has since been removed.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::{AvlSet, Error};
    ///
    /// let set: AvlSet<_> = [1, 2, 3].into();
    /// assert_eq!(set.get(set.lower_bound(&2).position()), Ok(&2));
    /// assert_eq!(set.get(set.end().position()), Err(Error::EndPosition));
    /// ```
    pub fn get(&self, position: Position) -> Result<&T> {
        let entry = match position.node {
            Some(entry) => entry,
            None => return Err(Error::EndPosition),
        };
        self.arena
            .get(&entry)
            .map(|node| &node.key)
            .ok_or(Error::StalePosition)
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter<T> {
        AvlSetIter {
            arena: &self.arena,
            front: tree::min(&self.arena, self.root),
            back: tree::max(&self.arena, self.root),
            remaining: self.len,
        }
    }

    fn cursor(&self, node: Option<Entry>) -> Cursor<T> {
        Cursor { set: self, node }
    }

    fn set_root(&mut self, root: Option<Entry>) {
        if let Some(entry) = root {
            self.arena[entry].parent = None;
        }
        self.root = root;
    }
}

impl<T> AvlSet<T>
where
    T: Ord,
{
    /// Inserts a key into the set. Returns `false` and drops `key` if an equal key is already
    /// present.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        if tree::find(&self.arena, self.root, &key).is_some() {
            return false;
        }
        let root = tree::insert(&mut self.arena, self.root, key);
        self.set_root(Some(root));
        self.len += 1;
        true
    }

    /// Removes a key from the set. If the key exists in the set, it will return the associated
    /// key. Otherwise it will return `None`.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::find(&self.arena, self.root, key)?;
        let (root, ret) = tree::remove(&mut self.arena, self.root, key);
        self.set_root(root);
        if ret.is_some() {
            self.len -= 1;
        }
        ret
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::find(&self.arena, self.root, key).is_some()
    }

    /// Returns a cursor at the key equal to `key`, or the end cursor if there is none.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<_> = [1, 5, 3].into();
    /// assert_eq!(set.find(&5).get(), Some(&5));
    /// assert_eq!(set.find(&4), set.end());
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Cursor<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor(tree::find(&self.arena, self.root, key))
    }

    /// Returns a cursor at the smallest key that is greater than or equal to `key`, or the end
    /// cursor if there is none.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<_> = [1, 5, 3].into();
    /// assert_eq!(set.lower_bound(&3).get(), Some(&3));
    /// assert_eq!(set.lower_bound(&4).get(), Some(&5));
    /// assert_eq!(set.lower_bound(&6), set.end());
    /// ```
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.cursor(tree::lower_bound(&self.arena, self.root, key))
    }

    /// Checks the ordering, height, balance and parent-link invariants of every node, and that
    /// the element count matches the nodes reachable from the root.
    ///
    /// # Panics
    ///
    /// Panics if any invariant is violated.
    pub fn assert_invariants(&self) {
        let reachable = tree::assert_invariants(&self.arena, self.root, None);
        assert_eq!(reachable, self.len, "reachable nodes do not match the element count");
        assert_eq!(self.arena.len(), self.len, "arena holds unreachable nodes");
    }
}

/// A read-only cursor over an `AvlSet<T>`.
///
/// A cursor points either at an element or at the end sentinel one past the maximum. It borrows
/// the set, so the set cannot be modified while the cursor is alive; use [`Cursor::position`] to
/// keep a position across modifications.
pub struct Cursor<'a, T> {
    set: &'a AvlSet<T>,
    node: Option<Entry>,
}

impl<'a, T> Cursor<'a, T> {
    /// Returns the key the cursor points at, or `None` at the end.
    pub fn get(&self) -> Option<&'a T> {
        let set = self.set;
        self.node.map(|entry| &set.arena[entry].key)
    }

    /// Returns `true` if the cursor is the end cursor.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Moves the cursor to the next key in ascending order. Moving past the maximum yields the end
    /// cursor; the end cursor stays where it is.
    pub fn move_next(&mut self) {
        if let Some(entry) = self.node {
            self.node = tree::next(&self.set.arena, entry);
        }
    }

    /// Moves the cursor to the previous key in ascending order. The end cursor moves to the
    /// maximum key; moving before the minimum yields the end cursor.
    ///
    /// # Examples
    /// ```
    /// use avl_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<_> = [1, 2].into();
    /// let mut cursor = set.end();
    /// cursor.move_prev();
    /// cursor.move_prev();
    /// assert_eq!(cursor.get(), Some(&1));
    /// cursor.move_prev();
    /// assert!(cursor.is_end());
    /// ```
    pub fn move_prev(&mut self) {
        self.node = match self.node {
            Some(entry) => tree::prev(&self.set.arena, entry),
            None => tree::max(&self.set.arena, self.set.root),
        };
    }

    /// Returns the key `move_next` would land on, without moving.
    pub fn peek_next(&self) -> Option<&'a T> {
        let mut cursor = *self;
        cursor.move_next();
        cursor.get()
    }

    /// Returns the key `move_prev` would land on, without moving.
    pub fn peek_prev(&self) -> Option<&'a T> {
        let mut cursor = *self;
        cursor.move_prev();
        cursor.get()
    }

    /// Detaches the cursor from the borrow of its set.
    pub fn position(&self) -> Position {
        Position { node: self.node }
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T> fmt::Debug for Cursor<'a, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// A cursor detached from the borrow of its set.
///
/// A position survives modifications of the set. It keeps resolving as long as its element stays
/// in the set, including across rebalancing, and resolves to `Error::StalePosition` once the
/// element is removed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Position {
    node: Option<Entry>,
}

impl Position {
    /// Returns `true` if this is the end position.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

/// An iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct AvlSetIter<'a, T>
where
    T: 'a,
{
    arena: &'a Arena<T>,
    front: Option<Entry>,
    back: Option<Entry>,
    remaining: usize,
}

impl<'a, T> Iterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        let entry = self.front?;
        self.remaining -= 1;
        self.front = tree::next(arena, entry);
        Some(&arena[entry].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        let entry = self.back?;
        self.remaining -= 1;
        self.back = tree::prev(arena, entry);
        Some(&arena[entry].key)
    }
}

impl<'a, T> ExactSizeIterator for AvlSetIter<'a, T> where T: 'a {}

/// An owning iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct AvlSetIntoIter<T> {
    keys: vec::IntoIter<T>,
}

impl<T> Iterator for AvlSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<T> DoubleEndedIterator for AvlSetIntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.keys.next_back()
    }
}

impl<T> ExactSizeIterator for AvlSetIntoIter<T> {}

impl<T> IntoIterator for AvlSet<T> {
    type Item = T;
    type IntoIter = AvlSetIntoIter<T>;

    fn into_iter(mut self) -> Self::IntoIter {
        // Successors are found through parent links, so the order is fixed before any node is
        // freed.
        let mut entries = Vec::with_capacity(self.len);
        let mut curr = tree::min(&self.arena, self.root);
        while let Some(entry) = curr {
            entries.push(entry);
            curr = tree::next(&self.arena, entry);
        }

        let keys: Vec<T> = entries
            .iter()
            .map(|entry| self.arena.free(entry).key)
            .collect();
        self.root = None;
        self.len = 0;

        AvlSetIntoIter {
            keys: keys.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = AvlSetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Default for AvlSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies are built by re-inserting every key in ascending order, so the copy is balanced on its
/// own and shares no nodes with the original.
impl<T> Clone for AvlSet<T>
where
    T: Ord + Clone,
{
    fn clone(&self) -> Self {
        let mut set = AvlSet::with_chunk_size(self.chunk_size());
        set.extend(self.iter().cloned());
        set
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend(source.iter().cloned());
    }
}

impl<T> FromIterator<T> for AvlSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = AvlSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for AvlSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, T> Extend<&'a T> for AvlSet<T>
where
    T: 'a + Ord + Copy,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = &'a T>,
    {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize> From<[T; N]> for AvlSet<T>
where
    T: Ord,
{
    fn from(keys: [T; N]) -> Self {
        IntoIterator::into_iter(keys).collect()
    }
}

impl<T> From<Vec<T>> for AvlSet<T>
where
    T: Ord,
{
    fn from(keys: Vec<T>) -> Self {
        keys.into_iter().collect()
    }
}

impl<T> PartialEq for AvlSet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Eq for AvlSet<T> where T: Eq {}

impl<T> fmt::Debug for AvlSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
