//! Chunked slab allocator with generation-checked handles.

use log::debug;
use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object stored in a `TypedArena<T>`.
///
/// Every slot carries a generation that is bumped when the slot is freed, so an `Entry` that
/// outlives its object no longer resolves, even after the slot has been reused.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    chunk_index: usize,
    block_index: usize,
    generation: u64,
}

enum Block<T> {
    Occupied { generation: u64, value: T },
    Vacant { generation: u64, next: Option<(usize, usize)> },
}

/// A typed arena that hands out `Entry` handles instead of references.
///
/// Objects live in fixed-size chunks, so growing the arena never moves an existing object. Freed
/// slots are threaded into a free list and reused by later allocations. No unsafe code is used;
/// each chunk is a plain `Vec`.
///
/// # Examples
///
/// ```
/// use avl_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert_eq!(arena.get(&x), None);
/// ```
pub struct TypedArena<T> {
    head: Option<(usize, usize)>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn block(&self, entry: &Entry) -> Option<&Block<T>> {
        self.chunks
            .get(entry.chunk_index)
            .and_then(|chunk| chunk.get(entry.block_index))
    }

    fn block_mut(&mut self, entry: &Entry) -> Option<&mut Block<T>> {
        self.chunks
            .get_mut(entry.chunk_index)
            .and_then(|chunk| chunk.get_mut(entry.block_index))
    }

    /// Constructs a new, empty `TypedArena<T>` holding `chunk_size` objects per chunk. A
    /// `chunk_size` of zero is treated as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert_eq!(arena.chunk_size(), 1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            len: 0,
            capacity: 0,
        }
    }

    /// Returns the number of objects allocated per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocates an object in the arena and returns its `Entry`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.len(), 1);
    /// ```
    pub fn allocate(&mut self, value: T) -> Entry {
        self.len += 1;

        if let Some((chunk_index, block_index)) = self.head.take() {
            let block = &mut self.chunks[chunk_index][block_index];
            let (generation, next) = match *block {
                Block::Vacant { generation, next } => (generation, next),
                Block::Occupied { .. } => panic!("Error: free list points at an occupied block."),
            };
            *block = Block::Occupied { generation, value };
            self.head = next;
            return Entry {
                chunk_index,
                block_index,
                generation,
            };
        }

        let needs_chunk = match self.chunks.last() {
            Some(chunk) => chunk.len() == self.chunk_size,
            None => true,
        };
        if needs_chunk {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
            debug!(
                "arena grew to {} chunks ({} slots)",
                self.chunks.len(),
                self.capacity,
            );
        }

        let chunk_index = self.chunks.len() - 1;
        let last_chunk = &mut self.chunks[chunk_index];
        last_chunk.push(Block::Occupied { generation: 0, value });
        Entry {
            chunk_index,
            block_index: last_chunk.len() - 1,
            generation: 0,
        }
    }

    /// Deallocates an object in the arena and returns it. The slot's generation is bumped, so
    /// `entry` and every copy of it stop resolving.
    ///
    /// # Panics
    ///
    /// Panics if `entry` is out of bounds, vacant, or from an older generation.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.free(&x), 0);
    /// ```
    pub fn free(&mut self, entry: &Entry) -> T {
        if !self.contains(entry) {
            panic!("Error: attempting to free an invalid or vacant block.");
        }
        let next = self.head.take();
        let block = match self.block_mut(entry) {
            Some(block) => block,
            None => unreachable!(),
        };
        let old_block = mem::replace(
            block,
            Block::Vacant {
                generation: entry.generation.wrapping_add(1),
                next,
            },
        );
        self.len -= 1;
        self.head = Some((entry.chunk_index, entry.block_index));
        match old_block {
            Block::Occupied { value, .. } => value,
            Block::Vacant { .. } => unreachable!(),
        }
    }

    /// Returns `true` if `entry` refers to a live object.
    pub fn contains(&self, entry: &Entry) -> bool {
        self.get(entry).is_some()
    }

    /// Returns an immutable reference to an object in the arena, or `None` if `entry` is out of
    /// bounds, vacant, or stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::TypedArena;
    ///
    /// let mut arena = TypedArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(&x), Some(&0));
    /// ```
    pub fn get(&self, entry: &Entry) -> Option<&T> {
        match self.block(entry) {
            Some(Block::Occupied { generation, value }) if *generation == entry.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the arena, or `None` if `entry` is out of
    /// bounds, vacant, or stale.
    pub fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        match self.block_mut(entry) {
            Some(Block::Occupied { generation, value }) if *generation == entry.generation => {
                Some(value)
            },
            _ => None,
        }
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        match self.get(&entry) {
            Some(value) => value,
            None => panic!("Error: entry out of bounds."),
        }
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        match self.get_mut(&entry) {
            Some(value) => value,
            None => panic!("Error: entry out of bounds."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Entry;
    use super::TypedArena;

    #[test]
    #[should_panic]
    fn test_free_invalid_block() {
        let mut arena: TypedArena<u32> = TypedArena::new(1024);
        arena.free(&Entry {
            chunk_index: 0,
            block_index: 0,
            generation: 0,
        });
    }

    #[test]
    #[should_panic]
    fn test_free_twice() {
        let mut arena = TypedArena::new(1024);
        let entry = arena.allocate(0);
        arena.free(&entry);
        arena.free(&entry);
    }

    #[test]
    fn test_allocate_multiple_chunks() {
        let mut arena = TypedArena::new(2);
        let entries: Vec<Entry> = (0..3).map(|i| arena.allocate(i)).collect();
        assert_eq!(
            entries[2],
            Entry {
                chunk_index: 1,
                block_index: 0,
                generation: 0,
            },
        );
        assert_eq!(arena.len(), 3);
        assert_eq!(arena[entries[0]], 0);
        assert_eq!(arena[entries[2]], 2);
    }

    #[test]
    fn test_zero_chunk_size() {
        let mut arena = TypedArena::new(0);
        assert_eq!(arena.chunk_size(), 1);
        let x = arena.allocate(7);
        let y = arena.allocate(8);
        assert_eq!((arena[x], arena[y]), (7, 8));
    }

    #[test]
    fn test_free_reuses_slot_with_new_generation() {
        let mut arena = TypedArena::new(1024);
        let old = arena.allocate(0);
        assert_eq!(arena.free(&old), 0);
        assert!(arena.is_empty());

        let new = arena.allocate(1);
        assert_eq!(
            new,
            Entry {
                chunk_index: 0,
                block_index: 0,
                generation: 1,
            },
        );
        assert_eq!(arena.get(&old), None);
        assert_eq!(arena.get(&new), Some(&1));
    }

    #[test]
    fn test_free_list_is_lifo() {
        let mut arena = TypedArena::new(1024);
        let a = arena.allocate('a');
        let b = arena.allocate('b');
        arena.free(&a);
        arena.free(&b);
        assert_eq!(arena.allocate('c').block_index, b.block_index);
        assert_eq!(arena.allocate('d').block_index, a.block_index);
        assert_eq!(arena.allocate('e').block_index, 2);
    }

    #[test]
    fn test_get_mut() {
        let mut arena = TypedArena::new(1024);
        let entry = arena.allocate(0);
        *arena.get_mut(&entry).unwrap() = 1;
        assert_eq!(arena.get(&entry), Some(&1));
    }

    #[test]
    fn test_get_vacant_block() {
        let mut arena = TypedArena::new(1024);
        arena.allocate(0);
        let missing = Entry {
            chunk_index: 0,
            block_index: 1,
            generation: 0,
        };
        assert_eq!(arena.get(&missing), None);
        assert_eq!(arena.get_mut(&missing), None);
    }
}
