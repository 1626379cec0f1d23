//! An ordered set backed by an AVL tree whose nodes live in a generation-checked typed arena.
//!
//! # Examples
//! ```
//! use avl_collections::avl_tree::AvlSet;
//!
//! let mut set: AvlSet<u32> = [1, 5, 3, 8, 2, 9, 0].into();
//! set.remove(&5);
//!
//! let mut cursor = set.end();
//! cursor.move_prev();
//! assert_eq!(cursor.get(), Some(&9));
//! assert_eq!(set.iter().cloned().collect::<Vec<u32>>(), vec![0, 1, 2, 3, 8, 9]);
//! ```

pub mod arena;
pub mod avl_tree;
