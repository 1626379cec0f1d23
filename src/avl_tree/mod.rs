//! Self-balancing binary search tree where the heights of the two child subtrees of any node
//! differ by at most one.

mod node;
mod set;
mod tree;

pub use self::set::{AvlSet, AvlSetIntoIter, AvlSetIter, Cursor, Position, DEFAULT_CHUNK_SIZE};

use std::error;
use std::fmt;
use std::result;

/// Errors returned when resolving a detached [`Position`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The element the position pointed at has been removed from the set.
    StalePosition,
    /// The position is the end sentinel, which holds no element.
    EndPosition,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::StalePosition => write!(f, "position refers to a removed element"),
            Error::EndPosition => write!(f, "position is past the last element"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
