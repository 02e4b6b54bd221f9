use std::fmt;

/// Failures reported by [`CList`](crate::clist::CList) operations.
///
/// A failed operation never leaves the list half-modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// The arena could not grow to hold a new node.
    Alloc,
    /// The handle has no sentinel: it was never initialized or was torn down.
    NotInitialized,
    /// A position fell outside the operation's valid domain.
    OutOfRange { pos: usize, len: usize },
    /// A `[start, stop)` range violated `start <= stop <= len`.
    InvalidRange { start: usize, stop: usize, len: usize },
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc => write!(f, "failed to allocate memory for new node"),
            Self::NotInitialized => write!(f, "list is not initialized"),
            Self::OutOfRange { pos, len } => {
                write!(f, "position {pos} is out of range for a list of length {len}")
            }
            Self::InvalidRange { start, stop, len } => write!(
                f,
                "range {start}..{stop} is invalid for a list of length {len}"
            ),
        }
    }
}

impl std::error::Error for ListError {}

pub type Result<T> = std::result::Result<T, ListError>;
