use std::error::Error;
use std::fmt::{self, Display};

/// An immutable position over a borrowed sequence.
///
/// Advancing produces a new cursor and leaves the old one untouched, so a caller can keep any
/// number of cursors over the same input and fall back to an earlier one when a branch fails.
pub struct Cursor<'a, T> {
    items: &'a [T],
    pos: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.items.len()
    }

    /// Returns the item under the cursor, or fails if the cursor has run past the end.
    pub fn current(&self) -> Result<&'a T, OutOfRange> {
        self.peek().ok_or(OutOfRange {
            pos: self.pos,
            len: self.items.len(),
        })
    }

    pub fn peek(&self) -> Option<&'a T> {
        self.items.get(self.pos)
    }

    pub fn remaining(&self) -> &'a [T] {
        self.items.get(self.pos..).unwrap_or(&[])
    }

    #[must_use]
    pub fn advance(self) -> Self {
        self.advance_by(1)
    }

    /// Moving past the end is allowed: the resulting cursor is simply exhausted.
    #[must_use]
    pub fn advance_by(self, n: usize) -> Self {
        Self {
            items: self.items,
            pos: self.pos.saturating_add(n),
        }
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("pos", &self.pos)
            .field("len", &self.items.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct OutOfRange {
    pub pos: usize,
    pub len: usize,
}

impl Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot access item {} of a sequence of length {}",
            self.pos, self.len
        )
    }
}

impl Error for OutOfRange {}
