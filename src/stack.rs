//! Fixed-capacity LIFO storage for the search hot path.
//!
//! Backed by an inline array with an index cursor, so pushing and popping never
//! allocate. Every write is bounds checked: a push beyond capacity panics (or
//! returns [`EngineError::StackOverflow`] through [`FixedStack::try_push`]).

use crate::error::{EngineError, Result};

#[derive(Clone, Copy)]
pub struct FixedStack<T: Copy, const N: usize> {
    items: [Option<T>; N],
    len: usize,
}

impl<T: Copy, const N: usize> Default for FixedStack<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, const N: usize> FixedStack<T, N> {
    pub const fn new() -> Self {
        Self {
            items: [None; N],
            len: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Push, or report overflow without touching the stack
    pub fn try_push(&mut self, value: T) -> Result<()> {
        if self.len == N {
            return Err(EngineError::StackOverflow { capacity: N });
        }

        self.items[self.len] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Push a value. Overflowing the capacity is a configuration error and panics.
    pub fn push(&mut self, value: T) {
        if let Err(e) = self.try_push(value) {
            panic!("{e}");
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        self.items[self.len].take()
    }

    pub fn top(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.items[i].as_ref())
    }

    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.len.checked_sub(1).and_then(|i| self.items[i].as_mut())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            self.items[index].as_ref()
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items[..self.len].iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }

    /// Bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items[..self.len].iter().filter_map(Option::as_ref)
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        assert!(a < self.len && b < self.len, "swap index out of bounds");
        self.items.swap(a, b);
    }

    /// Move the element at `index` to the bottom, keeping the order of the others
    pub fn move_to_front(&mut self, index: usize) {
        assert!(index < self.len, "index out of bounds");
        self.items[..=index].rotate_right(1);
    }
}

impl<T: Copy + PartialEq, const N: usize> FixedStack<T, N> {
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|item| item == value)
    }

    pub fn position(&self, value: &T) -> Option<usize> {
        self.iter().position(|item| item == value)
    }
}

impl<T: Copy + std::fmt::Debug, const N: usize> std::fmt::Debug for FixedStack<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T: Copy, const N: usize> IntoIterator for &'a FixedStack<T, N> {
    type Item = &'a T;
    type IntoIter = std::iter::FilterMap<std::slice::Iter<'a, Option<T>>, fn(&Option<T>) -> Option<&T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items[..self.len]
            .iter()
            .filter_map(Option::as_ref as fn(&Option<T>) -> Option<&T>)
    }
}
