#![forbid(unsafe_code)]

//! Paint-order stacking.
//!
//! [`StackOrder`] keeps the live panels in back-to-front order. A panel's
//! stack ordinal is its index in that sequence, so ordinals are always dense
//! (`0..len`) and are recomputed implicitly by every reorder. Geometry is
//! never consulted.

use std::fmt;

use tracing::debug;

/// Outcome of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackChange {
    /// The key moved from one index to another.
    Moved { from: usize, to: usize },
    /// The key was already at the requested end.
    Unchanged,
    /// The key is not in the stack.
    Missing,
}

impl StackChange {
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }
}

/// Back-to-front ordering of panel keys. The last element paints on top.
#[derive(Clone, PartialEq, Eq)]
pub struct StackOrder<K> {
    order: Vec<K>,
}

impl<K> Default for StackOrder<K> {
    fn default() -> Self {
        Self { order: Vec::new() }
    }
}

impl<K: fmt::Debug> fmt::Debug for StackOrder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.order).finish()
    }
}

impl<K: Copy + Eq + fmt::Debug> StackOrder<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key` on top and return its ordinal. A key already present is
    /// raised instead of duplicated.
    pub fn push(&mut self, key: K) -> usize {
        if self.position(key).is_some() {
            self.bring_to_front(key);
        } else {
            self.order.push(key);
        }
        self.order.len() - 1
    }

    /// Remove `key`, returning the index it occupied.
    pub fn remove(&mut self, key: K) -> Option<usize> {
        let index = self.position(key)?;
        self.order.remove(index);
        debug!(?key, index, remaining = self.order.len(), "stack: removed");
        Some(index)
    }

    /// Move `key` to the top of the stack.
    pub fn bring_to_front(&mut self, key: K) -> StackChange {
        let Some(from) = self.position(key) else {
            return StackChange::Missing;
        };
        let to = self.order.len() - 1;
        if from == to {
            return StackChange::Unchanged;
        }
        let moved = self.order.remove(from);
        self.order.push(moved);
        debug!(?key, from, to, "stack: brought to front");
        StackChange::Moved { from, to }
    }

    /// Move `key` to the bottom of the stack.
    pub fn send_to_back(&mut self, key: K) -> StackChange {
        let Some(from) = self.position(key) else {
            return StackChange::Missing;
        };
        if from == 0 {
            return StackChange::Unchanged;
        }
        let moved = self.order.remove(from);
        self.order.insert(0, moved);
        debug!(?key, from, to = 0usize, "stack: sent to back");
        StackChange::Moved { from, to: 0 }
    }

    /// Stack ordinal of `key` (0 = bottom).
    #[must_use]
    pub fn position(&self, key: K) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == key)
    }

    /// Topmost key.
    #[must_use]
    pub fn top(&self) -> Option<K> {
        self.order.last().copied()
    }

    /// `(key, ordinal)` pairs in back-to-front order.
    pub fn ordinals(&self) -> impl Iterator<Item = (K, usize)> + '_ {
        self.order.iter().copied().zip(0..)
    }

    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[K] {
        &self.order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}

impl<K: Copy + Eq + fmt::Debug> FromIterator<K> for StackOrder<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut stack = Self::new();
        for key in iter {
            stack.push(key);
        }
        stack
    }
}
