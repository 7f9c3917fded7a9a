#![forbid(unsafe_code)]

//! Live boundary bookkeeping for the materialized window.

use std::collections::BTreeMap;

/// Which items currently bound the materialized window.
///
/// `top`/`bottom` map a column number to the item index of that column's
/// first/last materialized period. `left_column`/`right_column` are the
/// outermost materialized columns; with horizontal looping `left_column`
/// may be numerically greater than `right_column`.
///
/// Every item index referenced here has a live handle in the materialized
/// set, and each column's materialized items are exactly the contiguous run
/// `top..=bottom` in that column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub top: BTreeMap<usize, usize>,
    pub bottom: BTreeMap<usize, usize>,
    pub left_column: Option<usize>,
    pub right_column: Option<usize>,
}

impl Anchor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the whole window.
    pub fn reset(&mut self) {
        self.top.clear();
        self.bottom.clear();
        self.left_column = None;
        self.right_column = None;
    }

    /// True when no window is tracked.
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.left_column.is_none()
    }

    /// Whether `column` has materialized items.
    #[inline]
    pub fn has_column(&self, column: usize) -> bool {
        self.top.contains_key(&column)
    }

    /// Materialized column numbers, ascending.
    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.top.keys().copied()
    }

    /// Drop both boundaries of `column`.
    pub fn forget_column(&mut self, column: usize) {
        self.top.remove(&column);
        self.bottom.remove(&column);
    }
}
