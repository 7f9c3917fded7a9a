#![forbid(unsafe_code)]

//! Period/column indexing.
//!
//! [`PeriodIndex::build`] turns an item count plus a [`PeriodLookup`] into
//! the flat period table (indexed by item index) and the per-column ordered
//! lists every fill and recycle step walks. It is rebuilt in full on each
//! layout pass, in O(item count).
//!
//! Column numbers are expected to form the contiguous range
//! `0..column_count`. Gaps are tolerated: columns are keyed sparsely by
//! number, so an absent number costs nothing and is never visited. Gaps are
//! reported once per build in debug builds.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

/// Raw period description supplied by the host for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodInfo {
    /// Start timestamp, milliseconds.
    pub start_millis: i64,
    /// End timestamp, milliseconds.
    pub end_millis: i64,
    /// Zero-based lane this item belongs to.
    pub column: usize,
}

impl PeriodInfo {
    #[must_use]
    pub const fn new(start_millis: i64, end_millis: i64, column: usize) -> Self {
        Self {
            start_millis,
            end_millis,
            column,
        }
    }
}

/// Source of period data. Must be stable for the duration of one layout pass.
pub trait PeriodLookup {
    /// Describe the item at `index` (`0 <= index < item_count`).
    fn period_info(&self, index: usize) -> PeriodInfo;
}

impl<F> PeriodLookup for F
where
    F: Fn(usize) -> PeriodInfo,
{
    fn period_info(&self, index: usize) -> PeriodInfo {
        self(index)
    }
}

const MILLIS_PER_MINUTE: i64 = 60_000;

/// An indexed, minute-granular period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start_minute: i64,
    pub end_minute: i64,
    pub column: usize,
    /// Source identity (the host's item index).
    pub item_index: usize,
    /// Zero-based rank within the column.
    pub position_in_column: usize,
}

impl Period {
    #[inline]
    pub const fn duration_minutes(&self) -> i64 {
        self.end_minute - self.start_minute
    }
}

/// Ordered periods sharing one column number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    periods: Vec<Period>,
}

impl Column {
    #[inline]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    #[inline]
    pub fn get(&self, position: usize) -> Option<&Period> {
        self.periods.get(position)
    }

    #[inline]
    pub fn first(&self) -> Option<&Period> {
        self.periods.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&Period> {
        self.periods.last()
    }

    #[inline]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Period following `period` in this column.
    #[inline]
    pub fn after(&self, period: &Period) -> Option<&Period> {
        self.periods.get(period.position_in_column + 1)
    }

    /// Period preceding `period` in this column.
    #[inline]
    pub fn before(&self, period: &Period) -> Option<&Period> {
        period
            .position_in_column
            .checked_sub(1)
            .and_then(|p| self.periods.get(p))
    }

    /// Time-aligned entry point for filling this column.
    ///
    /// `top_of` projects a start minute to its pixel position; the result is
    /// the latest-starting period whose projected top does not exceed
    /// `edge`. When every period starts below the edge the first one is
    /// returned, so a non-empty column always yields an entry point.
    pub fn start_period_at(&self, edge: i32, top_of: impl Fn(i64) -> i32) -> Option<&Period> {
        let above = self
            .periods
            .partition_point(|p| top_of(p.start_minute) <= edge);
        match above {
            0 => self.periods.first(),
            n => self.periods.get(n - 1),
        }
    }
}

/// The period/column structure for one dataset.
#[derive(Debug, Clone, Default)]
pub struct PeriodIndex {
    periods: Vec<Period>,
    columns: BTreeMap<usize, Column>,
    first_start_minute: Option<i64>,
    last_end_minute: Option<i64>,
}

impl PeriodIndex {
    /// Index `item_count` items read through `lookup`.
    ///
    /// Items are appended to their column in item order, so each column is
    /// expected to be sorted by start time already.
    pub fn build(item_count: usize, lookup: &impl PeriodLookup) -> Self {
        let mut periods = Vec::with_capacity(item_count);
        let mut columns: BTreeMap<usize, Column> = BTreeMap::new();
        let mut first_start_minute: Option<i64> = None;
        let mut last_end_minute: Option<i64> = None;

        for item_index in 0..item_count {
            let info = lookup.period_info(item_index);
            let column = columns.entry(info.column).or_default();
            let period = Period {
                start_minute: info.start_millis.div_euclid(MILLIS_PER_MINUTE),
                end_minute: info.end_millis.div_euclid(MILLIS_PER_MINUTE),
                column: info.column,
                item_index,
                position_in_column: column.periods.len(),
            };
            column.periods.push(period);
            periods.push(period);

            first_start_minute = Some(
                first_start_minute.map_or(period.start_minute, |m| m.min(period.start_minute)),
            );
            last_end_minute =
                Some(last_end_minute.map_or(period.end_minute, |m| m.max(period.end_minute)));
        }

        let index = Self {
            periods,
            columns,
            first_start_minute,
            last_end_minute,
        };
        index.report_malformed_columns();
        index
    }

    #[cfg(debug_assertions)]
    fn report_malformed_columns(&self) {
        let Some(&highest) = self.columns.keys().next_back() else {
            return;
        };
        // numbers below `highest` that name no column
        let absent = highest - (self.columns.len() - 1);
        if absent > 0 {
            tracing::warn!(
                column_count = self.columns.len(),
                highest,
                absent,
                "column numbers are not contiguous zero-based numbering; absent columns are skipped"
            );
        }
    }

    #[cfg(not(debug_assertions))]
    fn report_malformed_columns(&self) {}

    /// Number of indexed items.
    #[inline]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Period for `item_index`.
    #[inline]
    pub fn period(&self, item_index: usize) -> Option<&Period> {
        self.periods.get(item_index)
    }

    #[inline]
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Column `number`, `None` when no item names it.
    #[inline]
    pub fn column(&self, number: usize) -> Option<&Column> {
        self.columns.get(&number)
    }

    /// Number of columns with at least one period.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Populated column numbers in ascending order.
    pub fn column_numbers(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.columns.keys().copied()
    }

    /// Whether `number` names a column with at least one period.
    #[inline]
    pub fn has_column(&self, number: usize) -> bool {
        self.columns.contains_key(&number)
    }

    /// Lowest populated column number.
    pub fn first_column(&self) -> Option<usize> {
        self.columns.keys().next().copied()
    }

    /// Highest populated column number.
    pub fn last_column(&self) -> Option<usize> {
        self.columns.keys().next_back().copied()
    }

    /// Populated column to the right of `number`.
    ///
    /// With `looping`, the search wraps past the last column; the result can
    /// be `number` itself when it is the only populated column.
    pub fn next_column(&self, number: usize, looping: bool) -> Option<usize> {
        let straight = self
            .columns
            .range((Excluded(number), Unbounded))
            .next()
            .map(|(&n, _)| n);
        if straight.is_some() || !looping {
            return straight;
        }
        self.first_column()
    }

    /// Populated column to the left of `number`.
    pub fn previous_column(&self, number: usize, looping: bool) -> Option<usize> {
        let straight = self.columns.range(..number).next_back().map(|(&n, _)| n);
        if straight.is_some() || !looping {
            return straight;
        }
        self.last_column()
    }

    /// Earliest start over all periods.
    #[inline]
    pub fn first_start_minute(&self) -> Option<i64> {
        self.first_start_minute
    }

    /// Latest end over all periods.
    #[inline]
    pub fn last_end_minute(&self) -> Option<i64> {
        self.last_end_minute
    }
}
