#![forbid(unsafe_code)]

//! Canned schedules for driving the layout engine in tests.

use timetable_layout::{PeriodInfo, PeriodLookup};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// A fixed list of periods, addressed by item index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureSchedule {
    periods: Vec<PeriodInfo>,
}

impl FixtureSchedule {
    /// Build from `(start_minute, end_minute, column)` rows.
    pub fn from_minutes(rows: &[(i64, i64, usize)]) -> Self {
        Self {
            periods: rows
                .iter()
                .map(|&(start, end, column)| {
                    PeriodInfo::new(start * MILLIS_PER_MINUTE, end * MILLIS_PER_MINUTE, column)
                })
                .collect(),
        }
    }

    /// `columns` x `rows` back-to-back periods of `minutes` each, starting at
    /// minute 0, listed row by row.
    pub fn uniform(columns: usize, rows: usize, minutes: i64) -> Self {
        Self::staggered(columns, rows, minutes, 0)
    }

    /// Like [`uniform`](Self::uniform), but column `c` starts `c * offset`
    /// minutes later, so rows do not line up across columns.
    pub fn staggered(columns: usize, rows: usize, minutes: i64, offset: i64) -> Self {
        let mut out = Vec::with_capacity(columns * rows);
        for row in 0..rows {
            for column in 0..columns {
                let start = column as i64 * offset + row as i64 * minutes;
                out.push((start, start + minutes, column));
            }
        }
        Self::from_minutes(&out)
    }

    /// A conference-style day: each column has its own talk length and a
    /// break of `gap` minutes between talks.
    pub fn with_breaks(lengths: &[i64], talks: usize, gap: i64) -> Self {
        let mut out = Vec::new();
        for talk in 0..talks {
            for (column, &length) in lengths.iter().enumerate() {
                let start = talk as i64 * (length + gap);
                out.push((start, start + length, column));
            }
        }
        Self::from_minutes(&out)
    }

    /// The same periods with column `c` renamed to `numbers[c]`, for
    /// datasets whose column numbers have gaps.
    ///
    /// # Panics
    ///
    /// When some column has no entry in `numbers`.
    #[must_use]
    pub fn renumber_columns(&self, numbers: &[usize]) -> Self {
        Self {
            periods: self
                .periods
                .iter()
                .map(|p| PeriodInfo::new(p.start_millis, p.end_millis, numbers[p.column]))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn periods(&self) -> &[PeriodInfo] {
        &self.periods
    }
}

impl PeriodLookup for FixtureSchedule {
    fn period_info(&self, index: usize) -> PeriodInfo {
        self.periods[index]
    }
}
