#![forbid(unsafe_code)]

//! Fill and recycle primitives.
//!
//! A [`ViewportFiller`] borrows the engine's index, anchor and materialized
//! set together with the host's pool for the duration of one pass. Every
//! public step leaves the materialized set equal to "periods intersecting
//! the viewport, plus at most one boundary item per edge", which bounds the
//! work of a pass to the number of visible items. An item or column that
//! only touches an edge of the viewport is outside it: fills stop on
//! reaching the edge and recycling releases anything that ends on it.
//!
//! Vertically, items of a column are placed by time: consecutive periods
//! stack, and a time gap between two periods becomes a pixel gap.
//! Horizontally, a newly visited column is aligned to the window by
//! projecting the start of each of its periods through `pixels_per_minute`
//! relative to an already placed base item.

use timetable_core::geometry::{Rect, Viewport};

use crate::anchor::Anchor;
use crate::config::TimetableConfig;
use crate::period::{Period, PeriodIndex};
use crate::pool::{ItemPool, MaterializedSet, Placed};
use crate::scroll::{ColumnSpan, EdgeItem};

/// Which edge a new item is attached to.
///
/// `Left`/`Top` place the item so that its right/bottom edge sits on the
/// given offset (the offset is subtracted); `Right`/`Bottom` place its
/// left/top edge there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillDirection {
    Left,
    Top,
    Right,
    Bottom,
}

impl FillDirection {
    /// Whether the fill grows toward larger coordinates.
    #[inline]
    pub const fn is_append(self) -> bool {
        matches!(self, FillDirection::Right | FillDirection::Bottom)
    }
}

pub(crate) struct ViewportFiller<'a, H, P> {
    pub index: &'a PeriodIndex,
    pub anchor: &'a mut Anchor,
    pub items: &'a mut MaterializedSet<H>,
    pub pool: &'a mut P,
    pub viewport: Viewport,
    pub config: TimetableConfig,
}

impl<H, P> ViewportFiller<'_, H, P>
where
    P: ItemPool<Handle = H>,
{
    // ─────────────────────────────────────────────────────────────────────
    // Geometry helpers
    // ─────────────────────────────────────────────────────────────────────

    #[inline]
    fn item_height(&self, period: &Period) -> i32 {
        self.config
            .minutes_to_px(period.duration_minutes())
            .max(0)
    }

    /// Pixel gap between `earlier_end` and `later_start`; overlapping input
    /// collapses to zero.
    #[inline]
    fn gap_px(&self, earlier_end: i64, later_start: i64) -> i32 {
        self.config.minutes_to_px(later_start - earlier_end).max(0)
    }

    /// Horizontal extent of a materialized column, read from its top item.
    fn column_rect(&self, column: usize) -> Option<Rect> {
        let item = self.anchor.top.get(&column)?;
        self.items.rect(*item)
    }

    /// The top-most materialized item across all columns.
    pub fn top_item(&self) -> Option<(Period, Rect)> {
        self.anchor
            .top
            .values()
            .filter_map(|&item| Some((*self.index.period(item)?, self.items.rect(item)?)))
            .min_by_key(|(_, rect)| rect.top())
    }

    /// The bottom-most materialized item across all columns.
    pub fn bottom_item(&self) -> Option<(Period, Rect)> {
        self.anchor
            .bottom
            .values()
            .filter_map(|&item| Some((*self.index.period(item)?, self.items.rect(item)?)))
            .max_by_key(|(_, rect)| rect.bottom())
    }

    /// Pixel position of the earliest start minute, projected from the
    /// top-most live item. Positions are linear in time across columns, so
    /// this holds even when the column owning that minute is not live.
    pub fn top_edge(&self) -> Option<EdgeItem> {
        let first_start = self.index.first_start_minute()?;
        let (period, rect) = self.top_item()?;
        Some(EdgeItem {
            edge: rect
                .top()
                .saturating_add(self.config.minutes_to_px(first_start - period.start_minute)),
            minute: first_start,
        })
    }

    /// Pixel position of the latest end minute, projected from the
    /// bottom-most live item.
    pub fn bottom_edge(&self) -> Option<EdgeItem> {
        let last_end = self.index.last_end_minute()?;
        let (period, rect) = self.bottom_item()?;
        Some(EdgeItem {
            edge: rect
                .bottom()
                .saturating_add(self.config.minutes_to_px(last_end - period.end_minute)),
            minute: last_end,
        })
    }

    pub fn column_span(&self) -> Option<ColumnSpan> {
        let left_column = self.anchor.left_column?;
        let right_column = self.anchor.right_column?;
        let left = self.column_rect(left_column)?.left();
        let right = self.column_rect(right_column)?.right();
        Some(ColumnSpan {
            left,
            right,
            at_first_column: Some(left_column) == self.index.first_column(),
            at_last_column: Some(right_column) == self.index.last_column(),
            spans_all_columns: self.anchor.top.len() >= self.index.column_count(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Materialization
    // ─────────────────────────────────────────────────────────────────────

    /// Acquire and place one period. `None` if the item is already live.
    pub fn add_period(
        &mut self,
        period: &Period,
        direction: FillDirection,
        offset_x: i32,
        offset_y: i32,
    ) -> Option<Rect> {
        if self.items.contains(period.item_index) {
            tracing::debug!(item = period.item_index, "item already materialized");
            return None;
        }
        let width = self.config.column_width;
        let height = self.item_height(period);
        let left = match direction {
            FillDirection::Left => offset_x.saturating_sub(width),
            _ => offset_x,
        };
        let top = match direction {
            FillDirection::Top => offset_y.saturating_sub(height),
            _ => offset_y,
        };
        let rect = Rect::new(left, top, width, height);
        let handle = self.pool.acquire(period.item_index);
        let placed = Placed {
            handle,
            column: period.column,
            rect,
        };
        match self.items.insert(period.item_index, placed) {
            Ok(()) => Some(rect),
            Err(handle) => {
                self.pool.release(handle);
                None
            }
        }
    }

    fn release_item(&mut self, item_index: usize) {
        if let Some(handle) = self.items.remove(item_index) {
            self.pool.release(handle);
        }
    }

    /// Walk a column from `start` downward (append) or upward (prepend),
    /// stopping once the filled extent passes the far viewport edge.
    ///
    /// `start_y` is where `start`'s top (append) or bottom (prepend) goes.
    /// Returns the pixel extent filled.
    pub fn fill_column_vertically(
        &mut self,
        start: &Period,
        offset_x: i32,
        start_y: i32,
        append: bool,
    ) -> i32 {
        let index = self.index;
        let Some(column) = index.column(start.column) else {
            return 0;
        };
        let parent_top = self.viewport.parent_top();
        let parent_bottom = self.viewport.parent_bottom();
        let mut offset_y = start_y;
        let mut previous: Option<&Period> = None;

        if append {
            let Some(run) = column.periods().get(start.position_in_column..) else {
                return 0;
            };
            for period in run {
                if let Some(prev) = previous {
                    offset_y = offset_y
                        .saturating_add(self.gap_px(prev.end_minute, period.start_minute));
                }
                let Some(rect) = self.add_period(period, FillDirection::Bottom, offset_x, offset_y)
                else {
                    break;
                };
                self.anchor.bottom.insert(period.column, period.item_index);
                offset_y = rect.bottom();
                previous = Some(period);
                if offset_y >= parent_bottom {
                    break;
                }
            }
        } else {
            let Some(run) = column.periods().get(..=start.position_in_column) else {
                return 0;
            };
            for period in run.iter().rev() {
                if let Some(next) = previous {
                    offset_y = offset_y
                        .saturating_sub(self.gap_px(period.end_minute, next.start_minute));
                }
                let Some(rect) = self.add_period(period, FillDirection::Top, offset_x, offset_y)
                else {
                    break;
                };
                self.anchor.top.insert(period.column, period.item_index);
                offset_y = rect.top();
                previous = Some(period);
                if offset_y <= parent_top {
                    break;
                }
            }
        }

        (offset_y - start_y).abs()
    }

    /// Materialize a whole column from `start` down to the bottom edge.
    ///
    /// `direction` is `Right` when `offset_x` is the column's left edge and
    /// `Left` when it is its right edge. Returns the column width, or 0 if
    /// nothing was placed.
    pub fn fill_column(
        &mut self,
        start: &Period,
        direction: FillDirection,
        offset_x: i32,
        start_y: i32,
    ) -> i32 {
        let width = self.config.column_width;
        let left = match direction {
            FillDirection::Left => offset_x.saturating_sub(width),
            _ => offset_x,
        };
        self.fill_column_vertically(start, left, start_y, true);
        if !self.anchor.bottom.contains_key(&start.column) {
            return 0;
        }
        self.anchor.top.insert(start.column, start.item_index);
        width
    }

    /// Visit columns from `start_column` rightward (append) or leftward,
    /// wrapping when looping is enabled, and fill each one time-aligned to
    /// `base` (an item whose top currently sits at `base_y`).
    ///
    /// Stops once the horizontal extent passes the far viewport edge, at the
    /// data boundary (without looping), or on reaching a column that is
    /// already live. Returns the horizontal extent filled.
    pub fn fill_horizontal_chunk(
        &mut self,
        start_column: usize,
        start_x: i32,
        base_y: i32,
        base: &Period,
        append: bool,
    ) -> i32 {
        let index = self.index;
        let config = self.config;
        let looping = config.loop_horizontally;
        let parent_left = self.viewport.parent_left();
        let parent_top = self.viewport.parent_top();
        let parent_right = self.viewport.parent_right();
        let base_start = base.start_minute;
        let top_of = move |minute: i64| base_y.saturating_add(config.minutes_to_px(minute - base_start));
        let direction = if append {
            FillDirection::Right
        } else {
            FillDirection::Left
        };

        let mut offset_x = start_x;
        let mut next = Some(start_column);
        let mut visited = 0;
        while let Some(number) = next {
            if visited >= index.column_count() || self.anchor.has_column(number) {
                break;
            }
            visited += 1;

            let start = index
                .column(number)
                .and_then(|column| column.start_period_at(parent_top, top_of));
            if let Some(start) = start {
                let width = self.fill_column(start, direction, offset_x, top_of(start.start_minute));
                if width > 0 {
                    if append {
                        self.anchor.left_column.get_or_insert(number);
                        self.anchor.right_column = Some(number);
                        offset_x = offset_x.saturating_add(width);
                    } else {
                        self.anchor.right_column.get_or_insert(number);
                        self.anchor.left_column = Some(number);
                        offset_x = offset_x.saturating_sub(width);
                    }
                }
            }

            if (append && offset_x >= parent_right) || (!append && offset_x <= parent_left) {
                break;
            }
            next = if append {
                index.next_column(number, looping)
            } else {
                index.previous_column(number, looping)
            };
        }

        (offset_x - start_x).abs()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Incremental fill
    // ─────────────────────────────────────────────────────────────────────

    /// Extend every column whose bottom item ends above the bottom edge.
    pub fn append_rows(&mut self) {
        let index = self.index;
        let parent_bottom = self.viewport.parent_bottom();
        let bottoms: Vec<(usize, usize)> = self.anchor.bottom.iter().map(|(&c, &i)| (c, i)).collect();
        for (column, item) in bottoms {
            let Some(rect) = self.items.rect(item) else {
                tracing::debug!(column, item, "bottom anchor not live; skipping column");
                continue;
            };
            if rect.bottom() >= parent_bottom {
                continue;
            }
            let Some(period) = index.period(item) else { continue };
            let Some(next) = index.column(column).and_then(|c| c.after(period)) else {
                continue;
            };
            let y = rect
                .bottom()
                .saturating_add(self.gap_px(period.end_minute, next.start_minute));
            self.fill_column_vertically(next, rect.left(), y, true);
        }
    }

    /// Extend every column whose top item starts below the top edge.
    pub fn prepend_rows(&mut self) {
        let index = self.index;
        let parent_top = self.viewport.parent_top();
        let tops: Vec<(usize, usize)> = self.anchor.top.iter().map(|(&c, &i)| (c, i)).collect();
        for (column, item) in tops {
            let Some(rect) = self.items.rect(item) else {
                tracing::debug!(column, item, "top anchor not live; skipping column");
                continue;
            };
            if rect.top() <= parent_top {
                continue;
            }
            let Some(period) = index.period(item) else { continue };
            let Some(prev) = index.column(column).and_then(|c| c.before(period)) else {
                continue;
            };
            let y = rect
                .top()
                .saturating_sub(self.gap_px(prev.end_minute, period.start_minute));
            self.fill_column_vertically(prev, rect.left(), y, false);
        }
    }

    /// Fill columns to the right of the window while its right edge is
    /// inside the viewport. Returns whether anything was added.
    pub fn append_columns(&mut self) -> bool {
        let looping = self.config.loop_horizontally;
        let Some(right_column) = self.anchor.right_column else {
            return false;
        };
        let Some(right) = self.column_rect(right_column).map(|r| r.right()) else {
            tracing::debug!(column = right_column, "right column not live");
            return false;
        };
        if right >= self.viewport.parent_right() {
            return false;
        }
        let Some(next) = self.index.next_column(right_column, looping) else {
            return false;
        };
        let Some((base, base_rect)) = self.top_item() else {
            return false;
        };
        self.fill_horizontal_chunk(next, right, base_rect.top(), &base, true) > 0
    }

    /// Fill columns to the left of the window while its left edge is inside
    /// the viewport. Returns whether anything was added.
    pub fn prepend_columns(&mut self) -> bool {
        let looping = self.config.loop_horizontally;
        let Some(left_column) = self.anchor.left_column else {
            return false;
        };
        let Some(left) = self.column_rect(left_column).map(|r| r.left()) else {
            tracing::debug!(column = left_column, "left column not live");
            return false;
        };
        if left <= self.viewport.parent_left() {
            return false;
        }
        let Some(previous) = self.index.previous_column(left_column, looping) else {
            return false;
        };
        let Some((base, base_rect)) = self.top_item() else {
            return false;
        };
        self.fill_horizontal_chunk(previous, left, base_rect.top(), &base, false) > 0
    }

    // ─────────────────────────────────────────────────────────────────────
    // Recycling
    // ─────────────────────────────────────────────────────────────────────

    /// Release items that have scrolled fully above the top edge.
    ///
    /// Prefix scan per column; each column keeps at least its bottom item.
    pub fn recycle_top(&mut self) {
        let index = self.index;
        let parent_top = self.viewport.parent_top();
        let columns: Vec<usize> = self.anchor.columns().collect();
        for column in columns {
            loop {
                let (Some(&top), Some(&bottom)) =
                    (self.anchor.top.get(&column), self.anchor.bottom.get(&column))
                else {
                    break;
                };
                if top == bottom {
                    break;
                }
                let Some(rect) = self.items.rect(top) else {
                    tracing::debug!(column, item = top, "top anchor not live; stopping recycle");
                    break;
                };
                if rect.bottom() > parent_top {
                    break;
                }
                let Some(next) = index
                    .period(top)
                    .and_then(|p| index.column(column).and_then(|c| c.after(p)))
                else {
                    break;
                };
                self.release_item(top);
                self.anchor.top.insert(column, next.item_index);
            }
        }
    }

    /// Release items that have scrolled fully below the bottom edge.
    ///
    /// Suffix scan per column; each column keeps at least its top item.
    pub fn recycle_bottom(&mut self) {
        let index = self.index;
        let parent_bottom = self.viewport.parent_bottom();
        let columns: Vec<usize> = self.anchor.columns().collect();
        for column in columns {
            loop {
                let (Some(&top), Some(&bottom)) =
                    (self.anchor.top.get(&column), self.anchor.bottom.get(&column))
                else {
                    break;
                };
                if top == bottom {
                    break;
                }
                let Some(rect) = self.items.rect(bottom) else {
                    tracing::debug!(column, item = bottom, "bottom anchor not live; stopping recycle");
                    break;
                };
                if rect.top() < parent_bottom {
                    break;
                }
                let Some(previous) = index
                    .period(bottom)
                    .and_then(|p| index.column(column).and_then(|c| c.before(p)))
                else {
                    break;
                };
                self.release_item(bottom);
                self.anchor.bottom.insert(column, previous.item_index);
            }
        }
    }

    /// Release every live item of `column` and forget its anchors.
    fn release_column(&mut self, column: usize) {
        let index = self.index;
        let range = self
            .anchor
            .top
            .get(&column)
            .zip(self.anchor.bottom.get(&column))
            .and_then(|(&top, &bottom)| {
                Some((
                    index.period(top)?.position_in_column,
                    index.period(bottom)?.position_in_column,
                ))
            });
        if let (Some((from, to)), Some(periods)) = (range, index.column(column)) {
            for period in periods.periods().get(from..=to).unwrap_or_default() {
                self.release_item(period.item_index);
            }
        }
        self.anchor.forget_column(column);
    }

    /// Release whole columns that have scrolled fully past the left edge.
    /// The right-most column is always kept.
    pub fn recycle_left(&mut self) {
        let looping = self.config.loop_horizontally;
        let parent_left = self.viewport.parent_left();
        while let (Some(left), Some(right)) = (self.anchor.left_column, self.anchor.right_column) {
            if left == right {
                break;
            }
            let Some(rect) = self.column_rect(left) else {
                tracing::debug!(column = left, "left column not live; stopping recycle");
                break;
            };
            if rect.right() > parent_left {
                break;
            }
            let Some(next) = self
                .index
                .next_column(left, looping)
                .filter(|&n| self.anchor.has_column(n))
            else {
                break;
            };
            self.release_column(left);
            self.anchor.left_column = Some(next);
        }
    }

    /// Release whole columns that have scrolled fully past the right edge.
    /// The left-most column is always kept.
    pub fn recycle_right(&mut self) {
        let looping = self.config.loop_horizontally;
        let parent_right = self.viewport.parent_right();
        while let (Some(left), Some(right)) = (self.anchor.left_column, self.anchor.right_column) {
            if left == right {
                break;
            }
            let Some(rect) = self.column_rect(right) else {
                tracing::debug!(column = right, "right column not live; stopping recycle");
                break;
            };
            if rect.left() < parent_right {
                break;
            }
            let Some(previous) = self
                .index
                .previous_column(right, looping)
                .filter(|&n| self.anchor.has_column(n))
            else {
                break;
            };
            self.release_column(right);
            self.anchor.right_column = Some(previous);
        }
    }

    /// Release everything and forget the window.
    pub fn release_all(&mut self) {
        for handle in self.items.drain() {
            self.pool.release(handle);
        }
        self.anchor.reset();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Overscroll settling
    // ─────────────────────────────────────────────────────────────────────

    /// Pull content back flush when it was scrolled past the first start or
    /// last end minute, refilling the side that opened up.
    ///
    /// Returns the vertical shift applied to the content (positive = down).
    /// When all content fits in the viewport the top edge wins.
    pub fn settle_vertical(&mut self) -> i32 {
        let parent_top = self.viewport.parent_top();
        let parent_bottom = self.viewport.parent_bottom();
        let mut shift = 0;

        if let (Some(top), Some(bottom)) = (self.top_edge(), self.bottom_edge())
            && bottom.edge < parent_bottom
        {
            let down = parent_bottom
                .saturating_sub(bottom.edge)
                .min(parent_top.saturating_sub(top.edge));
            if down > 0 {
                self.items.offset_all(0, down);
                shift += down;
                self.prepend_rows();
            }
        }

        if let Some(top) = self.top_edge()
            && top.edge > parent_top
        {
            let up = top.edge.saturating_sub(parent_top);
            self.items.offset_all(0, -up);
            shift -= up;
            self.append_rows();
        }

        if shift != 0 {
            self.recycle_top();
            self.recycle_bottom();
        }
        shift
    }

    /// Without looping, pull columns back flush when the window was pushed
    /// past the first or last column, refilling the side that opened up.
    ///
    /// Returns the horizontal shift applied to the content (positive = right).
    pub fn settle_horizontal(&mut self) -> i32 {
        if self.config.loop_horizontally {
            return 0;
        }
        let parent_left = self.viewport.parent_left();
        let parent_right = self.viewport.parent_right();
        let mut shift = 0;

        if let Some(span) = self.column_span()
            && span.at_last_column
            && span.right < parent_right
        {
            let mut right = parent_right.saturating_sub(span.right);
            if span.at_first_column {
                right = right.min(parent_left.saturating_sub(span.left));
            }
            if right > 0 {
                self.items.offset_all(right, 0);
                shift += right;
                self.prepend_columns();
            }
        }

        if let Some(span) = self.column_span()
            && span.at_first_column
            && span.left > parent_left
        {
            let left = span.left.saturating_sub(parent_left);
            self.items.offset_all(-left, 0);
            shift -= left;
            self.append_columns();
        }

        if shift != 0 {
            self.recycle_left();
            self.recycle_right();
        }
        shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodInfo;

    const MIN: i64 = 60_000;

    #[derive(Default)]
    struct VecPool {
        live: Vec<usize>,
    }

    impl ItemPool for VecPool {
        type Handle = usize;

        fn acquire(&mut self, item_index: usize) -> usize {
            self.live.push(item_index);
            item_index
        }

        fn release(&mut self, handle: usize) {
            self.live.retain(|&i| i != handle);
        }
    }

    struct Parts {
        index: PeriodIndex,
        anchor: Anchor,
        items: MaterializedSet<usize>,
        pool: VecPool,
    }

    impl Parts {
        fn new(rows: &[(i64, i64, usize)]) -> Self {
            let lookup = |i: usize| {
                let (start, end, column) = rows[i];
                PeriodInfo::new(start * MIN, end * MIN, column)
            };
            Self {
                index: PeriodIndex::build(rows.len(), &lookup),
                anchor: Anchor::new(),
                items: MaterializedSet::default(),
                pool: VecPool::default(),
            }
        }

        fn filler(&mut self, height: i32) -> ViewportFiller<'_, usize, VecPool> {
            ViewportFiller {
                index: &self.index,
                anchor: &mut self.anchor,
                items: &mut self.items,
                pool: &mut self.pool,
                viewport: Viewport::new(100, height),
                config: TimetableConfig::new(50, 1),
            }
        }
    }

    #[test]
    fn break_between_periods_is_a_pixel_gap() {
        let mut parts = Parts::new(&[(0, 30, 0), (45, 60, 0), (60, 90, 0)]);
        let mut filler = parts.filler(200);
        let first = *filler.index.period(0).unwrap();
        filler.fill_column(&first, FillDirection::Right, 0, 0);
        assert_eq!(filler.items.rect(1), Some(Rect::new(0, 45, 50, 15)));
        assert_eq!(filler.items.rect(2), Some(Rect::new(0, 60, 50, 30)));
        assert_eq!(filler.anchor.bottom.get(&0), Some(&2));
    }

    #[test]
    fn edges_project_to_data_bounds() {
        // column 1 owns neither the first start nor the last end
        let mut parts = Parts::new(&[(0, 30, 0), (30, 60, 1), (60, 120, 0)]);
        let mut filler = parts.filler(50);
        let middle = *filler.index.period(1).unwrap();
        filler.fill_column(&middle, FillDirection::Right, 0, 0);
        assert_eq!(filler.top_edge().map(|e| (e.edge, e.minute)), Some((-30, 0)));
        assert_eq!(filler.bottom_edge().map(|e| (e.edge, e.minute)), Some((90, 120)));
    }

    #[test]
    fn items_touching_an_edge_are_outside() {
        let mut parts = Parts::new(&[(0, 30, 0), (30, 60, 0), (60, 90, 0)]);
        let mut filler = parts.filler(60);
        let first = *filler.index.period(0).unwrap();
        filler.fill_column(&first, FillDirection::Right, 0, 0);
        // item 2 would start on the bottom edge
        assert_eq!(filler.anchor.bottom.get(&0), Some(&1));
        assert!(!filler.items.contains(2));

        filler.items.offset_all(0, -30);
        filler.append_rows();
        filler.recycle_top();
        // item 0 now ends on the top edge
        assert_eq!(filler.anchor.top.get(&0), Some(&1));
        assert_eq!(filler.anchor.bottom.get(&0), Some(&2));
        assert_eq!(parts.pool.live, vec![1, 2]);
    }

    #[test]
    fn recycling_keeps_the_last_item_of_a_column() {
        let mut parts = Parts::new(&[(0, 30, 0), (30, 60, 0)]);
        let mut filler = parts.filler(200);
        let first = *filler.index.period(0).unwrap();
        filler.fill_column(&first, FillDirection::Right, 0, 0);
        filler.items.offset_all(0, -500);
        filler.recycle_top();
        assert_eq!(filler.anchor.top.get(&0), Some(&1));
        assert_eq!(filler.anchor.bottom.get(&0), Some(&1));
        assert_eq!(parts.pool.live, vec![1]);
    }
}
