#![forbid(unsafe_code)]

//! Scroll-delta clamping.
//!
//! The filler materializes content lazily, so in general a requested delta
//! is applied as-is. Clamping only kicks in at the true ends of the data:
//! the globally first start minute / last end minute vertically, and the
//! first / last column horizontally.

use timetable_core::geometry::Viewport;

/// A materialized boundary item on the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeItem {
    /// Pixel edge: the item's top for the top-most item, its bottom for the
    /// bottom-most item.
    pub edge: i32,
    /// Minute at that edge: start minute for the top, end minute for the bottom.
    pub minute: i64,
}

/// The horizontal extent of the materialized window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    /// Left pixel edge of the leftmost materialized column.
    pub left: i32,
    /// Right pixel edge of the rightmost materialized column.
    pub right: i32,
    /// Leftmost column is the first populated column.
    pub at_first_column: bool,
    /// Rightmost column is the last populated column.
    pub at_last_column: bool,
    /// Every populated column is materialized.
    pub spans_all_columns: bool,
}

/// Bounds a raw scroll delta to what can actually be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCalculator {
    parent_left: i32,
    parent_top: i32,
    parent_right: i32,
    parent_bottom: i32,
    first_start_minute: Option<i64>,
    last_end_minute: Option<i64>,
    loop_horizontally: bool,
}

impl ScrollCalculator {
    #[must_use]
    pub fn new(
        viewport: &Viewport,
        first_start_minute: Option<i64>,
        last_end_minute: Option<i64>,
        loop_horizontally: bool,
    ) -> Self {
        Self {
            parent_left: viewport.parent_left(),
            parent_top: viewport.parent_top(),
            parent_right: viewport.parent_right(),
            parent_bottom: viewport.parent_bottom(),
            first_start_minute,
            last_end_minute,
            loop_horizontally,
        }
    }

    /// Clamp a vertical delta. Positive `dy` moves toward later times.
    ///
    /// Returns 0 when there is nothing materialized to scroll.
    pub fn vertical(&self, dy: i32, top: Option<EdgeItem>, bottom: Option<EdgeItem>) -> i32 {
        if dy > 0 {
            let Some(bottom) = bottom else { return 0 };
            if Some(bottom.minute) != self.last_end_minute {
                return dy;
            }
            if bottom.edge <= self.parent_bottom {
                0
            } else {
                dy.min(bottom.edge.saturating_sub(self.parent_bottom))
            }
        } else if dy < 0 {
            let Some(top) = top else { return 0 };
            if Some(top.minute) != self.first_start_minute {
                return dy;
            }
            if top.edge >= self.parent_top {
                0
            } else {
                dy.max(top.edge.saturating_sub(self.parent_top))
            }
        } else {
            0
        }
    }

    /// Clamp a horizontal delta. Positive `dx` moves toward later columns.
    ///
    /// Without looping each edge stops at its outermost column. With looping
    /// the delta is only bounded once every column is already on screen,
    /// since wrapping further would need a column that is already live.
    pub fn horizontal(&self, dx: i32, span: ColumnSpan) -> i32 {
        let (clamp_left, clamp_right) = if self.loop_horizontally {
            (span.spans_all_columns, span.spans_all_columns)
        } else {
            (span.at_first_column, span.at_last_column)
        };

        if dx > 0 {
            if !clamp_right {
                return dx;
            }
            if span.right <= self.parent_right {
                0
            } else {
                dx.min(span.right.saturating_sub(self.parent_right))
            }
        } else if dx < 0 {
            if !clamp_left {
                return dx;
            }
            if span.left >= self.parent_left {
                0
            } else {
                dx.max(span.left.saturating_sub(self.parent_left))
            }
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetable_core::geometry::Sides;

    fn calc(looping: bool) -> ScrollCalculator {
        ScrollCalculator::new(&Viewport::new(300, 200), Some(0), Some(600), looping)
    }

    fn span(left: i32, right: i32, first: bool, last: bool) -> ColumnSpan {
        ColumnSpan {
            left,
            right,
            at_first_column: first,
            at_last_column: last,
            spans_all_columns: first && last,
        }
    }

    #[test]
    fn vertical_unclamped_away_from_data_ends() {
        let c = calc(false);
        let top = EdgeItem { edge: -40, minute: 30 };
        let bottom = EdgeItem { edge: 260, minute: 200 };
        assert_eq!(c.vertical(500, Some(top), Some(bottom)), 500);
        assert_eq!(c.vertical(-500, Some(top), Some(bottom)), -500);
    }

    #[test]
    fn vertical_clamps_at_last_end() {
        let c = calc(false);
        let bottom = EdgeItem { edge: 230, minute: 600 };
        assert_eq!(c.vertical(100, None, Some(bottom)), 30);
        assert_eq!(c.vertical(10, None, Some(bottom)), 10);
        let flush = EdgeItem { edge: 200, minute: 600 };
        assert_eq!(c.vertical(1, None, Some(flush)), 0);
    }

    #[test]
    fn vertical_clamps_at_first_start() {
        let c = calc(false);
        let top = EdgeItem { edge: -25, minute: 0 };
        assert_eq!(c.vertical(-100, Some(top), None), -25);
        let flush = EdgeItem { edge: 0, minute: 0 };
        assert_eq!(c.vertical(-1, Some(flush), None), 0);
    }

    #[test]
    fn vertical_clamp_saturates_at_far_projected_edges() {
        let padded = Viewport::new(300, 200).with_padding(Sides::new(10, 0, 10, 0));
        let c = ScrollCalculator::new(&padded, Some(0), Some(600), false);
        let top = EdgeItem { edge: i32::MIN, minute: 0 };
        assert_eq!(c.vertical(-100, Some(top), None), -100);
        assert_eq!(c.vertical(i32::MIN, Some(top), None), i32::MIN);
        let bottom = EdgeItem { edge: i32::MAX, minute: 600 };
        assert_eq!(c.vertical(i32::MAX, None, Some(bottom)), i32::MAX - 190);
    }

    #[test]
    fn vertical_nothing_materialized() {
        let c = calc(false);
        assert_eq!(c.vertical(10, None, None), 0);
        assert_eq!(c.vertical(-10, None, None), 0);
        assert_eq!(c.vertical(0, None, None), 0);
    }

    #[test]
    fn horizontal_edges_clamp_independently_without_looping() {
        let c = calc(false);
        // left edge at first column, right not at last
        let s = span(0, 400, true, false);
        assert_eq!(c.horizontal(-50, s), 0);
        assert_eq!(c.horizontal(50, s), 50);
        // right edge at last column, overhanging by 20
        let s = span(-100, 320, false, true);
        assert_eq!(c.horizontal(50, s), 20);
        assert_eq!(c.horizontal(-50, s), -50);
    }

    #[test]
    fn horizontal_looping_unclamped_until_all_columns_live() {
        let c = calc(true);
        let s = span(0, 400, true, false);
        assert_eq!(c.horizontal(-50, s), -50);
        let all = span(-10, 300, true, true);
        assert_eq!(c.horizontal(-50, all), -10);
        assert_eq!(c.horizontal(50, all), 0);
    }
}
