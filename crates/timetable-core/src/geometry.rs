#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are signed pixels. Materialized items routinely sit at
//! negative offsets (scrolled above or left of the viewport), so unlike a
//! cell grid there is no clamping at zero.

/// An axis-aligned rectangle in layout pixels.
///
/// Origin is at the top-left of the rendering surface; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from the given edges.
    ///
    /// A `right` smaller than `left` (or `bottom` smaller than `top`) yields
    /// a zero extent on that axis.
    #[inline]
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let width = if right > left { right - left } else { 0 };
        let height = if bottom > top { bottom - top } else { 0 };
        Self::new(left, top, width, height)
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Left edge (inclusive). Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (inclusive). Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Return a copy moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    ///
    /// Extents are half-open: rectangles that only share an edge do not
    /// intersect.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// The smallest rectangle that contains both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::from_edges(x, y, right, bottom)
    }

    /// Create a new rectangle inside the current one with the given insets.
    pub fn inner(&self, insets: Sides) -> Rect {
        Rect::from_edges(
            self.x.saturating_add(insets.left),
            self.y.saturating_add(insets.top),
            self.right().saturating_sub(insets.right),
            self.bottom().saturating_sub(insets.bottom),
        )
    }
}

/// Sides for padding insets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with horizontal values only.
    pub const fn horizontal(val: i32) -> Self {
        Self {
            top: 0,
            right: val,
            bottom: 0,
            left: val,
        }
    }

    /// Create new sides with vertical values only.
    pub const fn vertical(val: i32) -> Self {
        Self {
            top: val,
            right: 0,
            bottom: val,
            left: 0,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }
}

impl From<i32> for Sides {
    fn from(val: i32) -> Self {
        Self::all(val)
    }
}

impl From<(i32, i32)> for Sides {
    fn from((vertical, horizontal): (i32, i32)) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

impl From<(i32, i32, i32, i32)> for Sides {
    fn from((top, right, bottom, left): (i32, i32, i32, i32)) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// The scrollable surface the engine fills: outer size plus padding.
///
/// Supplied anew on every layout pass. The padded edges
/// (`parent_left` .. `parent_bottom`) are the ones every fill and recycle
/// decision is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Viewport {
    /// Outer width in pixels.
    pub width: i32,
    /// Outer height in pixels.
    pub height: i32,
    /// Padding insets.
    pub padding: Sides,
}

impl Viewport {
    /// Create an unpadded viewport.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            padding: Sides::all(0),
        }
    }

    /// Set padding insets.
    #[inline]
    #[must_use]
    pub const fn with_padding(mut self, padding: Sides) -> Self {
        self.padding = padding;
        self
    }

    #[inline]
    pub const fn parent_left(&self) -> i32 {
        self.padding.left
    }

    #[inline]
    pub const fn parent_top(&self) -> i32 {
        self.padding.top
    }

    #[inline]
    pub const fn parent_right(&self) -> i32 {
        self.width.saturating_sub(self.padding.right)
    }

    #[inline]
    pub const fn parent_bottom(&self) -> i32 {
        self.height.saturating_sub(self.padding.bottom)
    }

    /// The padded content area.
    #[inline]
    pub fn content_rect(&self) -> Rect {
        Rect::from_edges(
            self.parent_left(),
            self.parent_top(),
            self.parent_right(),
            self.parent_bottom(),
        )
    }

    /// True when the padded content area has no room to fill.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content_rect().is_empty()
    }
}
