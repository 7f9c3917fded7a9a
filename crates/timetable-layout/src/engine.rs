#![forbid(unsafe_code)]

//! The layout state machine.
//!
//! ```text
//!            item_count > 0, no target          item_count > 0, saved/pending target
//!   Empty ─────────────────────────► Initial    Empty ─────────────────────────► Restored
//!                                      │                                           │
//!                                      └──────────────► Steady ◄───────────────────┘
//!                                                        │  ▲
//!                                       scroll (incremental fill/recycle)
//!                                                        └──┘
//!   any ── item_count == 0 / reset ──► Empty
//! ```
//!
//! [`TimetableLayout::layout`] is the only full pass: it rebuilds the
//! period index and the window from scratch. Scrolling never rebuilds; it
//! clamps the delta, offsets the live items, fills the edge that came into
//! view and recycles the edge that left it.

use timetable_core::geometry::Viewport;

use crate::anchor::Anchor;
use crate::config::{ConfigError, TimetableConfig};
use crate::filler::ViewportFiller;
use crate::period::{Period, PeriodIndex, PeriodLookup};
use crate::pool::{ItemPool, MaterializedItem, MaterializedSet};
use crate::scroll::ScrollCalculator;
use crate::state::{SavedState, StateStore};

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutPhase {
    /// No data, nothing materialized.
    #[default]
    Empty,
    /// Window built from the first column and the earliest start minute.
    InitialLayout,
    /// Window built around a saved or requested item.
    RestoredLayout,
    /// Window built; scrolling adjusts it incrementally.
    Steady,
}

impl LayoutPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            LayoutPhase::Empty => "empty",
            LayoutPhase::InitialLayout => "initial",
            LayoutPhase::RestoredLayout => "restored",
            LayoutPhase::Steady => "steady",
        }
    }
}

/// Virtualized timetable layout engine.
///
/// `H` is the host's renderable handle type; handles come from and go back
/// to an [`ItemPool`] passed into every mutating call.
#[derive(Debug)]
pub struct TimetableLayout<H> {
    config: TimetableConfig,
    index: PeriodIndex,
    anchor: Anchor,
    items: MaterializedSet<H>,
    viewport: Viewport,
    phase: LayoutPhase,
    pending_scroll: Option<usize>,
    saved: StateStore,
}

impl<H> TimetableLayout<H> {
    /// Create an engine with a validated configuration.
    pub fn new(config: TimetableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            index: PeriodIndex::default(),
            anchor: Anchor::new(),
            items: MaterializedSet::default(),
            viewport: Viewport::default(),
            phase: LayoutPhase::Empty,
            pending_scroll: None,
            saved: StateStore::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Index built by the latest layout pass.
    #[inline]
    pub fn period_index(&self) -> &PeriodIndex {
        &self.index
    }

    #[inline]
    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    /// Item count seen by the latest layout pass.
    #[inline]
    pub fn item_count(&self) -> usize {
        self.index.len()
    }

    /// Live items in item order.
    pub fn materialized(&self) -> impl Iterator<Item = MaterializedItem<'_, H>> {
        self.items.iter()
    }

    #[inline]
    pub fn materialized_count(&self) -> usize {
        self.items.len()
    }

    /// The live item for `item_index`, if materialized.
    pub fn find_item(&self, item_index: usize) -> Option<MaterializedItem<'_, H>> {
        self.items.get(item_index)
    }

    /// Snapshot of the current scroll position.
    pub fn save_state(&self) -> Option<SavedState> {
        SavedState::capture(&self.items, &self.viewport)
    }

    /// Queue a snapshot for the next layout pass. Replaces any snapshot
    /// not yet consumed.
    pub fn restore_state(&mut self, state: SavedState) {
        self.saved.stash(state);
    }

    /// Snapshot waiting for the next layout pass.
    pub fn pending_state(&self) -> Option<&SavedState> {
        self.saved.peek()
    }

    /// Request that the next layout pass puts `item_index` at the padded
    /// top-left corner. Ignored (returns `false`) when out of range of the
    /// latest pass.
    pub fn scroll_to_item(&mut self, item_index: usize) -> bool {
        if item_index >= self.index.len() {
            tracing::debug!(
                item_index,
                item_count = self.index.len(),
                "scroll target out of range; ignored"
            );
            return false;
        }
        self.pending_scroll = Some(item_index);
        true
    }

    fn calculator(&self) -> ScrollCalculator {
        ScrollCalculator::new(
            &self.viewport,
            self.index.first_start_minute(),
            self.index.last_end_minute(),
            self.config.loop_horizontally,
        )
    }

    fn filler<'a, P>(&'a mut self, pool: &'a mut P) -> ViewportFiller<'a, H, P>
    where
        P: ItemPool<Handle = H>,
    {
        ViewportFiller {
            index: &self.index,
            anchor: &mut self.anchor,
            items: &mut self.items,
            pool,
            viewport: self.viewport,
            config: self.config,
        }
    }

    /// Release everything and return to `Empty`. Pending targets and saved
    /// state are dropped; the next pass starts over as an initial layout.
    pub fn reset<P>(&mut self, pool: &mut P)
    where
        P: ItemPool<Handle = H>,
    {
        self.filler(pool).release_all();
        self.index = PeriodIndex::default();
        self.pending_scroll = None;
        self.saved.discard();
        self.phase = LayoutPhase::Empty;
    }

    /// Capture the scroll position and release every live handle.
    ///
    /// Use before dropping the engine; the returned snapshot can be fed to
    /// a new engine's [`restore_state`](Self::restore_state).
    pub fn teardown<P>(&mut self, pool: &mut P) -> Option<SavedState>
    where
        P: ItemPool<Handle = H>,
    {
        let state = self.save_state();
        self.reset(pool);
        state
    }

    /// Full layout pass.
    ///
    /// Rebuilds the period index from `lookup` and the window from scratch.
    /// The window is positioned, in priority order, at a pending
    /// [`scroll_to_item`](Self::scroll_to_item) target, at a restored
    /// snapshot, at the current first visible item (same item count only),
    /// or at the top-left of the data. Returns the phase that produced the
    /// window; the engine then rests in [`LayoutPhase::Steady`].
    pub fn layout<L, P>(
        &mut self,
        lookup: &L,
        item_count: usize,
        viewport: Viewport,
        pool: &mut P,
    ) -> LayoutPhase
    where
        L: PeriodLookup + ?Sized,
        P: ItemPool<Handle = H>,
    {
        let span = tracing::debug_span!(
            "timetable_layout",
            item_count,
            phase = tracing::field::Empty
        );
        let _guard = span.enter();

        if item_count == 0 {
            self.viewport = viewport;
            self.reset(pool);
            span.record("phase", LayoutPhase::Empty.as_str());
            return LayoutPhase::Empty;
        }

        let continuity = if item_count == self.index.len() {
            SavedState::capture(&self.items, &viewport)
        } else {
            if self.phase != LayoutPhase::Empty {
                tracing::debug!(
                    previous = self.index.len(),
                    item_count,
                    "item count changed; rebuilding from empty"
                );
            }
            None
        };

        self.viewport = viewport;
        self.filler(pool).release_all();
        self.phase = LayoutPhase::Empty;
        self.index = PeriodIndex::build(item_count, &LookupRef(lookup));

        let parent_left = viewport.parent_left();
        let parent_top = viewport.parent_top();
        let target = self
            .pending_scroll
            .take()
            .map(|item| SavedState::new(item, parent_left, parent_top))
            .or_else(|| self.saved.take())
            .or(continuity)
            .and_then(|state| {
                let period = self.index.period(state.item_index).copied();
                if period.is_none() {
                    tracing::debug!(item = state.item_index, "restore target out of range");
                }
                period.map(|p| (p, state))
            });
        self.saved.discard();

        let phase = match target {
            Some((period, state)) => {
                self.phase = LayoutPhase::RestoredLayout;
                self.restored_fill(&period, state.left, state.top, pool);
                LayoutPhase::RestoredLayout
            }
            None => {
                self.phase = LayoutPhase::InitialLayout;
                self.initial_fill(pool);
                LayoutPhase::InitialLayout
            }
        };

        span.record("phase", phase.as_str());
        tracing::debug!(materialized = self.items.len(), "layout pass complete");
        self.phase = LayoutPhase::Steady;
        phase
    }

    fn initial_fill<P>(&mut self, pool: &mut P)
    where
        P: ItemPool<Handle = H>,
    {
        let (Some(first_column), Some(first_start)) =
            (self.index.first_column(), self.index.first_start_minute())
        else {
            return;
        };
        let Some(base) = self
            .index
            .column(first_column)
            .and_then(|c| c.first())
            .copied()
        else {
            return;
        };
        let config = self.config;
        let x = self.viewport.parent_left();
        let y = self
            .viewport
            .parent_top()
            .saturating_add(config.minutes_to_px(base.start_minute - first_start));

        let mut filler = self.filler(pool);
        filler.fill_horizontal_chunk(first_column, x, y, &base, true);
        filler.settle_horizontal();
    }

    fn restored_fill<P>(&mut self, period: &Period, left: i32, top: i32, pool: &mut P)
    where
        P: ItemPool<Handle = H>,
    {
        let mut filler = self.filler(pool);
        filler.fill_horizontal_chunk(period.column, left, top, period, true);
        filler.prepend_rows();
        filler.prepend_columns();
        // a snapshot from elsewhere can put the target far off-screen
        filler.recycle_top();
        filler.recycle_bottom();
        filler.recycle_left();
        filler.recycle_right();
        filler.settle_vertical();
        filler.settle_horizontal();
    }

    /// Scroll through time. Positive `dy` reveals later periods.
    ///
    /// Returns the delta actually applied, which is smaller in magnitude
    /// than `dy` at the first start / last end of the data.
    pub fn scroll_vertically_by<P>(&mut self, dy: i32, pool: &mut P) -> i32
    where
        P: ItemPool<Handle = H>,
    {
        if dy == 0 || self.items.is_empty() {
            return 0;
        }
        let _span = tracing::trace_span!("scroll_vertically", dy).entered();
        let calculator = self.calculator();
        let mut filler = self.filler(pool);

        let actual = calculator.vertical(dy, filler.top_edge(), filler.bottom_edge());
        if actual == 0 {
            tracing::trace!(requested = dy, applied = 0, "vertical scroll clamped");
            return 0;
        }
        filler.items.offset_all(0, -actual);
        if actual > 0 {
            filler.append_rows();
            filler.recycle_top();
        } else {
            filler.prepend_rows();
            filler.recycle_bottom();
        }
        let applied = actual - filler.settle_vertical();

        tracing::trace!(
            requested = dy,
            applied,
            materialized = self.items.len(),
            "vertical scroll"
        );
        applied
    }

    /// Scroll across columns. Positive `dx` reveals columns to the right.
    ///
    /// Returns the delta actually applied.
    pub fn scroll_horizontally_by<P>(&mut self, dx: i32, pool: &mut P) -> i32
    where
        P: ItemPool<Handle = H>,
    {
        if dx == 0 || self.items.is_empty() {
            return 0;
        }
        let _span = tracing::trace_span!("scroll_horizontally", dx).entered();
        let calculator = self.calculator();
        let parent_left = self.viewport.parent_left();
        let parent_right = self.viewport.parent_right();
        let mut filler = self.filler(pool);

        let Some(span) = filler.column_span() else {
            tracing::debug!("horizontal window not tracked; scroll ignored");
            return 0;
        };
        let actual = calculator.horizontal(dx, span);
        if actual == 0 {
            tracing::trace!(requested = dx, applied = 0, "horizontal scroll clamped");
            return 0;
        }
        filler.items.offset_all(-actual, 0);

        // With looping a single chunk stops at the first live column, so a
        // delta wider than the window needs several fill/recycle rounds.
        if actual > 0 {
            loop {
                let added = filler.append_columns();
                filler.recycle_left();
                let open = filler.column_span().is_some_and(|s| s.right < parent_right);
                if !added || !open {
                    break;
                }
            }
        } else {
            loop {
                let added = filler.prepend_columns();
                filler.recycle_right();
                let open = filler.column_span().is_some_and(|s| s.left > parent_left);
                if !added || !open {
                    break;
                }
            }
        }
        let applied = actual - filler.settle_horizontal();

        tracing::trace!(
            requested = dx,
            applied,
            materialized = self.items.len(),
            "horizontal scroll"
        );
        applied
    }
}

/// Adapts an unsized lookup to the sized bound of `PeriodIndex::build`.
struct LookupRef<'a, L: ?Sized>(&'a L);

impl<L: PeriodLookup + ?Sized> PeriodLookup for LookupRef<'_, L> {
    fn period_info(&self, index: usize) -> crate::period::PeriodInfo {
        self.0.period_info(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::PeriodInfo;

    const MIN: i64 = 60_000;

    /// Counts outstanding handles; handles are the item index.
    #[derive(Default)]
    struct CountingPool {
        live: Vec<usize>,
        acquired: usize,
        released: usize,
    }

    impl ItemPool for CountingPool {
        type Handle = usize;

        fn acquire(&mut self, item_index: usize) -> usize {
            assert!(!self.live.contains(&item_index), "item {item_index} live twice");
            self.live.push(item_index);
            self.acquired += 1;
            item_index
        }

        fn release(&mut self, handle: usize) {
            let at = self.live.iter().position(|&i| i == handle).unwrap();
            self.live.swap_remove(at);
            self.released += 1;
        }
    }

    /// `columns` columns of contiguous 30-minute periods, row-major.
    fn grid(columns: usize) -> impl Fn(usize) -> PeriodInfo {
        move |i| {
            let row = (i / columns) as i64;
            PeriodInfo::new(row * 30 * MIN, (row + 1) * 30 * MIN, i % columns)
        }
    }

    fn engine(looping: bool) -> TimetableLayout<usize> {
        TimetableLayout::new(TimetableConfig::new(100, 2).with_horizontal_looping(looping)).unwrap()
    }

    fn live(layout: &TimetableLayout<usize>) -> Vec<usize> {
        layout.materialized().map(|m| m.item_index).collect()
    }

    #[test]
    fn new_rejects_bad_config() {
        let err = TimetableLayout::<()>::new(TimetableConfig::new(0, 1)).unwrap_err();
        assert_eq!(err, ConfigError::NonPositiveColumnWidth(0));
    }

    #[test]
    fn empty_dataset_stays_empty() {
        let mut layout = engine(false);
        let mut pool = CountingPool::default();
        let phase = layout.layout(&grid(2), 0, Viewport::new(200, 120), &mut pool);
        assert_eq!(phase, LayoutPhase::Empty);
        assert_eq!(layout.phase(), LayoutPhase::Empty);
        assert_eq!(layout.materialized_count(), 0);
        assert_eq!(layout.scroll_vertically_by(10, &mut pool), 0);
    }

    #[test]
    fn initial_layout_fills_exactly_the_viewport() {
        let mut layout = engine(false);
        let mut pool = CountingPool::default();
        // items are 60 px tall; a 120 px viewport shows rows 0 and 1 exactly
        let phase = layout.layout(&grid(2), 8, Viewport::new(200, 120), &mut pool);
        assert_eq!(phase, LayoutPhase::InitialLayout);
        assert_eq!(layout.phase(), LayoutPhase::Steady);
        // row 2 starts on the bottom edge, so it is not visible yet
        assert_eq!(live(&layout), vec![0, 1, 2, 3]);
        let rect = layout.find_item(3).unwrap().rect;
        assert_eq!((rect.left(), rect.top(), rect.right(), rect.bottom()), (100, 60, 200, 120));
    }

    #[test]
    fn vertical_scroll_fills_and_recycles() {
        let mut layout = engine(false);
        let mut pool = CountingPool::default();
        layout.layout(&grid(2), 8, Viewport::new(200, 120), &mut pool);

        assert_eq!(layout.scroll_vertically_by(30, &mut pool), 30);
        assert_eq!(live(&layout), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(layout.find_item(0).unwrap().rect.top(), -30);

        // content is 240 px and the viewport 120: only 90 more px remain
        assert_eq!(layout.scroll_vertically_by(100, &mut pool), 90);
        // row 1 now ends exactly on the top edge and is released
        assert_eq!(live(&layout), vec![4, 5, 6, 7]);
        assert_eq!(layout.find_item(7).unwrap().rect.bottom(), 120);
        assert_eq!(layout.scroll_vertically_by(5, &mut pool), 0);

        assert_eq!(layout.scroll_vertically_by(-500, &mut pool), -120);
        assert_eq!(live(&layout), vec![0, 1, 2, 3]);
        assert_eq!(layout.find_item(0).unwrap().rect.top(), 0);
        assert_eq!(pool.acquired - pool.released, layout.materialized_count());
    }

    #[test]
    fn horizontal_scroll_clamps_without_looping() {
        let mut layout = engine(false);
        let mut pool = CountingPool::default();
        layout.layout(&grid(3), 6, Viewport::new(150, 120), &mut pool);
        assert_eq!(layout.scroll_horizontally_by(-10, &mut pool), 0);
        assert_eq!(layout.scroll_horizontally_by(500, &mut pool), 150);
        assert_eq!(layout.anchor().right_column, Some(2));
        assert_eq!(layout.anchor().left_column, Some(1));
        assert_eq!(layout.scroll_horizontally_by(1, &mut pool), 0);
    }

    #[test]
    fn horizontal_scroll_wraps_with_looping() {
        let mut layout = engine(true);
        let mut pool = CountingPool::default();
        layout.layout(&grid(4), 8, Viewport::new(200, 120), &mut pool);
        // column 2 would start on the right edge, so it is not live
        assert_eq!(layout.anchor().left_column, Some(0));
        assert_eq!(layout.anchor().right_column, Some(1));

        assert_eq!(layout.scroll_horizontally_by(-50, &mut pool), -50);
        assert_eq!(layout.anchor().left_column, Some(3));
        assert_eq!(layout.anchor().right_column, Some(1));
        let rect = layout.find_item(3).unwrap().rect;
        assert_eq!((rect.left(), rect.right()), (-50, 50));
    }

    #[test]
    fn scroll_to_item_validates_range() {
        let mut layout = engine(false);
        let mut pool = CountingPool::default();
        assert!(!layout.scroll_to_item(0));
        layout.layout(&grid(2), 6, Viewport::new(200, 120), &mut pool);
        assert!(!layout.scroll_to_item(6));
        assert!(layout.scroll_to_item(3));
        let phase = layout.layout(&grid(2), 6, Viewport::new(200, 120), &mut pool);
        assert_eq!(phase, LayoutPhase::RestoredLayout);
        let rect = layout.find_item(3).unwrap().rect;
        // the last column cannot move left of the right edge
        assert_eq!((rect.left(), rect.top()), (100, 0));
        assert_eq!(live(&layout), vec![2, 3, 4, 5]);
    }

    #[test]
    fn settling_far_apart_periods_saturates() {
        // the second period starts ~2800 years after the first; its projected
        // top edge saturates at i32::MIN
        let far = |i: usize| {
            let start = if i == 0 { 0 } else { 1_500_000_000 * MIN };
            PeriodInfo::new(start, start + 30 * MIN, 0)
        };
        let mut layout = engine(false);
        let mut pool = CountingPool::default();
        layout.layout(&far, 2, Viewport::new(100, 120), &mut pool);
        assert!(layout.scroll_to_item(1));

        let phase = layout.layout(&far, 2, Viewport::new(100, 120), &mut pool);
        assert_eq!(phase, LayoutPhase::RestoredLayout);
        // pulled down flush with the bottom edge
        assert_eq!(live(&layout), vec![1]);
        let rect = layout.find_item(1).unwrap().rect;
        assert_eq!((rect.top(), rect.bottom()), (60, 120));
        assert_eq!(layout.scroll_vertically_by(1_000, &mut pool), 0);
        assert_eq!(pool.acquired - pool.released, layout.materialized_count());
    }

    #[test]
    fn relayout_keeps_position_for_same_count() {
        let mut layout = engine(false);
        let mut pool = CountingPool::default();
        layout.layout(&grid(2), 6, Viewport::new(200, 120), &mut pool);
        layout.scroll_vertically_by(40, &mut pool);
        let before: Vec<_> = layout.materialized().map(|m| (m.item_index, m.rect)).collect();

        let phase = layout.layout(&grid(2), 6, Viewport::new(200, 120), &mut pool);
        assert_eq!(phase, LayoutPhase::RestoredLayout);
        let after: Vec<_> = layout.materialized().map(|m| (m.item_index, m.rect)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn item_count_change_starts_over() {
        let mut layout = engine(false);
        let mut pool = CountingPool::default();
        layout.layout(&grid(2), 6, Viewport::new(200, 120), &mut pool);
        layout.scroll_vertically_by(40, &mut pool);
        let phase = layout.layout(&grid(2), 8, Viewport::new(200, 120), &mut pool);
        assert_eq!(phase, LayoutPhase::InitialLayout);
        assert_eq!(layout.find_item(0).unwrap().rect.top(), 0);
    }

    #[test]
    fn teardown_then_restore_reproduces_window() {
        let mut pool = CountingPool::default();
        let mut first = engine(false);
        first.layout(&grid(3), 12, Viewport::new(150, 120), &mut pool);
        first.scroll_vertically_by(45, &mut pool);
        first.scroll_horizontally_by(70, &mut pool);
        let before: Vec<_> = first.materialized().map(|m| (m.item_index, m.rect)).collect();
        let state = first.teardown(&mut pool).unwrap();
        assert!(pool.live.is_empty());

        let mut second = engine(false);
        second.restore_state(state);
        let phase = second.layout(&grid(3), 12, Viewport::new(150, 120), &mut pool);
        assert_eq!(phase, LayoutPhase::RestoredLayout);
        assert!(second.pending_state().is_none());
        let after: Vec<_> = second.materialized().map(|m| (m.item_index, m.rect)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reset_releases_everything() {
        let mut layout = engine(false);
        let mut pool = CountingPool::default();
        layout.layout(&grid(2), 6, Viewport::new(200, 120), &mut pool);
        layout.restore_state(SavedState::new(1, 0, 0));
        layout.reset(&mut pool);
        assert_eq!(layout.phase(), LayoutPhase::Empty);
        assert!(pool.live.is_empty());
        assert!(layout.pending_state().is_none());
        assert_eq!(layout.item_count(), 0);
    }
}
