#![forbid(unsafe_code)]

//! Virtualized timetable layout.
//!
//! Periods (time-bounded items) are grouped into parallel columns and laid
//! out on a two-axis surface: time runs downward at `pixels_per_minute`,
//! columns run rightward at `column_width`. Only the periods intersecting
//! the viewport (plus at most one boundary item per edge) are ever materialized.
//!
//! - [`TimetableLayout`] - the state machine: full layout passes, scrolling,
//!   scroll-to-item, save/restore
//! - [`PeriodIndex`] - period/column indexing built from a [`PeriodLookup`]
//! - [`Anchor`] - boundary bookkeeping for the materialized window
//! - [`ScrollCalculator`] - scroll-delta clamping at the data edges
//! - [`SavedState`] / [`StateStore`] - scroll position snapshots
//! - [`ItemPool`] - host-side renderable pooling
//!
//! ```ignore
//! use timetable_layout::{PeriodInfo, TimetableConfig, TimetableLayout, Viewport};
//!
//! let mut layout = TimetableLayout::new(TimetableConfig::new(120, 4))?;
//! let lookup = |i: usize| PeriodInfo::new(starts[i], ends[i], rooms[i]);
//! layout.layout(&lookup, starts.len(), Viewport::new(640, 480), &mut pool);
//! layout.scroll_vertically_by(48, &mut pool);
//! for item in layout.materialized() {
//!     draw(item.handle, item.rect);
//! }
//! ```

pub mod anchor;
pub mod config;
pub mod engine;
mod filler;
pub mod period;
pub mod pool;
pub mod scroll;
pub mod state;

pub use anchor::Anchor;
pub use config::{ConfigError, TimetableConfig};
pub use engine::{LayoutPhase, TimetableLayout};
pub use filler::FillDirection;
pub use period::{Column, Period, PeriodIndex, PeriodInfo, PeriodLookup};
pub use pool::{ItemPool, MaterializedItem};
pub use scroll::{ColumnSpan, EdgeItem, ScrollCalculator};
pub use state::{SavedState, StateError, StateStore};
pub use timetable_core::geometry::{Rect, Sides, Viewport};
