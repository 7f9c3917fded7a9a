#![forbid(unsafe_code)]

//! Structural checks over a laid-out window.
//!
//! [`window_violations`] recomputes where every period should sit from a
//! single live reference item (positions are linear in time vertically and
//! in populated-column order horizontally) and reports every way the live
//! window deviates from "exactly the visible periods, plus at most one
//! boundary item at each end of a column run".

use std::collections::BTreeMap;

use timetable_core::geometry::Rect;
use timetable_layout::{MaterializedItem, TimetableLayout};

/// Describe every invariant the current window breaks. Empty when sound.
pub fn window_violations<H>(layout: &TimetableLayout<H>) -> Vec<String> {
    let mut out = Vec::new();
    let index = layout.period_index();
    let config = layout.config();
    let anchor = layout.anchor();
    let content = layout.viewport().content_rect();
    let items: Vec<MaterializedItem<'_, H>> = layout.materialized().collect();

    let Some(reference) = items.first() else {
        if !anchor.is_empty() {
            out.push("anchor tracks a window but nothing is live".to_string());
        }
        return out;
    };
    let Some(ref_period) = index.period(reference.item_index).copied() else {
        out.push(format!("live item {} is out of range", reference.item_index));
        return out;
    };
    let top_of = |start_minute: i64| {
        reference
            .rect
            .top()
            .saturating_add(config.minutes_to_px(start_minute - ref_period.start_minute))
    };

    // Live positions per column, with the column's x.
    let mut runs: BTreeMap<usize, (i32, Vec<usize>)> = BTreeMap::new();
    for item in &items {
        let Some(period) = index.period(item.item_index) else {
            out.push(format!("live item {} is out of range", item.item_index));
            continue;
        };
        if item.column != period.column {
            out.push(format!(
                "item {} recorded in column {} but belongs to {}",
                item.item_index, item.column, period.column
            ));
        }
        let expected = Rect::new(
            item.rect.left(),
            top_of(period.start_minute),
            config.column_width,
            config.minutes_to_px(period.duration_minutes()).max(0),
        );
        if item.rect != expected {
            out.push(format!(
                "item {} at {:?}, expected {:?}",
                item.item_index, item.rect, expected
            ));
        }
        let run = runs
            .entry(period.column)
            .or_insert_with(|| (item.rect.left(), Vec::new()));
        if run.0 != item.rect.left() {
            out.push(format!(
                "column {} items disagree on x: {} vs {}",
                period.column,
                run.0,
                item.rect.left()
            ));
        }
        run.1.push(period.position_in_column);
    }

    for (&column, (x, positions)) in &mut runs {
        positions.sort_unstable();
        if positions.windows(2).any(|w| w[1] != w[0] + 1) {
            out.push(format!("column {column} run is not contiguous: {positions:?}"));
        }
        let Some(periods) = index.column(column) else { continue };
        let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
            continue;
        };

        let first_item = periods.get(first).map(|p| p.item_index);
        let last_item = periods.get(last).map(|p| p.item_index);
        if anchor.top.get(&column).copied() != first_item {
            out.push(format!("column {column} top anchor {:?} != {first_item:?}", anchor.top.get(&column)));
        }
        if anchor.bottom.get(&column).copied() != last_item {
            out.push(format!(
                "column {column} bottom anchor {:?} != {last_item:?}",
                anchor.bottom.get(&column)
            ));
        }

        for period in periods.periods() {
            let rect = Rect::new(
                *x,
                top_of(period.start_minute),
                config.column_width,
                config.minutes_to_px(period.duration_minutes()).max(0),
            );
            let live = positions.binary_search(&period.position_in_column).is_ok();
            if !live && rect.intersection_opt(&content).is_some() {
                out.push(format!("visible item {} is not live", period.item_index));
            }
            // touching an edge counts as off-screen
            let off_screen = rect.bottom() <= content.top() || rect.top() >= content.bottom();
            let inner = period.position_in_column != first && period.position_in_column != last;
            if live && inner && off_screen {
                out.push(format!("off-screen item {} is inside the run", period.item_index));
            }
        }
    }

    for column in anchor.top.keys().chain(anchor.bottom.keys()) {
        if !runs.contains_key(column) {
            out.push(format!("anchor tracks column {column} with nothing live"));
        }
    }
    for column in [anchor.left_column, anchor.right_column].into_iter().flatten() {
        if !runs.contains_key(&column) {
            out.push(format!("outer column {column} has nothing live"));
        }
    }

    for (&column, (x, _)) in &runs {
        let outer = anchor.left_column == Some(column) || anchor.right_column == Some(column);
        let off_screen = x.saturating_add(config.column_width) <= content.left() || *x >= content.right();
        if !outer && off_screen {
            out.push(format!("off-screen column {column} is inside the window"));
        }
    }

    if !config.loop_horizontally {
        // Populated columns sit side by side in column order.
        let populated: Vec<usize> = index.column_numbers().collect();
        let ordinal = |column: usize| populated.iter().position(|&c| c == column);
        let base = runs
            .iter()
            .next()
            .and_then(|(&column, (x, _))| Some((ordinal(column)?, *x)));
        if let Some((base_ordinal, base_x)) = base {
            for (n, &column) in populated.iter().enumerate() {
                let x = base_x + (n as i32 - base_ordinal as i32) * config.column_width;
                if let Some((actual, _)) = runs.get(&column)
                    && *actual != x
                {
                    out.push(format!("column {column} at x {actual}, expected {x}"));
                }
                let strip = Rect::new(x, content.top(), config.column_width, content.height);
                if !runs.contains_key(&column) && strip.intersection_opt(&content).is_some() {
                    out.push(format!("visible column {column} is not live"));
                }
            }
        }
    }

    out
}
