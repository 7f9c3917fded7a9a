#![forbid(unsafe_code)]

//! Test harness for the timetable layout engine.
//!
//! - [`RecordingPool`] - an [`ItemPool`](timetable_layout::ItemPool) with an
//!   acquire/release ledger
//! - [`FixtureSchedule`] - canned period datasets
//! - [`window_violations`] - structural checks over a laid-out window
//! - [`window_to_text`] - render the live window as a character grid
//! - [`assert_snapshot!`] - golden text snapshots
//!
//! # Quick Start
//!
//! ```ignore
//! use timetable_harness::{assert_snapshot, FixtureSchedule, RecordingPool, window_to_text};
//!
//! #[test]
//! fn three_rooms() {
//!     let schedule = FixtureSchedule::uniform(3, 8, 30);
//!     let mut pool = RecordingPool::new();
//!     let mut layout = TimetableLayout::new(TimetableConfig::new(40, 1))?;
//!     layout.layout(&schedule, schedule.len(), Viewport::new(100, 90), &mut pool);
//!     assert_snapshot!("three_rooms", &window_to_text(&layout, 10, 15));
//! }
//! ```
//!
//! # Updating Snapshots
//!
//! Run tests with `BLESS=1` to create or update snapshot files:
//!
//! ```sh
//! BLESS=1 cargo test
//! ```
//!
//! Snapshot files are stored under `tests/snapshots/` relative to the
//! crate's `CARGO_MANIFEST_DIR`.

pub mod fixture;
pub mod invariants;
pub mod recording;

use std::fmt::Write;
use std::path::{Path, PathBuf};

use timetable_layout::TimetableLayout;

pub use fixture::FixtureSchedule;
pub use invariants::window_violations;
pub use recording::{PoolEvent, PoolViolation, RecordedHandle, RecordingPool};

// ============================================================================
// Window → Text Conversion
// ============================================================================

/// Single-character label for an item: `0-9`, `a-z`, `A-Z`, repeating.
pub fn item_label(item_index: usize) -> char {
    const LABELS: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    char::from(LABELS[item_index % LABELS.len()])
}

/// Render the viewport as a grid of `cell_width` x `cell_height` pixel cells.
///
/// A cell shows the label of the live item covering its top-left pixel,
/// `.` when no item covers it. Items are clipped to the viewport, so
/// boundary items outside it do not show up.
pub fn window_to_text<H>(layout: &TimetableLayout<H>, cell_width: i32, cell_height: i32) -> String {
    let viewport = layout.viewport();
    let cell_width = cell_width.max(1);
    let cell_height = cell_height.max(1);
    let columns = (viewport.width.max(0) / cell_width) as usize;
    let rows = (viewport.height.max(0) / cell_height) as usize;

    let mut grid = vec![vec!['.'; columns]; rows];
    for item in layout.materialized() {
        let label = item_label(item.item_index);
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                let px = x as i32 * cell_width;
                let py = y as i32 * cell_height;
                if item.rect.contains(px, py) {
                    *cell = label;
                }
            }
        }
    }

    let mut out = String::with_capacity((columns + 1) * rows);
    for (y, row) in grid.iter().enumerate() {
        if y > 0 {
            out.push('\n');
        }
        out.extend(row.iter());
    }
    out
}

// ============================================================================
// Golden Window Snapshots
// ============================================================================

/// Drop trailing whitespace on every row and trailing empty rows, so a
/// snapshot edited by hand still compares equal.
fn canonical_rows(text: &str) -> Vec<&str> {
    let mut rows: Vec<&str> = text.lines().map(str::trim_end).collect();
    while rows.last().is_some_and(|row| row.is_empty()) {
        rows.pop();
    }
    rows
}

/// Describe every row where two window grids differ.
///
/// Each entry names the row, both versions, and a caret under the first
/// differing cell. Empty when the grids match.
pub fn grid_mismatches(expected: &str, actual: &str) -> Vec<String> {
    let expected = canonical_rows(expected);
    let actual = canonical_rows(actual);
    let mut out = Vec::new();
    for row in 0..expected.len().max(actual.len()) {
        let want = expected.get(row).copied().unwrap_or("");
        let got = actual.get(row).copied().unwrap_or("");
        if want == got {
            continue;
        }
        let cell = want
            .chars()
            .zip(got.chars())
            .take_while(|(a, b)| a == b)
            .count();
        let mut entry = String::new();
        let _ = writeln!(entry, "row {row}, cell {cell}:");
        let _ = writeln!(entry, "  expected {want}");
        let _ = writeln!(entry, "  actual   {got}");
        let _ = write!(entry, "           {}^", " ".repeat(cell));
        out.push(entry);
    }
    out
}

fn snapshot_file(manifest_dir: &Path, name: &str) -> PathBuf {
    manifest_dir.join("tests").join("snapshots").join(format!("{name}.snap"))
}

fn blessing() -> bool {
    std::env::var("BLESS").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Compare a rendered window against `tests/snapshots/<name>.snap` under
/// `manifest_dir`, or rewrite the file when `BLESS=1`.
///
/// # Panics
///
/// When the grids differ, or the snapshot is missing and not being blessed.
pub fn assert_window_snapshot(name: &str, actual: &str, manifest_dir: &str) {
    let path = snapshot_file(Path::new(manifest_dir), name);

    if blessing() {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .unwrap_or_else(|e| panic!("cannot create {}: {e}", dir.display()));
        }
        std::fs::write(&path, actual)
            .unwrap_or_else(|e| panic!("cannot write {}: {e}", path.display()));
        return;
    }

    let expected = match std::fs::read_to_string(&path) {
        Ok(expected) => expected,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => panic!(
            "no window snapshot '{name}' at {}; rerun with BLESS=1\n{actual}",
            path.display()
        ),
        Err(e) => panic!("cannot read {}: {e}", path.display()),
    };
    let mismatches = grid_mismatches(&expected, actual);
    if !mismatches.is_empty() {
        panic!(
            "window snapshot '{name}' differs ({}); rerun with BLESS=1 to accept\n{}",
            path.display(),
            mismatches.join("\n")
        );
    }
}

/// Compare a rendered window against a golden file in the calling crate's
/// `tests/snapshots/` directory.
///
/// ```ignore
/// assert_snapshot!("initial_window", &window_to_text(&layout, 25, 20));
/// ```
#[macro_export]
macro_rules! assert_snapshot {
    ($name:expr, $text:expr) => {
        $crate::assert_window_snapshot($name, $text, env!("CARGO_MANIFEST_DIR"))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use timetable_layout::{TimetableConfig, Viewport};

    #[test]
    fn labels_cycle() {
        assert_eq!(item_label(0), '0');
        assert_eq!(item_label(10), 'a');
        assert_eq!(item_label(36), 'A');
        assert_eq!(item_label(62), '0');
    }

    #[test]
    fn window_text_of_uniform_grid() {
        let schedule = FixtureSchedule::uniform(2, 3, 30);
        let mut pool = RecordingPool::new();
        let mut layout = TimetableLayout::new(TimetableConfig::new(40, 1)).unwrap();
        layout.layout(&schedule, schedule.len(), Viewport::new(100, 60), &mut pool);
        // 20 px cells: columns at x 0..40 and 40..80, rows of 30 px
        let text = window_to_text(&layout, 20, 15);
        assert_eq!(text, "0011.\n0011.\n2233.\n2233.");
        assert!(window_violations(&layout).is_empty());
    }

    #[test]
    fn matching_grids_have_no_mismatches() {
        assert!(grid_mismatches("01.\n23.", "01.\n23.").is_empty());
        // trailing blanks and a final newline are not significant
        assert!(grid_mismatches("01.  \n23.\n\n", "01.\n23.").is_empty());
    }

    #[test]
    fn mismatch_points_at_first_differing_cell() {
        let found = grid_mismatches("0011..\n001122", "0011..\n001133");
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("row 1, cell 4:"), "{}", found[0]);
        assert!(found[0].contains("expected 001122"));
        assert!(found[0].contains("actual   001133"));
        assert!(found[0].ends_with("    ^"));
    }

    #[test]
    fn missing_rows_are_mismatches() {
        let found = grid_mismatches("01\n23", "01");
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("row 1, cell 0:"));
    }

    #[test]
    fn snapshot_file_lives_under_tests() {
        assert_eq!(
            snapshot_file(Path::new("/crates/demo"), "window"),
            PathBuf::from("/crates/demo/tests/snapshots/window.snap")
        );
    }

    fn scratch_snapshot(test: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("timetable_harness_{test}"));
        let _ = std::fs::remove_dir_all(&dir);
        let path = snapshot_file(&dir, test);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        dir
    }

    #[test]
    fn stored_window_matches() {
        let dir = scratch_snapshot("stored_match", "01.\n23.\n");
        assert_window_snapshot("stored_match", "01.\n23.", dir.to_str().unwrap());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    #[should_panic(expected = "differs")]
    fn changed_window_panics() {
        let dir = scratch_snapshot("changed_window", "01.\n23.");
        assert_window_snapshot("changed_window", "01.\n2..", dir.to_str().unwrap());
    }

    #[test]
    #[should_panic(expected = "no window snapshot")]
    fn missing_snapshot_panics() {
        let dir = std::env::temp_dir().join("timetable_harness_missing");
        let _ = std::fs::remove_dir_all(&dir);
        assert_window_snapshot("missing", "X", dir.to_str().unwrap());
    }
}
