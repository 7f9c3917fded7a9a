//! Property-based invariant tests for the signed geometry primitives.
//!
//! 1. Intersection is commutative and fits within both inputs.
//! 2. Union is commutative and contains both inputs.
//! 3. Offsetting preserves size and round-trips.
//! 4. Rectangles that only share an edge do not intersect.
//! 5. Viewport content rect is bounded by the outer size.

use proptest::prelude::*;
use timetable_core::geometry::{Rect, Sides, Viewport};

// ── Helpers ─────────────────────────────────────────────────────────────

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-5_000i32..=5_000, -5_000i32..=5_000, 0i32..=2_000, 0i32..=2_000)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn sides_strategy() -> impl Strategy<Value = Sides> {
    (0i32..=200, 0i32..=200, 0i32..=200, 0i32..=200)
        .prop_map(|(t, r, b, l)| Sides::new(t, r, b, l))
}

fn contains_rect(outer: &Rect, inner: &Rect) -> bool {
    inner.left() >= outer.left()
        && inner.top() >= outer.top()
        && inner.right() <= outer.right()
        && inner.bottom() <= outer.bottom()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Intersection
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn intersection_commutative(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.intersection(&b), b.intersection(&a));
    }

    #[test]
    fn intersection_fits_both(a in rect_strategy(), b in rect_strategy()) {
        if let Some(i) = a.intersection_opt(&b) {
            prop_assert!(contains_rect(&a, &i), "{:?} not inside {:?}", i, a);
            prop_assert!(contains_rect(&b, &i), "{:?} not inside {:?}", i, b);
            prop_assert!(!i.is_empty());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Union
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn union_commutative(a in rect_strategy(), b in rect_strategy()) {
        prop_assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn union_contains_both(a in rect_strategy(), b in rect_strategy()) {
        let u = a.union(&b);
        prop_assert!(contains_rect(&u, &a));
        prop_assert!(contains_rect(&u, &b));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Offset
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn offset_round_trips(r in rect_strategy(), dx in -10_000i32..=10_000, dy in -10_000i32..=10_000) {
        let moved = r.offset(dx, dy);
        prop_assert_eq!(moved.width, r.width);
        prop_assert_eq!(moved.height, r.height);
        prop_assert_eq!(moved.offset(-dx, -dy), r);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Shared edges
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn shared_edge_is_not_overlap(a in rect_strategy(), w in 1i32..=500, h in 1i32..=500) {
        let below = Rect::new(a.left(), a.bottom(), w, h);
        let right = Rect::new(a.right(), a.top(), w, h);
        prop_assert!(a.intersection_opt(&below).is_none());
        prop_assert!(a.intersection_opt(&right).is_none());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Viewport
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn viewport_content_within_outer(w in 0i32..=4_000, h in 0i32..=4_000, pad in sides_strategy()) {
        let vp = Viewport::new(w, h).with_padding(pad);
        let content = vp.content_rect();
        prop_assert!(content.width >= 0 && content.height >= 0);
        if !vp.is_empty() {
            prop_assert!(contains_rect(&Rect::from_size(w, h), &content));
        }
    }
}
