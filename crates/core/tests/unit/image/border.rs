//! Reflect-101 Border Tests.
//!
//! Verifies the mirror pattern `gfedcb|abcdefgh|gfedcba`, the degenerate
//! single-pixel dimension, and the range/idempotence properties over
//! arbitrary inputs.

use proptest::prelude::*;
use rstest::rstest;
use warpcache_core::image::reflect_101;

// ══════════════════════════════════════════════════════════
// 1. Known values
// ══════════════════════════════════════════════════════════

/// With `len = 8` (abcdefgh), the left margin reads `gfedcb` and the right
/// margin reads `gfedcba`: the edge pixel is never repeated.
#[rstest]
#[case(-1, 1)]
#[case(-2, 2)]
#[case(-6, 6)]
#[case(-7, 7)]
#[case(8, 6)]
#[case(9, 5)]
#[case(13, 1)]
#[case(14, 0)]
fn reflects_without_repeating_edge(#[case] coordinate: i64, #[case] expected: i64) {
    assert_eq!(reflect_101(coordinate, 8), expected);
}

#[test]
fn in_range_is_unchanged() {
    for x in 0..8 {
        assert_eq!(reflect_101(x, 8), x);
    }
}

/// A one-pixel dimension has nothing to mirror across.
#[rstest]
#[case(-5)]
#[case(0)]
#[case(1)]
#[case(42)]
fn single_pixel_dimension_maps_to_zero(#[case] coordinate: i64) {
    assert_eq!(reflect_101(coordinate, 1), 0);
}

#[test]
fn two_pixel_dimension_alternates() {
    let mapped: Vec<i64> = (-3..5).map(|x| reflect_101(x, 2)).collect();
    assert_eq!(mapped, vec![1, 0, 1, 0, 1, 0, 1, 0]);
}

// ══════════════════════════════════════════════════════════
// 2. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    /// Any coordinate lands on the grid, and landing again changes nothing.
    #[test]
    fn result_in_range_and_idempotent(x in -100_000i64..100_000, len in 1u64..512) {
        let r = reflect_101(x, len);
        prop_assert!(r >= 0);
        prop_assert!((r as u64) < len);
        prop_assert_eq!(reflect_101(r, len), r);
    }

    /// Within one reflection of the grid the result is `-x` on the left and
    /// `len - 2 - (x mod len)` on the right.
    #[test]
    fn first_reflection_matches_closed_form(
        (len, x) in (2u64..256).prop_flat_map(|len| {
            let l = len as i64;
            (Just(len), -(l - 1)..(2 * l - 1))
        })
    ) {
        let l = len as i64;
        let expected = if x < 0 {
            -x
        } else if x >= l {
            l - 2 - x % l
        } else {
            x
        };
        prop_assert_eq!(reflect_101(x, len), expected);
    }

    /// The mirror is symmetric about the first pixel.
    #[test]
    fn symmetric_about_origin(x in -10_000i64..10_000, len in 2u64..256) {
        prop_assert_eq!(reflect_101(-x, len), reflect_101(x, len));
    }
}
