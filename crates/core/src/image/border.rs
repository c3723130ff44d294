//! Reflect-101 border policy.
//!
//! Mirrors out-of-range coordinates back onto the grid without repeating the
//! edge pixel (`gfedcb|abcdefgh|gfedcba`). Inside the first reflection this is
//! `-x` for negative inputs and `len - 2 - (x mod len)` past the far edge; the
//! pattern is periodic with period `2 * (len - 1)`, which extends it to any input.

/// Maps `coordinate` into `[0, len)` by reflect-101 mirroring.
///
/// Idempotent on coordinates that are already valid. A dimension of length one
/// maps everything to `0`. `len` must be positive.
#[inline]
pub const fn reflect_101(coordinate: i64, len: u64) -> i64 {
    if len <= 1 {
        return 0;
    }
    let len = len as i64;
    if coordinate >= 0 && coordinate < len {
        return coordinate;
    }
    let period = 2 * (len - 1);
    let folded = coordinate.rem_euclid(period);
    if folded < len { folded } else { period - folded }
}
