//! Set coverage C(A,B), per spec §4.5.

use crate::direction::DirectionVector;
use crate::dominance;
use crate::error::Result;
use crate::point::Point;

/// fraction of `b` weakly dominated by some point of `a`. Not symmetric.
///
/// Uses weak dominance (rather than strict) so that `C(A, A) = 1` for any
/// non-empty `A`: every point of `A` is itself a witness for its own
/// membership.
pub fn coverage(a: &[Point], b: &[Point], dir: &DirectionVector) -> Result<f64> {
    if b.is_empty() {
        return Ok(0.0);
    }
    let dominated = b
        .iter()
        .filter(|bp| a.iter().any(|ap| dominance::weakly_dominates(ap.coords(), bp.coords(), dir)))
        .count();
    Ok(dominated as f64 / b.len() as f64)
}

/// `coverage(a,b) / coverage(b,a)`, with `0/0 -> 0` and `x/0 -> +inf`.
pub fn coverage_ratio(a: &[Point], b: &[Point], dir: &DirectionVector) -> Result<f64> {
    let c_ab = coverage(a, b, dir)?;
    let c_ba = coverage(b, a, dir)?;
    Ok(if c_ba == 0.0 {
        if c_ab == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        c_ab / c_ba
    })
}
