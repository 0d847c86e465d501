//! Objective conflict metrics, per spec §4.5.

use crate::error::{Error, Result};
use crate::point::Point;

fn check_axes(points: &[Point], i: usize, j: usize) -> Result<()> {
    if points.is_empty() {
        return Err(Error::EmptyContainer);
    }
    let d = points[0].dimensions();
    if i >= d || j >= d {
        return Err(Error::BadArgument(format!(
            "axis out of range for {d}-dimensional points: i={i}, j={j}"
        )));
    }
    Ok(())
}

fn column(points: &[Point], dim: usize) -> Vec<f64> {
    points.iter().map(|p| p.get(dim)).collect()
}

fn min_max_raw(values: &[f64]) -> (f64, f64) {
    (
        values.iter().cloned().fold(f64::INFINITY, f64::min),
        values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    )
}

fn rescale_unit(values: &[f64]) -> Vec<f64> {
    let (min, max) = min_max_raw(values);
    if max > min {
        values.iter().map(|v| (v - min) / (max - min)).collect()
    } else {
        vec![0.0; values.len()]
    }
}

fn ranks_raw(values: &[f64]) -> Vec<usize> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap());
    let mut rank = vec![0usize; n];
    for (r, &idx) in order.iter().enumerate() {
        rank[idx] = r + 1;
    }
    rank
}

fn direct_conflict_raw(xi: &[f64], xj: &[f64]) -> f64 {
    xi.iter().zip(xj).map(|(a, b)| a - b).sum::<f64>().abs()
}

fn maxmin_conflict_raw(xi: &[f64], xj: &[f64]) -> f64 {
    let (min_i, max_i) = min_max_raw(xi);
    let (min_j, max_j) = min_max_raw(xj);
    (max_i - min_i) - (max_j - min_j)
}

fn nonparametric_conflict_raw(xi: &[f64], xj: &[f64]) -> f64 {
    let ri = ranks_raw(xi);
    let rj = ranks_raw(xj);
    ri.iter().zip(&rj).map(|(a, b)| (*a as f64 - *b as f64).abs()).sum()
}

/// maximum attainable Spearman footrule distance for `n` ranked points
/// (reversed permutations), `floor(n^2 / 2)`.
fn max_footrule(n: usize) -> f64 {
    ((n * n) / 2) as f64
}

/// `|sum_k (x_ki - x_kj)|`.
pub fn direct_conflict(points: &[Point], i: usize, j: usize) -> Result<f64> {
    check_axes(points, i, j)?;
    Ok(direct_conflict_raw(&column(points, i), &column(points, j)))
}

/// `(max_k x_ki - min_k x_ki) - (max_k x_kj - min_k x_kj)`.
pub fn maxmin_conflict(points: &[Point], i: usize, j: usize) -> Result<f64> {
    check_axes(points, i, j)?;
    Ok(maxmin_conflict_raw(&column(points, i), &column(points, j)))
}

/// Spearman footrule distance between the per-point ranks along axes `i` and `j`.
pub fn nonparametric_conflict(points: &[Point], i: usize, j: usize) -> Result<f64> {
    check_axes(points, i, j)?;
    Ok(nonparametric_conflict_raw(&column(points, i), &column(points, j)))
}

/// [`direct_conflict`] after rescaling both axes to `[0, 1]`, divided by the
/// maximum value attainable by `n` points (`n`, one unit of disagreement per point).
pub fn normalized_direct_conflict(points: &[Point], i: usize, j: usize) -> Result<f64> {
    check_axes(points, i, j)?;
    let n = points.len();
    let xi = rescale_unit(&column(points, i));
    let xj = rescale_unit(&column(points, j));
    Ok(direct_conflict_raw(&xi, &xj) / n as f64)
}

/// [`maxmin_conflict`] after rescaling both axes to `[0, 1]` (already bounded to `[-1, 1]`).
pub fn normalized_maxmin_conflict(points: &[Point], i: usize, j: usize) -> Result<f64> {
    check_axes(points, i, j)?;
    let xi = rescale_unit(&column(points, i));
    let xj = rescale_unit(&column(points, j));
    Ok(maxmin_conflict_raw(&xi, &xj))
}

/// [`nonparametric_conflict`] divided by the maximum footrule distance attainable
/// for `n` points.
pub fn normalized_nonparametric_conflict(points: &[Point], i: usize, j: usize) -> Result<f64> {
    check_axes(points, i, j)?;
    let max = max_footrule(points.len());
    if max == 0.0 {
        return Ok(0.0);
    }
    Ok(nonparametric_conflict_raw(&column(points, i), &column(points, j)) / max)
}

#[cfg(test)]
mod test {
    use super::*;

    fn pt(c: &[f64]) -> Point {
        Point::new(c.to_vec())
    }

    #[test]
    fn direct_conflict_of_identical_axes_is_zero() {
        let points = vec![pt(&[1.0, 1.0]), pt(&[2.0, 2.0]), pt(&[3.0, 3.0])];
        assert_eq!(direct_conflict(&points, 0, 1).unwrap(), 0.0);
    }

    #[test]
    fn direct_conflict_of_mirrored_axes() {
        let points = vec![pt(&[0.0, 3.0]), pt(&[1.0, 2.0]), pt(&[2.0, 1.0]), pt(&[3.0, 0.0])];
        // sum (x0-x1) = (0-3)+(1-2)+(2-1)+(3-0) = -3-1+1+3 = 0
        assert_eq!(direct_conflict(&points, 0, 1).unwrap(), 0.0);
    }

    #[test]
    fn maxmin_conflict_of_equal_spread_axes_is_zero() {
        let points = vec![pt(&[0.0, 10.0]), pt(&[5.0, 15.0])];
        assert_eq!(maxmin_conflict(&points, 0, 1).unwrap(), 0.0);
    }

    #[test]
    fn nonparametric_conflict_of_identical_ranking_is_zero() {
        let points = vec![pt(&[1.0, 10.0]), pt(&[2.0, 20.0]), pt(&[3.0, 30.0])];
        assert_eq!(nonparametric_conflict(&points, 0, 1).unwrap(), 0.0);
    }

    #[test]
    fn nonparametric_conflict_of_reversed_ranking_is_maximal() {
        let points = vec![pt(&[1.0, 3.0]), pt(&[2.0, 2.0]), pt(&[3.0, 1.0])];
        let v = nonparametric_conflict(&points, 0, 1).unwrap();
        let normalized = normalized_nonparametric_conflict(&points, 0, 1).unwrap();
        assert_eq!(normalized, 1.0);
        assert_eq!(v, (points.len() * points.len() / 2) as f64);
    }

    #[test]
    fn axis_out_of_range_is_bad_argument() {
        let points = vec![pt(&[1.0, 1.0])];
        assert!(matches!(direct_conflict(&points, 0, 5), Err(Error::BadArgument(_))));
    }
}
