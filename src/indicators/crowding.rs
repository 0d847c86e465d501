//! NSGA-II crowding distance, per spec §4.5.

use crate::error::{Error, Result};
use crate::point::Point;

/// per-point crowding distance, in `points`' input order. Boundary points
/// along any axis get `+inf`; interior points accumulate
/// `(next - prev) / (max - min)` per axis.
pub fn crowding_distances(points: &[Point]) -> Result<Vec<(Point, f64)>> {
    if points.is_empty() {
        return Ok(Vec::new());
    }
    let n = points.len();
    let d = points[0].dimensions();
    let mut distances = vec![0.0f64; n];
    for dim in 0..d {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| points[a].get(dim).partial_cmp(&points[b].get(dim)).unwrap());
        let min_v = points[order[0]].get(dim);
        let max_v = points[order[n - 1]].get(dim);
        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;
        if max_v > min_v {
            for w in 1..n - 1 {
                let prev = points[order[w - 1]].get(dim);
                let next = points[order[w + 1]].get(dim);
                if distances[order[w]].is_finite() {
                    distances[order[w]] += (next - prev) / (max_v - min_v);
                }
            }
        }
    }
    Ok(points.iter().cloned().zip(distances).collect())
}

/// mean of the finite crowding distances (boundary points excluded).
pub fn average_crowding_distance(points: &[Point]) -> Result<f64> {
    let cd = crowding_distances(points)?;
    let finite: Vec<f64> = cd.iter().map(|(_, d)| *d).filter(|d| d.is_finite()).collect();
    if finite.is_empty() {
        return Err(Error::EmptyContainer);
    }
    Ok(finite.iter().sum::<f64>() / finite.len() as f64)
}
