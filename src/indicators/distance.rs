//! Generational-distance family, Hausdorff, uniformity and neighbor-distance
//! indicators, per spec §4.5.

use crate::direction::DirectionVector;
use crate::error::{Error, Result};
use crate::point::Point;

fn euclid_dist_sq(a: &Point, b: &Point) -> f64 {
    a.coords().iter().zip(b.coords()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn min_sq_distances(from: &[Point], to: &[Point]) -> Result<Vec<f64>> {
    if from.is_empty() || to.is_empty() {
        return Err(Error::EmptyContainer);
    }
    Ok(from
        .iter()
        .map(|f| to.iter().map(|t| euclid_dist_sq(f, t)).fold(f64::INFINITY, f64::min))
        .collect())
}

fn sample_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n < 2.0 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    var.sqrt()
}

/// `GD(from, to) = sqrt(sum of squared nearest-distances from `from` to `to`) / |from|`.
/// `IGD(S, S*)` is obtained by calling this with the arguments swapped.
pub fn gd(from: &[Point], to: &[Point]) -> Result<f64> {
    let sq = min_sq_distances(from, to)?;
    Ok(sq.iter().sum::<f64>().sqrt() / from.len() as f64)
}

/// sample standard deviation of the per-point nearest-distances GD averages.
pub fn std_gd(from: &[Point], to: &[Point]) -> Result<f64> {
    let distances: Vec<f64> = min_sq_distances(from, to)?.iter().map(|d| d.sqrt()).collect();
    Ok(sample_std(&distances))
}

/// dominance-aware squared distance from candidate `a` to reference point
/// `b`: each oriented axis contributes 0 when `a` is at least as good as `b`.
fn plus_dist_sq(a: &Point, b: &Point, dir: &DirectionVector) -> f64 {
    (0..a.dimensions())
        .map(|i| {
            let orient = |p: &Point| if dir.is_minimize(i) { p.get(i) } else { -p.get(i) };
            let diff = (orient(a) - orient(b)).max(0.0);
            diff * diff
        })
        .sum()
}

/// IGD+: like IGD, but using the dominance-aware distance instead of plain Euclidean.
pub fn igd_plus(s: &[Point], s_star: &[Point], dir: &DirectionVector) -> Result<f64> {
    if s.is_empty() || s_star.is_empty() {
        return Err(Error::EmptyContainer);
    }
    let sum_sq: f64 = s_star
        .iter()
        .map(|v| s.iter().map(|u| plus_dist_sq(u, v, dir)).fold(f64::INFINITY, f64::min))
        .sum();
    Ok(sum_sq.sqrt() / s_star.len() as f64)
}

pub fn std_igd_plus(s: &[Point], s_star: &[Point], dir: &DirectionVector) -> Result<f64> {
    if s.is_empty() || s_star.is_empty() {
        return Err(Error::EmptyContainer);
    }
    let distances: Vec<f64> = s_star
        .iter()
        .map(|v| s.iter().map(|u| plus_dist_sq(u, v, dir)).fold(f64::INFINITY, f64::min).sqrt())
        .collect();
    Ok(sample_std(&distances))
}

/// `max(GD(s, s_star), GD(s_star, s))`.
pub fn hausdorff(s: &[Point], s_star: &[Point]) -> Result<f64> {
    Ok(gd(s, s_star)?.max(gd(s_star, s)?))
}

/// minimum pairwise distance among `points`.
pub fn uniformity(points: &[Point]) -> Result<f64> {
    if points.len() < 2 {
        return Err(Error::EmptyContainer);
    }
    let mut min_d = f64::INFINITY;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            min_d = min_d.min(euclid_dist_sq(&points[i], &points[j]).sqrt());
        }
    }
    Ok(min_d)
}

/// mean pairwise distance among `points`.
pub fn average_distance(points: &[Point]) -> Result<f64> {
    if points.len() < 2 {
        return Err(Error::EmptyContainer);
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            sum += euclid_dist_sq(&points[i], &points[j]).sqrt();
            count += 1;
        }
    }
    Ok(sum / count as f64)
}

/// for each point, mean distance to its `k` nearest neighbors (excluding
/// itself), then mean across points.
pub fn average_nearest_distance(points: &[Point], k: usize) -> Result<f64> {
    if k < 1 {
        return Err(Error::BadArgument(format!("k must be >= 1, got {k}")));
    }
    if points.len() <= k {
        return Err(Error::BadArgument(format!(
            "need more than k={k} points, have {}",
            points.len()
        )));
    }
    let mut per_point_means = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let mut dists: Vec<f64> = (0..points.len())
            .filter(|&j| j != i)
            .map(|j| euclid_dist_sq(&points[i], &points[j]).sqrt())
            .collect();
        dists.sort_by(|a, b| a.partial_cmp(b).unwrap());
        per_point_means.push(dists[..k].iter().sum::<f64>() / k as f64);
    }
    Ok(per_point_means.iter().sum::<f64>() / per_point_means.len() as f64)
}

#[cfg(test)]
mod test {
    use super::*;

    fn pt(c: &[f64]) -> Point {
        Point::new(c.to_vec())
    }

    #[test]
    fn gd_is_zero_when_sets_match() {
        let s = vec![pt(&[0.0, 0.0]), pt(&[1.0, 1.0])];
        assert_eq!(gd(&s, &s).unwrap(), 0.0);
    }

    #[test]
    fn gd_and_igd_can_differ() {
        let s = vec![pt(&[0.0, 0.0])];
        let s_star = vec![pt(&[0.0, 0.0]), pt(&[10.0, 10.0])];
        let gd_v = gd(&s, &s_star).unwrap();
        let igd_v = gd(&s_star, &s).unwrap();
        assert!(gd_v < igd_v);
    }

    #[test]
    fn igd_plus_ignores_improvement_past_reference() {
        let dir = DirectionVector::all_minimize(2);
        // s dominates s_star's only point on both axes: dominance-aware distance is 0.
        let s = vec![pt(&[0.0, 0.0])];
        let s_star = vec![pt(&[1.0, 1.0])];
        assert_eq!(igd_plus(&s, &s_star, &dir).unwrap(), 0.0);
    }

    #[test]
    fn hausdorff_is_symmetric_max() {
        let s = vec![pt(&[0.0, 0.0])];
        let s_star = vec![pt(&[0.0, 0.0]), pt(&[3.0, 4.0])];
        assert_eq!(hausdorff(&s, &s_star).unwrap(), hausdorff(&s_star, &s).unwrap());
    }

    #[test]
    fn uniformity_is_min_pairwise_distance() {
        let points = vec![pt(&[0.0, 0.0]), pt(&[1.0, 0.0]), pt(&[5.0, 0.0])];
        assert_eq!(uniformity(&points).unwrap(), 1.0);
    }

    #[test]
    fn average_nearest_distance_rejects_too_few_points() {
        let points = vec![pt(&[0.0, 0.0]), pt(&[1.0, 0.0])];
        assert!(matches!(average_nearest_distance(&points, 2), Err(Error::BadArgument(_))));
    }

    #[test]
    fn average_nearest_distance_k1_matches_closest_neighbor() {
        let points = vec![pt(&[0.0, 0.0]), pt(&[1.0, 0.0]), pt(&[3.0, 0.0])];
        // point 0's nearest is point 1 (dist 1), point 1's nearest is point 0 (dist 1),
        // point 2's nearest is point 1 (dist 2).
        let avg = average_nearest_distance(&points, 1).unwrap();
        assert!((avg - (1.0 + 1.0 + 2.0) / 3.0).abs() < 1e-9);
    }
}
