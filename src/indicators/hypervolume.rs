//! Exact and Monte-Carlo hypervolume, per spec §4.5.
//!
//! The exact computation orients every coordinate to "smaller is better"
//! (negating maximized axes) so box(p, reference) = `{x : p <= x <= reference}`
//! holds uniformly, then decomposes the union of those boxes by slicing
//! along the last axis — the classic HSO (Hypervolume by Slicing Objectives)
//! recursion. `d == 2` gets a direct sweep instead, matching spec §4.5's
//! wording; both compute the same union volume.

use rand::Rng;

use crate::direction::DirectionVector;
use crate::error::{Error, Result};
use crate::point::Point;

fn orient(p: &Point, dir: &DirectionVector) -> Vec<f64> {
    (0..p.dimensions())
        .map(|i| if dir.is_minimize(i) { p.get(i) } else { -p.get(i) })
        .collect()
}

fn check_dims(points: &[Point], reference: &Point, dir: &DirectionVector) -> Result<()> {
    let d = reference.dimensions();
    if dir.dimensions() != d {
        return Err(Error::DimensionMismatch {
            expected: d,
            actual: dir.dimensions(),
        });
    }
    for p in points {
        if p.dimensions() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                actual: p.dimensions(),
            });
        }
    }
    Ok(())
}

/// exact hypervolume of `points` against `reference`, oriented by `dir`.
pub fn exact(points: &[Point], reference: &Point, dir: &DirectionVector) -> Result<f64> {
    check_dims(points, reference, dir)?;
    if points.is_empty() {
        return Ok(0.0);
    }
    let oriented_points: Vec<Vec<f64>> = points.iter().map(|p| orient(p, dir)).collect();
    let oriented_ref = orient(reference, dir);
    Ok(if oriented_ref.len() == 2 {
        sweep_2d(&oriented_points, &oriented_ref)
    } else {
        hso(oriented_points, &oriented_ref)
    })
}

/// Monte-Carlo hypervolume estimate: fraction of `samples` uniform draws
/// from `[ideal, reference]` that some point dominates, times that box's volume.
pub fn monte_carlo(
    points: &[Point],
    ideal: &Point,
    reference: &Point,
    dir: &DirectionVector,
    samples: usize,
) -> Result<f64> {
    check_dims(points, reference, dir)?;
    if samples == 0 {
        return Err(Error::BadArgument("samples must be >= 1".to_string()));
    }
    if points.is_empty() {
        return Ok(0.0);
    }
    let oriented_points: Vec<Vec<f64>> = points.iter().map(|p| orient(p, dir)).collect();
    let oriented_ideal = orient(ideal, dir);
    let oriented_ref = orient(reference, dir);
    let d = oriented_ref.len();

    let box_volume: f64 = (0..d).map(|i| (oriented_ref[i] - oriented_ideal[i]).max(0.0)).product();
    if box_volume == 0.0 {
        return Ok(0.0);
    }

    let mut rng = rand::thread_rng();
    let mut hits = 0usize;
    for _ in 0..samples {
        let sample: Vec<f64> = (0..d)
            .map(|i| {
                let (lo, hi) = (oriented_ideal[i], oriented_ref[i]);
                if lo >= hi { lo } else { rng.gen_range(lo..hi) }
            })
            .collect();
        if oriented_points.iter().any(|p| p.iter().zip(&sample).all(|(pi, si)| *pi <= *si)) {
            hits += 1;
        }
    }
    log::trace!("hypervolume monte carlo: {hits}/{samples} samples dominated");
    Ok((hits as f64 / samples as f64) * box_volume)
}

/// direct sweep for d=2: sort the non-dominated minimal subset ascending by
/// x, accumulate rectangles against the running y from `reference`.
fn sweep_2d(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let mut minimal = non_dominated_minimal(points);
    minimal.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());
    let mut volume = 0.0;
    let mut prev_y = reference[1];
    for p in &minimal {
        volume += (reference[0] - p[0]).max(0.0) * (prev_y - p[1]).max(0.0);
        prev_y = p[1];
    }
    volume
}

/// recursive HSO: slices the union of boxes along the last axis, recursing
/// one dimension down per slab. Correct for arbitrary (possibly dominated or
/// duplicate) point sets since it computes the union volume directly rather
/// than relying on an antichain shortcut.
fn hso(mut points: Vec<Vec<f64>>, reference: &[f64]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let d = reference.len();
    if d == 1 {
        let min_x = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
        return (reference[0] - min_x).max(0.0);
    }
    let last = d - 1;
    points.sort_by(|a, b| a[last].partial_cmp(&b[last]).unwrap());

    let mut volume = 0.0;
    let mut active: Vec<Vec<f64>> = Vec::new();
    let mut idx = 0;
    while idx < points.len() {
        let v = points[idx][last];
        while idx < points.len() && points[idx][last] == v {
            active.push(points[idx][..last].to_vec());
            idx += 1;
        }
        let next_v = if idx < points.len() { points[idx][last] } else { reference[last] };
        let height = next_v - v;
        if height > 0.0 {
            volume += height * hso(active.clone(), &reference[..last]);
        }
    }
    volume
}

fn non_dominated_minimal(points: &[Vec<f64>]) -> Vec<Vec<f64>> {
    fn weakly_le(a: &[f64], b: &[f64]) -> bool {
        a.iter().zip(b).all(|(x, y)| x <= y)
    }
    let mut out: Vec<Vec<f64>> = Vec::new();
    'outer: for p in points {
        let mut keep = Vec::with_capacity(out.len());
        for q in &out {
            if q != p && weakly_le(q, p) {
                continue 'outer;
            }
            if !(p != q && weakly_le(p, q)) {
                keep.push(q.clone());
            }
        }
        keep.push(p.clone());
        out = keep;
    }
    out
}
