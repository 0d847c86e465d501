use std::cmp::Ordering;

use crate::direction::DirectionVector;
use crate::dominance;
use crate::error::{Error, Result};
use crate::indicators;
use crate::point::Point;
use crate::spatial_index::SpatialIndex;

/// a spatial map that enforces mutual Pareto non-dominance: no two stored
/// points may dominate one another under `directions`.
///
/// Wraps a [`SpatialIndex`] the way `librallu-do-util`'s `KDTreeFront` wraps
/// its own tree, but keeps the dominance algebra ([`crate::dominance`])
/// separate from the tree so it generalizes to any direction vector instead
/// of the teacher's all-minimize assumption.
pub struct Front<V> {
    index: SpatialIndex<V>,
    directions: DirectionVector,
}

impl<V: Clone> Front<V> {
    /// an empty front; its dimension and directions are fixed by the first insert.
    pub fn new() -> Self {
        Self {
            index: SpatialIndex::new(),
            directions: DirectionVector::default(),
        }
    }

    /// an empty front with directions fixed up front.
    pub fn with_directions(directions: DirectionVector) -> Self {
        let d = directions.dimensions();
        Self {
            index: SpatialIndex::with_dimensions(d),
            directions,
        }
    }

    /// builds a front by inserting every entry under Pareto-preserving semantics.
    pub fn from_entries(directions: DirectionVector, entries: impl IntoIterator<Item = (Point, V)>) -> Result<Self> {
        let mut front = Self::with_directions(directions);
        for (p, v) in entries {
            front.insert(p, v)?;
        }
        Ok(front)
    }

    fn check_point_dim(&self, p: &Point) -> Result<()> {
        let d = self.directions.dimensions();
        if d != 0 && p.dimensions() != d {
            return Err(Error::DimensionMismatch {
                expected: d,
                actual: p.dimensions(),
            });
        }
        Ok(())
    }

    /// the half-space containing every point that could dominate (or be
    /// dominated by, if `!seeking_dominators`) `p`, used to narrow spatial
    /// queries before the exact dominance check.
    fn candidate_box(&self, p: &Point, seeking_dominators: bool) -> (Point, Point) {
        let d = p.dimensions();
        let mut lo = vec![f64::NEG_INFINITY; d];
        let mut hi = vec![f64::INFINITY; d];
        for i in 0..d {
            let minimize = self.directions.is_minimize(i);
            if minimize == seeking_dominators {
                hi[i] = p.get(i);
            } else {
                lo[i] = p.get(i);
            }
        }
        (Point::new(lo), Point::new(hi))
    }

    /// inserts `(p, v)` under Pareto-preserving semantics (spec §4.3):
    /// rejects `p` if some stored point dominates it, otherwise evicts every
    /// point `p` dominates and inserts. Returns whether `p` was accepted.
    pub fn insert(&mut self, p: Point, v: V) -> Result<bool> {
        Ok(self.insert_with_evicted(p, v)?.is_some())
    }

    /// like [`Front::insert`], but also returns the entries evicted in the
    /// process (empty if none), so [`crate::archive::Archive`] can cascade
    /// them into the next layer without a second dominance pass. `None` iff
    /// `p` was rejected.
    pub(crate) fn insert_with_evicted(&mut self, p: Point, v: V) -> Result<Option<Vec<(Point, V)>>> {
        let d = p.dimensions();
        if self.directions.dimensions() == 0 && d > 0 {
            self.directions = DirectionVector::all_minimize(d);
        }
        if self.directions.dimensions() != d {
            return Err(Error::DimensionMismatch {
                expected: self.directions.dimensions(),
                actual: d,
            });
        }

        if !self.index.empty() {
            let (lo, hi) = self.candidate_box(&p, true);
            let dominators = self.index.find_intersection(&lo, &hi)?;
            let is_dominated = dominators
                .iter()
                .any(|(s, _)| dominance::dominates(s.coords(), p.coords(), &self.directions));
            if is_dominated {
                return Ok(None);
            }
        }

        let evicted = if self.index.empty() {
            Vec::new()
        } else {
            let (lo, hi) = self.candidate_box(&p, false);
            let victims = self.index.find_intersection(&lo, &hi)?;
            let dominated_points: Vec<Point> = victims
                .into_iter()
                .filter(|(s, _)| dominance::dominates(p.coords(), s.coords(), &self.directions))
                .map(|(s, _)| s.clone())
                .collect();
            let mut out = Vec::with_capacity(dominated_points.len());
            for victim in dominated_points {
                let value = self.index.lookup(&victim)?.clone();
                self.index.erase(&victim)?;
                out.push((victim, value));
            }
            out
        };

        self.index.insert(p, v)?;
        if !evicted.is_empty() {
            log::trace!("front insert evicted {} dominated point(s)", evicted.len());
        }
        Ok(Some(evicted))
    }

    pub fn erase(&mut self, p: &Point) -> Result<usize> {
        self.index.erase(p)
    }

    pub fn contains(&self, p: &Point) -> Result<bool> {
        self.index.contains(p)
    }

    pub fn lookup(&self, p: &Point) -> Result<&V> {
        self.index.lookup(p)
    }

    pub fn size(&self) -> usize {
        self.index.size()
    }

    pub fn empty(&self) -> bool {
        self.index.empty()
    }

    pub fn dimensions(&self) -> usize {
        self.index.dimensions()
    }

    pub fn directions(&self) -> &DirectionVector {
        &self.directions
    }

    pub fn min_value(&self, i: usize) -> Result<f64> {
        self.index.min_value(i)
    }

    pub fn max_value(&self, i: usize) -> Result<f64> {
        self.index.max_value(i)
    }

    pub fn iterate(&self) -> Vec<(&Point, &V)> {
        self.index.iterate()
    }

    pub fn reverse_iterate(&self) -> Vec<(&Point, &V)> {
        self.index.reverse_iterate()
    }

    pub fn find_intersection(&self, lo: &Point, hi: &Point) -> Result<Vec<(&Point, &V)>> {
        self.index.find_intersection(lo, hi)
    }

    pub fn find_within(&self, lo: &Point, hi: &Point) -> Result<Vec<(&Point, &V)>> {
        self.index.find_within(lo, hi)
    }

    pub fn find_disjoint(&self, lo: &Point, hi: &Point) -> Result<Vec<(&Point, &V)>> {
        self.index.find_disjoint(lo, hi)
    }

    pub fn find_nearest(&self, q: &Point, k: usize) -> Result<Vec<(&Point, &V)>> {
        self.index.find_nearest(q, k)
    }

    pub fn get_nearest(&self, q: &Point) -> Result<(&Point, &V)> {
        self.index.get_nearest(q)
    }

    /// true iff some stored point dominates `p`.
    pub fn dominates(&self, p: &Point) -> Result<bool> {
        self.check_point_dim(p)?;
        if self.index.empty() {
            return Ok(false);
        }
        let (lo, hi) = self.candidate_box(p, true);
        let candidates = self.index.find_intersection(&lo, &hi)?;
        Ok(candidates
            .iter()
            .any(|(s, _)| dominance::dominates(s.coords(), p.coords(), &self.directions)))
    }

    /// true iff some stored point strongly dominates `p`.
    pub fn strongly_dominates(&self, p: &Point) -> Result<bool> {
        self.check_point_dim(p)?;
        if self.index.empty() {
            return Ok(false);
        }
        let (lo, hi) = self.candidate_box(p, true);
        let candidates = self.index.find_intersection(&lo, &hi)?;
        Ok(candidates
            .iter()
            .any(|(s, _)| dominance::strongly_dominates(s.coords(), p.coords(), &self.directions)))
    }

    /// every stored point that `p` dominates.
    pub fn find_dominated(&self, p: &Point) -> Result<Vec<(&Point, &V)>> {
        self.check_point_dim(p)?;
        if self.index.empty() {
            return Ok(Vec::new());
        }
        let (lo, hi) = self.candidate_box(p, false);
        let candidates = self.index.find_intersection(&lo, &hi)?;
        Ok(candidates
            .into_iter()
            .filter(|(s, _)| dominance::dominates(p.coords(), s.coords(), &self.directions))
            .collect())
    }

    /// true iff no stored point dominates `p` and `p` dominates no stored point.
    pub fn non_dominates(&self, p: &Point) -> Result<bool> {
        Ok(!self.dominates(p)? && self.find_dominated(p)?.is_empty())
    }

    /// true iff some point of `other` dominates some point of `self`.
    pub fn is_partially_dominated_by<W: Clone>(&self, other: &Front<W>) -> Result<bool> {
        for (s, _) in self.index.iterate() {
            if other.dominates(s)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// true iff every point of `self` is dominated by some point of `other`.
    pub fn is_completely_dominated_by<W: Clone>(&self, other: &Front<W>) -> Result<bool> {
        for (s, _) in self.index.iterate() {
            if !other.dominates(s)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn extremum(&self, best: bool) -> Result<Point> {
        let d = self.index.dimensions();
        let mut coords = Vec::with_capacity(d);
        for i in 0..d {
            let minimize = self.directions.is_minimize(i);
            let want_min = minimize == best;
            let v = if want_min { self.index.min_value(i)? } else { self.index.max_value(i)? };
            coords.push(v);
        }
        Ok(Point::new(coords))
    }

    fn extremum_element(&self, i: usize, best: bool) -> Result<(&Point, &V)> {
        if self.index.empty() {
            return Err(Error::EmptyContainer);
        }
        let d = self.index.dimensions();
        if i >= d {
            return Err(Error::BadArgument(format!(
                "dimension {i} out of range for a {d}-dimensional front"
            )));
        }
        let minimize = self.directions.is_minimize(i);
        let want_min = minimize == best;
        let mut entries = self.index.iterate();
        entries.sort_by(|(p1, _), (p2, _)| {
            let by_axis = if want_min {
                p1.get(i).partial_cmp(&p2.get(i)).unwrap()
            } else {
                p2.get(i).partial_cmp(&p1.get(i)).unwrap()
            };
            by_axis.then_with(|| p1.lexicographic_cmp(p2))
        });
        Ok(entries.into_iter().next().expect("non-empty front has an extremum element"))
    }

    /// componentwise best coordinate (min on a minimized axis, max on a maximized one).
    pub fn ideal(&self) -> Result<Point> {
        self.extremum(true)
    }

    /// componentwise worst coordinate among the stored (Pareto-optimal) points.
    pub fn nadir(&self) -> Result<Point> {
        self.extremum(false)
    }

    /// for a Front, coincides with [`Front::nadir`] — every stored point is
    /// already Pareto-optimal, so there is no dominated remainder to widen
    /// the box with. [`crate::archive::Archive::worst`] differs.
    pub fn worst(&self) -> Result<Point> {
        self.nadir()
    }

    pub fn ideal_element(&self, i: usize) -> Result<(&Point, &V)> {
        self.extremum_element(i, true)
    }

    pub fn nadir_element(&self, i: usize) -> Result<(&Point, &V)> {
        self.extremum_element(i, false)
    }

    pub fn worst_element(&self, i: usize) -> Result<(&Point, &V)> {
        self.nadir_element(i)
    }

    fn points(&self) -> Vec<Point> {
        self.index.iterate().into_iter().map(|(p, _)| p.clone()).collect()
    }

    /// exact hypervolume against `reference` (defaults to [`Front::nadir`]).
    pub fn hypervolume(&self, reference: Option<&Point>) -> Result<f64> {
        let r = self.resolve_reference(reference)?;
        indicators::hypervolume::exact(&self.points(), &r, &self.directions)
    }

    /// Monte-Carlo hypervolume estimate using `samples` uniform draws.
    pub fn hypervolume_monte_carlo(&self, reference: Option<&Point>, samples: usize) -> Result<f64> {
        let r = self.resolve_reference(reference)?;
        let ideal = self.ideal()?;
        indicators::hypervolume::monte_carlo(&self.points(), &ideal, &r, &self.directions, samples)
    }

    fn resolve_reference(&self, reference: Option<&Point>) -> Result<Point> {
        match reference {
            Some(r) => Ok(r.clone()),
            None => self.nadir(),
        }
    }

    /// fraction of `other`'s points dominated by some point of `self`.
    pub fn coverage<W: Clone>(&self, other: &Front<W>) -> Result<f64> {
        indicators::coverage::coverage(&self.points(), &other.points(), &self.directions)
    }

    /// `coverage(self, other) / coverage(other, self)`, with `0/0 -> 0` and `x/0 -> +inf`.
    pub fn coverage_ratio<W: Clone>(&self, other: &Front<W>) -> Result<f64> {
        indicators::coverage::coverage_ratio(&self.points(), &other.points(), &self.directions)
    }

    pub fn generational_distance(&self, reference: &[Point]) -> Result<f64> {
        indicators::distance::gd(&self.points(), reference)
    }

    pub fn inverted_generational_distance(&self, reference: &[Point]) -> Result<f64> {
        indicators::distance::gd(reference, &self.points())
    }

    pub fn inverted_generational_distance_plus(&self, reference: &[Point]) -> Result<f64> {
        indicators::distance::igd_plus(&self.points(), reference, &self.directions)
    }

    pub fn std_generational_distance(&self, reference: &[Point]) -> Result<f64> {
        indicators::distance::std_gd(&self.points(), reference)
    }

    pub fn std_inverted_generational_distance(&self, reference: &[Point]) -> Result<f64> {
        indicators::distance::std_gd(reference, &self.points())
    }

    pub fn std_inverted_generational_distance_plus(&self, reference: &[Point]) -> Result<f64> {
        indicators::distance::std_igd_plus(&self.points(), reference, &self.directions)
    }

    pub fn hausdorff_distance(&self, reference: &[Point]) -> Result<f64> {
        indicators::distance::hausdorff(&self.points(), reference)
    }

    /// minimum pairwise distance among stored points.
    pub fn uniformity(&self) -> Result<f64> {
        indicators::distance::uniformity(&self.points())
    }

    pub fn average_distance(&self) -> Result<f64> {
        indicators::distance::average_distance(&self.points())
    }

    pub fn average_nearest_distance(&self, k: usize) -> Result<f64> {
        indicators::distance::average_nearest_distance(&self.points(), k)
    }

    /// per-point NSGA-II crowding distance, in the front's iteration order.
    pub fn crowding_distances(&self) -> Result<Vec<(Point, f64)>> {
        indicators::crowding::crowding_distances(&self.points())
    }

    pub fn average_crowding_distance(&self) -> Result<f64> {
        indicators::crowding::average_crowding_distance(&self.points())
    }

    pub fn direct_conflict(&self, i: usize, j: usize) -> Result<f64> {
        indicators::conflict::direct_conflict(&self.points(), i, j)
    }

    pub fn maxmin_conflict(&self, i: usize, j: usize) -> Result<f64> {
        indicators::conflict::maxmin_conflict(&self.points(), i, j)
    }

    pub fn nonparametric_conflict(&self, i: usize, j: usize) -> Result<f64> {
        indicators::conflict::nonparametric_conflict(&self.points(), i, j)
    }

    pub fn normalized_direct_conflict(&self, i: usize, j: usize) -> Result<f64> {
        indicators::conflict::normalized_direct_conflict(&self.points(), i, j)
    }

    pub fn normalized_maxmin_conflict(&self, i: usize, j: usize) -> Result<f64> {
        indicators::conflict::normalized_maxmin_conflict(&self.points(), i, j)
    }

    pub fn normalized_nonparametric_conflict(&self, i: usize, j: usize) -> Result<f64> {
        indicators::conflict::normalized_nonparametric_conflict(&self.points(), i, j)
    }
}

impl<V: Clone> Default for Front<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for Front<V> {
    fn clone(&self) -> Self {
        Self {
            index: self.index.clone(),
            directions: self.directions.clone(),
        }
    }
}

impl<V: Clone + PartialEq> PartialEq for Front<V> {
    fn eq(&self, other: &Self) -> bool {
        if self.directions != other.directions {
            return false;
        }
        if self.index.size() != other.index.size() {
            return false;
        }
        self.index.iterate().into_iter().all(|(p, v)| match other.index.lookup(p) {
            Ok(ov) => ov == v,
            Err(_) => false,
        })
    }
}

impl<V: Clone + PartialEq> PartialOrd for Front<V> {
    /// `A < B` iff `A` dominates `B` at the set level (spec §4.3): every
    /// point of `B` is dominated by some point of `A`, and `A != B`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            return Some(Ordering::Equal);
        }
        let a_dominates_b = other.is_completely_dominated_by(self).unwrap_or(false);
        let b_dominates_a = self.is_completely_dominated_by(other).unwrap_or(false);
        match (a_dominates_b, b_dominates_a) {
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pt(coords: &[f64]) -> Point {
        Point::new(coords.to_vec())
    }

    #[test]
    fn scenario_2d_minimize_maximize() {
        let mut f = Front::with_directions(DirectionVector::new(vec![true, false]));
        f.insert(pt(&[0.68322, 0.545438]), 17).unwrap();
        f.insert(pt(&[-0.204484, 0.819538]), 8).unwrap();
        f.insert(pt(&[1.10158, 0.977164]), 36).unwrap();
        f.insert(pt(&[-2.01773, -1.25209]), 27).unwrap();
        assert_eq!(f.size(), 4);
        let ideal = f.ideal().unwrap();
        assert!((ideal.get(0) - (-2.01773)).abs() < 1e-9);
        assert!((ideal.get(1) - 0.977164).abs() < 1e-9);
        let nadir = f.nadir().unwrap();
        assert!((nadir.get(0) - 1.10158).abs() < 1e-9);
        assert!((nadir.get(1) - (-1.25209)).abs() < 1e-9);
        assert!(!f.dominates(&pt(&[1.0, 1.0])).unwrap());
        assert!(!f.is_completely_dominated_by(&Front::from_entries(
            DirectionVector::new(vec![true, false]),
            vec![(pt(&[1.0, 1.0]), 0)]
        ).unwrap()).unwrap());
    }

    #[test]
    fn pareto_rejection() {
        let mut f: Front<i32> = Front::with_directions(DirectionVector::all_minimize(2));
        assert!(f.insert(pt(&[1.0, 1.0]), 1).unwrap());
        assert!(!f.insert(pt(&[2.0, 2.0]), 2).unwrap());
        assert_eq!(f.size(), 1);
    }

    #[test]
    fn pareto_eviction() {
        let mut f: Front<i32> = Front::with_directions(DirectionVector::all_minimize(2));
        f.insert(pt(&[2.0, 2.0]), 1).unwrap();
        f.insert(pt(&[3.0, 1.0]), 2).unwrap();
        f.insert(pt(&[1.0, 3.0]), 3).unwrap();
        assert_eq!(f.size(), 3);
        f.insert(pt(&[0.0, 0.0]), 4).unwrap();
        assert_eq!(f.size(), 1);
        assert!(f.contains(&pt(&[0.0, 0.0])).unwrap());
    }

    #[test]
    fn insert_with_evicted_reports_victims() {
        let mut f: Front<i32> = Front::with_directions(DirectionVector::all_minimize(2));
        f.insert(pt(&[2.0, 2.0]), 1).unwrap();
        f.insert(pt(&[3.0, 1.0]), 2).unwrap();
        let evicted = f.insert_with_evicted(pt(&[1.0, 1.0]), 3).unwrap().unwrap();
        assert_eq!(evicted.len(), 2);
    }

    #[test]
    fn equality_is_multiset_and_directions() {
        let dir = DirectionVector::all_minimize(2);
        let a = Front::from_entries(dir.clone(), vec![(pt(&[1.0, 2.0]), 1), (pt(&[2.0, 1.0]), 2)]).unwrap();
        let b = Front::from_entries(dir, vec![(pt(&[2.0, 1.0]), 2), (pt(&[1.0, 2.0]), 1)]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ordering_reflects_set_level_dominance() {
        let dir = DirectionVector::all_minimize(2);
        let a = Front::from_entries(dir.clone(), vec![(pt(&[0.0, 0.0]), 1)]).unwrap();
        let b = Front::from_entries(dir, vec![(pt(&[1.0, 1.0]), 2)]).unwrap();
        assert!(a < b);
        assert!(!(b < a));
    }

    #[test]
    fn extremum_element_ties_break_lexicographically() {
        let mut f: Front<i32> = Front::with_directions(DirectionVector::all_minimize(2));
        f.insert(pt(&[0.0, 5.0]), 1).unwrap();
        f.insert(pt(&[0.0, 1.0]), 2).unwrap();
        let (p, v) = f.ideal_element(0).unwrap();
        assert_eq!(p.coords(), &[0.0, 1.0]);
        assert_eq!(*v, 2);
    }

    #[test]
    fn empty_front_extremum_is_empty_container() {
        let f: Front<i32> = Front::with_directions(DirectionVector::all_minimize(2));
        assert_eq!(f.ideal().unwrap_err(), Error::EmptyContainer);
    }

    #[test]
    fn dimension_mismatch_on_insert() {
        let mut f: Front<i32> = Front::with_directions(DirectionVector::all_minimize(2));
        f.insert(pt(&[1.0, 1.0]), 1).unwrap();
        let err = f.insert(pt(&[1.0, 1.0, 1.0]), 2).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 2, actual: 3 });
    }
}
