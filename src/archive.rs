use crate::direction::DirectionVector;
use crate::error::{Error, Result};
use crate::front::Front;
use crate::indicators;
use crate::point::Point;

/// a capacity-bounded sequence of dominance layers F0, F1, ..., F_{k-1}
/// sharing a direction vector: F0 is the Pareto front of everything stored,
/// F_{j+1} is the Pareto front of what remains after removing F0..F_j.
///
/// Grounded on the same dominance-preserving insert `librallu-do-util`'s
/// `KDTreeFront` implements for a single layer, cascaded across layers the
/// way NSGA-II's non-dominated sorting builds successive fronts.
pub struct Archive<V> {
    fronts: Vec<Front<V>>,
    directions: DirectionVector,
    capacity: Option<usize>,
}

impl<V: Clone> Archive<V> {
    /// an empty, unbounded archive; directions fixed by the first insert.
    pub fn new() -> Self {
        Self {
            fronts: Vec::new(),
            directions: DirectionVector::default(),
            capacity: None,
        }
    }

    /// an empty, unbounded archive with directions fixed up front.
    pub fn with_directions(directions: DirectionVector) -> Self {
        Self {
            fronts: Vec::new(),
            directions,
            capacity: None,
        }
    }

    /// a capacity-bounded archive, `(directions, capacity)` order.
    pub fn with_directions_and_capacity(directions: DirectionVector, capacity: i64) -> Result<Self> {
        if capacity <= 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self {
            fronts: Vec::new(),
            directions,
            capacity: Some(capacity as usize),
        })
    }

    /// a capacity-bounded archive, `(capacity, directions)` order — the
    /// source accepts both argument orders (spec §9); this is the other one.
    pub fn with_capacity_and_directions(capacity: i64, directions: DirectionVector) -> Result<Self> {
        Self::with_directions_and_capacity(directions, capacity)
    }

    pub fn directions(&self) -> &DirectionVector {
        &self.directions
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// total number of stored entries across every layer.
    pub fn len(&self) -> usize {
        self.fronts.iter().map(|f| f.size()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimensions(&self) -> usize {
        self.directions.dimensions()
    }

    /// the layered fronts in dominance order: `fronts()[0]` is the Pareto front.
    pub fn fronts(&self) -> &[Front<V>] {
        &self.fronts
    }

    /// flattened view: entries of F0, then F1, etc.
    pub fn iterate(&self) -> Vec<(&Point, &V)> {
        self.fronts.iter().flat_map(|f| f.iterate()).collect()
    }

    pub fn contains(&self, p: &Point) -> bool {
        self.fronts.iter().any(|f| f.contains(p).unwrap_or(false))
    }

    /// cascading insert (spec §4.4): descend layers until one accepts `p`,
    /// recursively re-inserting anything that layer's acceptance evicts, then
    /// truncate the deepest layer if capacity is now exceeded.
    pub fn insert(&mut self, p: Point, v: V) -> Result<bool> {
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
        let inserted = self.insert_at(0, p, v)?;
        if inserted {
            self.enforce_capacity()?;
        }
        Ok(inserted)
    }

    fn insert_at(&mut self, layer: usize, p: Point, v: V) -> Result<bool> {
        if layer == self.fronts.len() {
            let mut f = Front::with_directions(self.directions.clone());
            f.insert(p, v)?;
            self.fronts.push(f);
            return Ok(true);
        }
        if self.fronts[layer].dominates(&p)? {
            return self.insert_at(layer + 1, p, v);
        }
        let evicted = self.fronts[layer]
            .insert_with_evicted(p, v)?
            .expect("layer accepts p since no stored point dominates it");
        for (victim_p, victim_v) in evicted {
            self.insert_at(layer + 1, victim_p, victim_v)?;
        }
        Ok(true)
    }

    fn enforce_capacity(&mut self) -> Result<()> {
        let cap = match self.capacity {
            Some(c) => c,
            None => return Ok(()),
        };
        while self.len() > cap {
            let deepest = self.fronts.len() - 1;
            let points: Vec<Point> = self.fronts[deepest].iterate().into_iter().map(|(p, _)| p.clone()).collect();
            let crowding = indicators::crowding::crowding_distances(&points)?;
            let victim = crowding
                .iter()
                .min_by(|(p1, d1), (p2, d2)| d1.partial_cmp(d2).unwrap().then_with(|| p1.lexicographic_cmp(p2)))
                .map(|(p, _)| p.clone())
                .expect("deepest layer is non-empty while total size exceeds capacity");
            self.fronts[deepest].erase(&victim)?;
            log::debug!("archive over capacity: evicted the most-crowded point from the deepest layer");
            if self.fronts[deepest].empty() {
                self.fronts.pop();
            }
        }
        Ok(())
    }

    /// true iff some point of F0 dominates `p` (Archive dominance relations
    /// are restricted to the Pareto front, spec §4.4).
    pub fn dominates(&self, p: &Point) -> Result<bool> {
        match self.fronts.first() {
            Some(f0) => f0.dominates(p),
            None => Ok(false),
        }
    }

    pub fn strongly_dominates(&self, p: &Point) -> Result<bool> {
        match self.fronts.first() {
            Some(f0) => f0.strongly_dominates(p),
            None => Ok(false),
        }
    }

    pub fn non_dominates(&self, p: &Point) -> Result<bool> {
        match self.fronts.first() {
            Some(f0) => f0.non_dominates(p),
            None => Ok(true),
        }
    }

    pub fn is_partially_dominated_by<W: Clone>(&self, other: &Front<W>) -> Result<bool> {
        match self.fronts.first() {
            Some(f0) => f0.is_partially_dominated_by(other),
            None => Ok(false),
        }
    }

    pub fn is_completely_dominated_by<W: Clone>(&self, other: &Front<W>) -> Result<bool> {
        match self.fronts.first() {
            Some(f0) => f0.is_completely_dominated_by(other),
            None => Ok(true),
        }
    }

    /// componentwise best coordinate over F0.
    pub fn ideal(&self) -> Result<Point> {
        self.fronts.first().ok_or(Error::EmptyContainer).and_then(|f| f.ideal())
    }

    /// componentwise worst coordinate over F0 (the Pareto-optimal layer only).
    pub fn nadir(&self) -> Result<Point> {
        self.fronts.first().ok_or(Error::EmptyContainer).and_then(|f| f.nadir())
    }

    /// componentwise worst coordinate over *every* stored entry in every
    /// layer — unlike [`Archive::nadir`], this sees the dominated points held
    /// by deeper layers.
    pub fn worst(&self) -> Result<Point> {
        if self.is_empty() {
            return Err(Error::EmptyContainer);
        }
        let d = self.directions.dimensions();
        let mut coords = Vec::with_capacity(d);
        for i in 0..d {
            let minimize = self.directions.is_minimize(i);
            let values = self.iterate().into_iter().map(|(p, _)| p.get(i));
            let v = if minimize {
                values.fold(f64::NEG_INFINITY, f64::max)
            } else {
                values.fold(f64::INFINITY, f64::min)
            };
            coords.push(v);
        }
        Ok(Point::new(coords))
    }
}

impl<V: Clone> Default for Archive<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for Archive<V> {
    fn clone(&self) -> Self {
        Self {
            fronts: self.fronts.clone(),
            directions: self.directions.clone(),
            capacity: self.capacity,
        }
    }
}
