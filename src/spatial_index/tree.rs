use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::point::Point;

use super::node::{Entry, Link, Node};

/// once the tree has doubled in size since the last full rebuild, the next
/// insert triggers a rebalance. A simple, deterministic proxy for "skew
/// exceeds a threshold" (spec §4.2).
const SKEW_REBUILD_FACTOR: usize = 2;
/// below this size a rebuild isn't worth the O(n) cost.
const MIN_REBUILD_SIZE: usize = 16;

/// a dynamic point-to-value container over R^d.
///
/// Backed by an incremental k-d-tree generalizing
/// `librallu-do-util`'s `pareto_pq::kd_tree::KDTreeFront` from a
/// const-generic dimension to a dimension fixed at construction time (or
/// inferred from the first insert). Every query materializes its results
/// into a `Vec` borrowing `self`, so the borrow checker enforces the
/// documented "finish reading before mutating" invalidation rule (spec §5).
pub struct SpatialIndex<V> {
    dim: Option<usize>,
    root: Link<V>,
    size: usize,
    next_insertion_index: u64,
    bounds_cache: RefCell<Option<Vec<(f64, f64)>>>,
    size_at_last_rebuild: usize,
}

impl<V> Default for SpatialIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SpatialIndex<V> {
    /// an empty index whose dimension will be fixed by the first `insert`.
    pub fn new() -> Self {
        Self {
            dim: None,
            root: None,
            size: 0,
            next_insertion_index: 0,
            bounds_cache: RefCell::new(None),
            size_at_last_rebuild: 0,
        }
    }

    /// an empty index with a dimension fixed up front.
    pub fn with_dimensions(d: usize) -> Self {
        Self {
            dim: Some(d),
            ..Self::new()
        }
    }

    /// the fixed dimension, or 0 if not yet determined.
    pub fn dimensions(&self) -> usize {
        self.dim.unwrap_or(0)
    }

    /// number of stored entries.
    pub fn size(&self) -> usize {
        self.size
    }

    /// true iff no entries are stored.
    pub fn empty(&self) -> bool {
        self.size == 0
    }

    fn check_dim(&self, p: &Point) -> Result<()> {
        if let Some(d) = self.dim {
            if p.dimensions() != d {
                return Err(Error::DimensionMismatch {
                    expected: d,
                    actual: p.dimensions(),
                });
            }
        }
        Ok(())
    }

    fn check_box_dims(&self, lo: &Point, hi: &Point) -> Result<()> {
        if lo.dimensions() != hi.dimensions() {
            return Err(Error::DimensionMismatch {
                expected: lo.dimensions(),
                actual: hi.dimensions(),
            });
        }
        self.check_dim(lo)
    }

    /// inserts (or replaces the value at) `p`. Returns `true` iff `p` was a
    /// new key.
    pub fn insert(&mut self, p: Point, v: V) -> Result<bool> {
        let d = match self.dim {
            Some(d) => {
                if p.dimensions() != d {
                    return Err(Error::DimensionMismatch {
                        expected: d,
                        actual: p.dimensions(),
                    });
                }
                d
            }
            None => {
                let d = p.dimensions();
                self.dim = Some(d);
                d
            }
        };
        {
            let (slot, found_dim) = Self::rec_search_mut(&mut self.root, &p, 0, d);
            if found_dim.is_some() {
                slot.as_mut().unwrap().entry_mut().value = v;
                return Ok(false);
            }
        }
        let insertion_index = self.next_insertion_index;
        self.next_insertion_index += 1;
        let entry = Entry {
            point: p.clone(),
            value: v,
            insertion_index,
        };
        Self::rec_insert(&mut self.root, entry, 0, d);
        self.size += 1;
        self.widen_bounds_cache(&p);
        self.maybe_rebuild();
        Ok(true)
    }

    /// removes the entry at `p`, if present. Returns the number removed (0 or 1).
    pub fn erase(&mut self, p: &Point) -> Result<usize> {
        self.check_dim(p)?;
        let d = match self.dim {
            Some(d) => d,
            None => return Ok(0),
        };
        let (slot, found_dim) = Self::rec_search_mut(&mut self.root, p, 0, d);
        match found_dim {
            None => Ok(0),
            Some(dim) => {
                let removed = Self::remove_link(slot, dim, d);
                if removed.is_some() {
                    self.size -= 1;
                    // bounds may have become stale-narrow at the index level; mark dirty.
                    *self.bounds_cache.borrow_mut() = None;
                    log::trace!("erased point, spatial index size now {}", self.size);
                }
                Ok(removed.is_some() as usize)
            }
        }
    }

    /// true iff `p` is stored.
    pub fn contains(&self, p: &Point) -> Result<bool> {
        self.check_dim(p)?;
        Ok(self.find_node(p).is_some())
    }

    /// the value stored at `p`. Fails with [`Error::NotFound`] if absent.
    pub fn lookup(&self, p: &Point) -> Result<&V> {
        self.check_dim(p)?;
        self.find_node(p)
            .map(|n| &n.entry().value)
            .ok_or(Error::NotFound)
    }

    fn find_node(&self, p: &Point) -> Option<&Node<V>> {
        let d = self.dim?;
        Self::rec_find(&self.root, p, 0, d)
    }

    fn ensure_bounds_cache(&self) -> Result<()> {
        if self.empty() {
            return Err(Error::EmptyContainer);
        }
        if self.bounds_cache.borrow().is_none() {
            let d = self.dim.unwrap();
            let mut bounds = vec![(f64::INFINITY, f64::NEG_INFINITY); d];
            for (p, _) in self.iterate() {
                for i in 0..d {
                    bounds[i].0 = bounds[i].0.min(p.get(i));
                    bounds[i].1 = bounds[i].1.max(p.get(i));
                }
            }
            log::trace!("recomputed spatial index bounds cache ({} entries)", self.size);
            *self.bounds_cache.borrow_mut() = Some(bounds);
        }
        Ok(())
    }

    /// cached minimum stored coordinate in dimension `i`.
    pub fn min_value(&self, i: usize) -> Result<f64> {
        self.ensure_bounds_cache()?;
        let d = self.dim.unwrap();
        if i >= d {
            return Err(Error::BadArgument(format!(
                "dimension {i} out of range for a {d}-dimensional index"
            )));
        }
        Ok(self.bounds_cache.borrow().as_ref().unwrap()[i].0)
    }

    /// cached maximum stored coordinate in dimension `i`.
    pub fn max_value(&self, i: usize) -> Result<f64> {
        self.ensure_bounds_cache()?;
        let d = self.dim.unwrap();
        if i >= d {
            return Err(Error::BadArgument(format!(
                "dimension {i} out of range for a {d}-dimensional index"
            )));
        }
        Ok(self.bounds_cache.borrow().as_ref().unwrap()[i].1)
    }

    fn widen_bounds_cache(&self, p: &Point) {
        let mut cache = self.bounds_cache.borrow_mut();
        if let Some(bounds) = cache.as_mut() {
            for i in 0..p.dimensions() {
                bounds[i].0 = bounds[i].0.min(p.get(i));
                bounds[i].1 = bounds[i].1.max(p.get(i));
            }
        }
    }

    /// in-order traversal: a deterministic, finite, restartable sequence of
    /// every stored `(point, value)`.
    pub fn iterate(&self) -> Vec<(&Point, &V)> {
        let mut out = Vec::with_capacity(self.size);
        Self::rec_iterate(&self.root, &mut out);
        out
    }

    /// the reverse of [`SpatialIndex::iterate`]'s traversal order.
    pub fn reverse_iterate(&self) -> Vec<(&Point, &V)> {
        let mut out = Vec::with_capacity(self.size);
        Self::rec_reverse_iterate(&self.root, &mut out);
        out
    }

    /// entries with `lo <= p <= hi` componentwise (closed box).
    pub fn find_intersection(&self, lo: &Point, hi: &Point) -> Result<Vec<(&Point, &V)>> {
        self.check_box_dims(lo, hi)?;
        let mut out = Vec::new();
        Self::rec_box_query(&self.root, lo, hi, true, &mut out);
        Ok(out)
    }

    /// entries with `lo < p < hi` componentwise (open box).
    pub fn find_within(&self, lo: &Point, hi: &Point) -> Result<Vec<(&Point, &V)>> {
        self.check_box_dims(lo, hi)?;
        let mut out = Vec::new();
        Self::rec_box_query(&self.root, lo, hi, false, &mut out);
        Ok(out)
    }

    /// entries NOT inside the closed box `[lo, hi]`.
    ///
    /// Unlike the other three box queries this cannot be usefully pruned by
    /// subtree bounds (a subtree can straddle the box on one axis and still
    /// contribute disjoint points), so it materializes the full traversal
    /// and filters — the same approach `librallu-do-util`'s `ListParetoFront`
    /// takes for its only query method.
    pub fn find_disjoint(&self, lo: &Point, hi: &Point) -> Result<Vec<(&Point, &V)>> {
        self.check_box_dims(lo, hi)?;
        let d = lo.dimensions();
        Ok(self
            .iterate()
            .into_iter()
            .filter(|(p, _)| !(0..d).all(|i| lo.get(i) <= p.get(i) && p.get(i) <= hi.get(i)))
            .collect())
    }

    /// the `k` entries nearest to `q` by Euclidean distance, ascending,
    /// ties broken lexicographically on (coordinates, insertion index).
    /// Fails with [`Error::BadArgument`] if `k < 1`.
    pub fn find_nearest(&self, q: &Point, k: usize) -> Result<Vec<(&Point, &V)>> {
        if k < 1 {
            return Err(Error::BadArgument(format!("k must be >= 1, got {k}")));
        }
        self.check_dim(q)?;
        if self.root.is_none() {
            return Ok(Vec::new());
        }
        let mut heap: BinaryHeap<NearestCandidate<V>> = BinaryHeap::new();
        Self::rec_nearest(&self.root, q, k, &mut heap);
        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|c| (c.point, c.value))
            .collect())
    }

    /// the single nearest entry to `q`. Fails with [`Error::EmptyContainer`]
    /// if empty.
    pub fn get_nearest(&self, q: &Point) -> Result<(&Point, &V)> {
        self.check_dim(q)?;
        if self.empty() {
            return Err(Error::EmptyContainer);
        }
        Ok(self.find_nearest(q, 1)?.pop().expect("non-empty index yields at least one nearest entry"))
    }

    fn maybe_rebuild(&mut self) {
        if self.size >= MIN_REBUILD_SIZE && self.size >= SKEW_REBUILD_FACTOR * self.size_at_last_rebuild.max(1) {
            log::debug!(
                "rebuilding kd-tree: size {} grew past 2x the {} entries at last rebuild",
                self.size,
                self.size_at_last_rebuild
            );
            self.rebuild();
            self.size_at_last_rebuild = self.size;
        }
    }

    fn rebuild(&mut self) {
        let d = match self.dim {
            Some(d) => d,
            None => return,
        };
        let mut entries = Vec::with_capacity(self.size);
        let root = self.root.take();
        Self::drain_entries(root, &mut entries);
        self.root = Self::build_balanced(entries, 0, d);
    }

    fn drain_entries(link: Link<V>, out: &mut Vec<Entry<V>>) {
        if let Some(node) = link {
            let (entry, left, right) = node.decompose();
            Self::drain_entries(left, out);
            out.push(entry);
            Self::drain_entries(right, out);
        }
    }

    /// rebuilds a balanced subtree from scratch, choosing the median along
    /// `dim` as pivot and partitioning strictly so that the "< goes left,
    /// >= goes right" invariant used by insert/search is preserved exactly.
    fn build_balanced(mut entries: Vec<Entry<V>>, dim: usize, d: usize) -> Link<V> {
        if entries.is_empty() {
            return None;
        }
        entries.sort_by(|a, b| a.point.get(dim).partial_cmp(&b.point.get(dim)).unwrap());
        let mid = entries.len() / 2;
        let pivot_value = entries[mid].point.get(dim);
        let pivot = entries.remove(mid);
        let mut left_entries = Vec::new();
        let mut right_entries = Vec::new();
        for e in entries {
            if e.point.get(dim) < pivot_value {
                left_entries.push(e);
            } else {
                right_entries.push(e);
            }
        }
        let next_dim = (dim + 1) % d;
        let left = Self::build_balanced(left_entries, next_dim, d);
        let right = Self::build_balanced(right_entries, next_dim, d);
        Some(Box::new(Node::new(pivot, left, right, d)))
    }

    // -- recursive tree primitives, mirroring librallu-do-util's pareto_pq::kd_tree --

    fn rec_insert(link: &mut Link<V>, entry: Entry<V>, cur_dim: usize, d: usize) {
        match link {
            None => {
                *link = Some(Box::new(Node::new(entry, None, None, d)));
            }
            Some(node) => {
                if entry.point.get(cur_dim) < node.entry().point.get(cur_dim) {
                    Self::rec_insert(node.left_mut(), entry, (cur_dim + 1) % d, d);
                } else {
                    Self::rec_insert(node.right_mut(), entry, (cur_dim + 1) % d, d);
                }
                node.update_bounds(d);
            }
        }
    }

    fn rec_find<'a>(link: &'a Link<V>, p: &Point, cur_dim: usize, d: usize) -> Option<&'a Node<V>> {
        match link {
            None => None,
            Some(node) => {
                if node.entry().point == *p {
                    Some(node)
                } else if p.get(cur_dim) < node.entry().point.get(cur_dim) {
                    Self::rec_find(node.left(), p, (cur_dim + 1) % d, d)
                } else {
                    Self::rec_find(node.right(), p, (cur_dim + 1) % d, d)
                }
            }
        }
    }

    /// locates the mutable slot holding `p`, alongside the branching
    /// dimension at that slot's depth (needed by `remove_link`). Returns
    /// `(slot, None)` when absent — mirrors `do_util`'s `rec_search`, using
    /// `if`/`else` over `.as_ref()`/`.as_mut()` instead of a `match` binding
    /// to keep the borrow checker happy across the recursive mutable chain.
    fn rec_search_mut<'a>(link: &'a mut Link<V>, p: &Point, cur_dim: usize, d: usize) -> (&'a mut Link<V>, Option<usize>) {
        if link.is_none() {
            (link, None)
        } else if link.as_ref().unwrap().entry().point == *p {
            (link, Some(cur_dim))
        } else {
            let go_left = p.get(cur_dim) < link.as_ref().unwrap().entry().point.get(cur_dim);
            let next = if go_left {
                link.as_mut().unwrap().left_mut()
            } else {
                link.as_mut().unwrap().right_mut()
            };
            Self::rec_search_mut(next, p, (cur_dim + 1) % d, d)
        }
    }

    /// true minimum coordinate along `target_dim` within a subtree, found by
    /// plain structural recursion. Deliberately ignores cached bounds: after
    /// an `erase`, a node's bounds can be stale-wide (conservative, per
    /// `Node`'s doc comment), which is safe for box-query pruning but not for
    /// picking out an exact minimum — a stale lower bound can point at a
    /// value that was already removed.
    fn true_min_value(link: &Link<V>, target_dim: usize) -> Option<f64> {
        link.as_ref().map(|node| {
            let mut min = node.entry().point.get(target_dim);
            if let Some(v) = Self::true_min_value(node.left(), target_dim) {
                min = min.min(v);
            }
            if let Some(v) = Self::true_min_value(node.right(), target_dim) {
                min = min.min(v);
            }
            min
        })
    }

    /// finds the subtree minimum along `target_dim`. `cur_dim` is this
    /// node's own branching dimension (the caller must seed it correctly:
    /// for a subtree rooted one level below some node of dimension `dim`,
    /// that's `(dim + 1) % d`, not `dim`).
    ///
    /// When `cur_dim == target_dim`, the local BST invariant on that exact
    /// axis guarantees every value in the right subtree is >= this node, so
    /// the minimum is this node itself or lives in the left subtree — no
    /// bounds lookup needed. Off-axis, that invariant doesn't hold (a value
    /// smaller than this node's could be in either child), so the true
    /// minimum of each side is recomputed exactly via [`Self::true_min_value`]
    /// rather than trusted from a possibly stale cached bound.
    fn mut_rec_search_minimum<'a>(
        link: &'a mut Link<V>,
        cur_dim: usize,
        target_dim: usize,
        d: usize,
    ) -> (&'a mut Link<V>, Option<usize>) {
        if link.is_none() {
            return (link, None);
        }
        if cur_dim == target_dim {
            return if link.as_ref().unwrap().left().is_some() {
                Self::mut_rec_search_minimum(link.as_mut().unwrap().left_mut(), (cur_dim + 1) % d, target_dim, d)
            } else {
                (link, Some(cur_dim))
            };
        }
        let v_e = link.as_ref().unwrap().entry().point.get(target_dim);
        let v_l = Self::true_min_value(link.as_ref().unwrap().left(), target_dim);
        let v_r = Self::true_min_value(link.as_ref().unwrap().right(), target_dim);
        enum Dir {
            Left,
            Right,
            Here,
        }
        let dir = match (v_l, v_r) {
            (None, None) => Dir::Here,
            (None, Some(vr)) => if vr < v_e { Dir::Right } else { Dir::Here },
            (Some(vl), None) => if vl < v_e { Dir::Left } else { Dir::Here },
            (Some(vl), Some(vr)) => {
                if vl <= vr && vl < v_e {
                    Dir::Left
                } else if vr < v_e {
                    Dir::Right
                } else {
                    Dir::Here
                }
            }
        };
        match dir {
            Dir::Here => (link, Some(cur_dim)),
            Dir::Left => Self::mut_rec_search_minimum(link.as_mut().unwrap().left_mut(), (cur_dim + 1) % d, target_dim, d),
            Dir::Right => Self::mut_rec_search_minimum(link.as_mut().unwrap().right_mut(), (cur_dim + 1) % d, target_dim, d),
        }
    }

    /// removes and returns the entry at `link` (the node's own branching
    /// dimension is `dim`), restructuring the subtree to preserve the k-d
    /// invariant.
    fn remove_link(link: &mut Link<V>, dim: usize, d: usize) -> Option<Entry<V>> {
        let mut node = link.take()?;
        let left = node.left_mut().take();
        let right = node.right_mut().take();
        let old_entry = match (left, right) {
            (None, None) => {
                let (entry, _, _) = node.decompose();
                return Some(entry);
            }
            (left, Some(right)) => {
                let mut right_link = Some(right);
                let (min_slot, min_dim) = Self::mut_rec_search_minimum(&mut right_link, (dim + 1) % d, dim, d);
                let min_dim = min_dim.expect("non-empty subtree has a minimum");
                let mut replacement = Self::remove_link(min_slot, min_dim, d).expect("minimum slot holds an entry");
                std::mem::swap(&mut replacement, node.entry_mut());
                *node.left_mut() = left;
                *node.right_mut() = right_link;
                node.update_bounds(d);
                replacement
            }
            (Some(left), None) => {
                let mut demoted = Some(left);
                let (min_slot, min_dim) = Self::mut_rec_search_minimum(&mut demoted, (dim + 1) % d, dim, d);
                let min_dim = min_dim.expect("non-empty subtree has a minimum");
                let mut replacement = Self::remove_link(min_slot, min_dim, d).expect("minimum slot holds an entry");
                std::mem::swap(&mut replacement, node.entry_mut());
                *node.left_mut() = None;
                *node.right_mut() = demoted;
                node.update_bounds(d);
                replacement
            }
        };
        *link = Some(node);
        Some(old_entry)
    }

    fn rec_iterate<'a>(link: &'a Link<V>, out: &mut Vec<(&'a Point, &'a V)>) {
        if let Some(node) = link {
            Self::rec_iterate(node.left(), out);
            out.push((&node.entry().point, &node.entry().value));
            Self::rec_iterate(node.right(), out);
        }
    }

    fn rec_reverse_iterate<'a>(link: &'a Link<V>, out: &mut Vec<(&'a Point, &'a V)>) {
        if let Some(node) = link {
            Self::rec_reverse_iterate(node.right(), out);
            out.push((&node.entry().point, &node.entry().value));
            Self::rec_reverse_iterate(node.left(), out);
        }
    }

    fn rec_box_query<'a>(link: &'a Link<V>, lo: &Point, hi: &Point, closed: bool, out: &mut Vec<(&'a Point, &'a V)>) {
        if let Some(node) = link {
            let d = lo.dimensions();
            for i in 0..d {
                let (bmin, bmax) = node.bounds()[i];
                let disjoint = if closed {
                    bmax < lo.get(i) || bmin > hi.get(i)
                } else {
                    bmax <= lo.get(i) || bmin >= hi.get(i)
                };
                if disjoint {
                    return;
                }
            }
            Self::rec_box_query(node.left(), lo, hi, closed, out);
            let p = &node.entry().point;
            let matches = (0..d).all(|i| {
                if closed {
                    lo.get(i) <= p.get(i) && p.get(i) <= hi.get(i)
                } else {
                    lo.get(i) < p.get(i) && p.get(i) < hi.get(i)
                }
            });
            if matches {
                out.push((p, &node.entry().value));
            }
            Self::rec_box_query(node.right(), lo, hi, closed, out);
        }
    }

    fn rec_nearest<'a>(link: &'a Link<V>, q: &Point, k: usize, heap: &mut BinaryHeap<NearestCandidate<'a, V>>) {
        if let Some(node) = link {
            if heap.len() >= k {
                if let Some(worst) = heap.peek() {
                    if box_distance_squared(q, node.bounds()) > worst.dist_sq {
                        return;
                    }
                }
            }
            let p = &node.entry().point;
            let dist_sq: f64 = p.coords().iter().zip(q.coords()).map(|(a, b)| (a - b) * (a - b)).sum();
            let candidate = NearestCandidate {
                dist_sq,
                point: p,
                value: &node.entry().value,
                insertion_index: node.entry().insertion_index,
            };
            let should_replace = match heap.peek() {
                Some(worst) => candidate < *worst,
                None => true,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if should_replace {
                heap.pop();
                heap.push(candidate);
            }
            Self::rec_nearest(node.left(), q, k, heap);
            Self::rec_nearest(node.right(), q, k, heap);
        }
    }
}

impl<V: Clone> Clone for SpatialIndex<V> {
    fn clone(&self) -> Self {
        let mut out = match self.dim {
            Some(d) => Self::with_dimensions(d),
            None => Self::new(),
        };
        for (p, v) in self.iterate() {
            out.insert(p.clone(), v.clone())
                .expect("cloned entry dimension always matches the cloned index");
        }
        out
    }
}

fn box_distance_squared(q: &Point, bounds: &[(f64, f64)]) -> f64 {
    q.coords()
        .iter()
        .zip(bounds)
        .map(|(qi, (lo, hi))| {
            if *qi < *lo {
                (*lo - *qi) * (*lo - *qi)
            } else if *qi > *hi {
                (*qi - *hi) * (*qi - *hi)
            } else {
                0.0
            }
        })
        .sum()
}

struct NearestCandidate<'a, V> {
    dist_sq: f64,
    point: &'a Point,
    value: &'a V,
    insertion_index: u64,
}

impl<'a, V> PartialEq for NearestCandidate<'a, V> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<'a, V> Eq for NearestCandidate<'a, V> {}

impl<'a, V> PartialOrd for NearestCandidate<'a, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, V> Ord for NearestCandidate<'a, V> {
    /// ascending order: smaller distance first, ties broken lexicographically
    /// on coordinates then insertion index (spec §5).
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist_sq
            .partial_cmp(&other.dist_sq)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.point.lexicographic_cmp(other.point))
            .then_with(|| self.insertion_index.cmp(&other.insertion_index))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pt(coords: &[f64]) -> Point {
        Point::new(coords.to_vec())
    }

    #[test]
    fn insert_replaces_value_and_reports_new_key() {
        let mut idx = SpatialIndex::new();
        assert!(idx.insert(pt(&[1.0, 2.0]), 10).unwrap());
        assert!(!idx.insert(pt(&[1.0, 2.0]), 20).unwrap());
        assert_eq!(idx.size(), 1);
        assert_eq!(*idx.lookup(&pt(&[1.0, 2.0])).unwrap(), 20);
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let mut idx = SpatialIndex::new();
        idx.insert(pt(&[1.0, 2.0]), 1).unwrap();
        let err = idx.insert(pt(&[1.0, 2.0, 3.0]), 2).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { expected: 2, actual: 3 });
    }

    #[test]
    fn lookup_missing_is_not_found() {
        let idx: SpatialIndex<i32> = SpatialIndex::with_dimensions(2);
        assert_eq!(idx.lookup(&pt(&[0.0, 0.0])).unwrap_err(), Error::NotFound);
    }

    #[test]
    fn erase_then_size_tracks_insert_minus_erase() {
        let mut idx = SpatialIndex::new();
        for i in 0..20 {
            idx.insert(pt(&[i as f64, (20 - i) as f64]), i).unwrap();
        }
        assert_eq!(idx.size(), 20);
        for i in 0..10 {
            assert_eq!(idx.erase(&pt(&[i as f64, (20 - i) as f64])).unwrap(), 1);
        }
        assert_eq!(idx.size(), 10);
        assert_eq!(idx.erase(&pt(&[0.0, 20.0])).unwrap(), 0);
        // size() alone can't catch a corrupted tree that merely lost
        // reachability to a still-counted entry: check every survivor is
        // actually findable, not just that the count lines up.
        for i in 10..20 {
            let p = pt(&[i as f64, (20 - i) as f64]);
            assert!(idx.contains(&p).unwrap(), "point {i} should still be reachable");
            assert_eq!(*idx.lookup(&p).unwrap(), i);
            let nearest = idx.find_nearest(&p, 1).unwrap();
            assert_eq!(nearest, vec![(&p, &i)]);
        }
    }

    #[test]
    fn erase_two_child_replacement_keeps_surviving_node_reachable() {
        // regression test for a kd-tree corruption bug: deleting a node with
        // two children searched for the replacement minimum using a cached,
        // possibly stale bound and the wrong branching-dimension seed, which
        // could silently misplace a surviving entry while `size()` stayed
        // numerically correct.
        let mut idx = SpatialIndex::new();
        idx.insert(pt(&[0.0, 0.0]), "a").unwrap();
        idx.insert(pt(&[5.0, 50.0]), "b").unwrap();
        idx.insert(pt(&[6.0, 10.0]), "c").unwrap();
        idx.insert(pt(&[1.0, 5.0]), "d").unwrap();

        assert_eq!(idx.erase(&pt(&[1.0, 5.0])).unwrap(), 1);
        assert_eq!(idx.erase(&pt(&[0.0, 0.0])).unwrap(), 1);

        assert_eq!(idx.size(), 2);
        for (p, v) in [(pt(&[5.0, 50.0]), "b"), (pt(&[6.0, 10.0]), "c")] {
            assert!(idx.contains(&p).unwrap(), "point {p:?} should still be reachable");
            assert_eq!(*idx.lookup(&p).unwrap(), v);
            let nearest = idx.find_nearest(&p, 1).unwrap();
            assert_eq!(nearest, vec![(&p, &v)]);
        }
    }

    #[test]
    fn min_max_value_track_extrema_through_erase() {
        let mut idx = SpatialIndex::new();
        idx.insert(pt(&[3.0, -1.0]), ()).unwrap();
        idx.insert(pt(&[-5.0, 10.0]), ()).unwrap();
        idx.insert(pt(&[0.0, 0.0]), ()).unwrap();
        assert_eq!(idx.min_value(0).unwrap(), -5.0);
        assert_eq!(idx.max_value(1).unwrap(), 10.0);
        idx.erase(&pt(&[-5.0, 10.0])).unwrap();
        assert_eq!(idx.min_value(0).unwrap(), 0.0);
        assert_eq!(idx.max_value(1).unwrap(), 0.0);
    }

    #[test]
    fn extremum_on_empty_is_empty_container() {
        let idx: SpatialIndex<i32> = SpatialIndex::new();
        assert_eq!(idx.min_value(0).unwrap_err(), Error::EmptyContainer);
    }

    #[test]
    fn find_intersection_matches_brute_force() {
        let mut idx = SpatialIndex::new();
        let pts = [(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 1.5), (3.0, 0.0)];
        for (i, (x, y)) in pts.iter().enumerate() {
            idx.insert(pt(&[*x, *y]), i).unwrap();
        }
        let lo = pt(&[0.0, 0.0]);
        let hi = pt(&[1.5, 1.5]);
        let mut got: Vec<_> = idx
            .find_intersection(&lo, &hi)
            .unwrap()
            .into_iter()
            .map(|(p, v)| (p.coords().to_vec(), *v))
            .collect();
        got.sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(got, vec![(vec![0.0, 0.0], 0), (vec![1.0, 1.0], 1), (vec![0.5, 1.5], 3)]);
    }

    #[test]
    fn find_within_excludes_boundary() {
        let mut idx = SpatialIndex::new();
        idx.insert(pt(&[0.0, 0.0]), 0).unwrap();
        idx.insert(pt(&[1.0, 1.0]), 1).unwrap();
        let lo = pt(&[0.0, 0.0]);
        let hi = pt(&[1.0, 1.0]);
        assert!(idx.find_within(&lo, &hi).unwrap().is_empty());
        assert_eq!(idx.find_intersection(&lo, &hi).unwrap().len(), 2);
    }

    #[test]
    fn find_disjoint_complements_intersection() {
        let mut idx = SpatialIndex::new();
        for i in 0..5 {
            idx.insert(pt(&[i as f64, i as f64]), i).unwrap();
        }
        let lo = pt(&[0.0, 0.0]);
        let hi = pt(&[2.0, 2.0]);
        let inside = idx.find_intersection(&lo, &hi).unwrap().len();
        let outside = idx.find_disjoint(&lo, &hi).unwrap().len();
        assert_eq!(inside + outside, 5);
    }

    #[test]
    fn find_nearest_matches_brute_force() {
        let mut idx = SpatialIndex::new();
        let coords = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (5.0, 5.0), (2.0, 2.0), (-1.0, -1.0)];
        for (i, (x, y)) in coords.iter().enumerate() {
            idx.insert(pt(&[*x, *y]), i).unwrap();
        }
        let q = pt(&[0.4, 0.4]);
        let got = idx.find_nearest(&q, 3).unwrap();
        let mut brute: Vec<(f64, Vec<f64>, usize)> = coords
            .iter()
            .enumerate()
            .map(|(i, (x, y))| {
                let dx = x - 0.4;
                let dy = y - 0.4;
                (dx * dx + dy * dy, vec![*x, *y], i)
            })
            .collect();
        brute.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap().then_with(|| a.1.partial_cmp(&b.1).unwrap()));
        let expected: Vec<_> = brute.into_iter().take(3).map(|(_, c, _)| c).collect();
        let got_coords: Vec<_> = got.into_iter().map(|(p, _)| p.coords().to_vec()).collect();
        assert_eq!(got_coords, expected);
    }

    #[test]
    fn find_nearest_rejects_zero_k() {
        let idx: SpatialIndex<i32> = SpatialIndex::with_dimensions(2);
        assert!(matches!(idx.find_nearest(&pt(&[0.0, 0.0]), 0), Err(Error::BadArgument(_))));
    }

    #[test]
    fn find_nearest_on_empty_is_empty_not_error() {
        let idx: SpatialIndex<i32> = SpatialIndex::with_dimensions(2);
        assert_eq!(idx.find_nearest(&pt(&[0.0, 0.0]), 3).unwrap().len(), 0);
    }

    #[test]
    fn get_nearest_on_empty_is_empty_container() {
        let idx: SpatialIndex<i32> = SpatialIndex::with_dimensions(2);
        assert_eq!(idx.get_nearest(&pt(&[0.0, 0.0])).unwrap_err(), Error::EmptyContainer);
    }

    #[test]
    fn iterate_and_reverse_iterate_are_mirror_images() {
        let mut idx = SpatialIndex::new();
        for i in 0..30 {
            idx.insert(pt(&[i as f64, (i * 7 % 13) as f64]), i).unwrap();
        }
        let forward: Vec<_> = idx.iterate().into_iter().map(|(_, v)| *v).collect();
        let mut backward: Vec<_> = idx.reverse_iterate().into_iter().map(|(_, v)| *v).collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn rebuild_preserves_all_entries_and_queries() {
        let mut idx = SpatialIndex::new();
        for i in 0..200 {
            idx.insert(pt(&[(i % 17) as f64, (i % 23) as f64]), i).unwrap();
        }
        assert_eq!(idx.size(), 200);
        for i in 0..200 {
            assert!(idx.contains(&pt(&[(i % 17) as f64, (i % 23) as f64])).unwrap());
        }
    }

    #[test]
    fn clone_is_deep_and_independent() {
        let mut idx = SpatialIndex::new();
        idx.insert(pt(&[1.0, 1.0]), 10).unwrap();
        let mut cloned = idx.clone();
        cloned.insert(pt(&[2.0, 2.0]), 20).unwrap();
        assert_eq!(idx.size(), 1);
        assert_eq!(cloned.size(), 2);
    }
}
