use crate::point::Point;

/// link between nodes in the kd-tree.
pub(super) type Link<V> = Option<Box<Node<V>>>;

/// a stored (point, value) pair, stamped with the insertion ordinal used to
/// break distance/coordinate ties deterministically.
#[derive(Debug)]
pub(super) struct Entry<V> {
    pub(super) point: Point,
    pub(super) value: V,
    pub(super) insertion_index: u64,
}

/// node of the incremental kd-tree.
///
/// Bounds are a per-subtree (min, max) pair per dimension, generalizing
/// `librallu-do-util`'s `pareto_pq::kd_tree::Node` from a const-generic
/// `NB_DIM` to a dimension fixed at the owning index's construction.
///
/// Bounds only ever *widen* on insert (every ancestor on the insertion path
/// is refreshed, so they stay exact). `erase` does not re-tighten ancestor
/// bounds above the removed node — they become conservative (too wide,
/// never too narrow), which keeps every box-query and dominance-pruning use
/// of these bounds safe, just less selective, until the next full rebuild.
#[derive(Debug)]
pub(super) struct Node<V> {
    entry: Entry<V>,
    left: Link<V>,
    right: Link<V>,
    bounds: Vec<(f64, f64)>,
}

impl<V> Node<V> {
    pub(super) fn new(entry: Entry<V>, left: Link<V>, right: Link<V>, dim: usize) -> Self {
        let bounds = Self::compute_bounds(&entry, &left, &right, dim);
        Self {
            entry,
            left,
            right,
            bounds,
        }
    }

    pub(super) fn entry(&self) -> &Entry<V> {
        &self.entry
    }

    pub(super) fn entry_mut(&mut self) -> &mut Entry<V> {
        &mut self.entry
    }

    pub(super) fn left(&self) -> &Link<V> {
        &self.left
    }

    pub(super) fn right(&self) -> &Link<V> {
        &self.right
    }

    pub(super) fn left_mut(&mut self) -> &mut Link<V> {
        &mut self.left
    }

    pub(super) fn right_mut(&mut self) -> &mut Link<V> {
        &mut self.right
    }

    pub(super) fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    pub(super) fn update_bounds(&mut self, dim: usize) {
        self.bounds = Self::compute_bounds(&self.entry, &self.left, &self.right, dim);
    }

    pub(super) fn decompose(self) -> (Entry<V>, Link<V>, Link<V>) {
        (self.entry, self.left, self.right)
    }

    fn compute_bounds(entry: &Entry<V>, left: &Link<V>, right: &Link<V>, dim: usize) -> Vec<(f64, f64)> {
        let mut bounds: Vec<(f64, f64)> = entry.point.coords().iter().map(|c| (*c, *c)).collect();
        debug_assert_eq!(bounds.len(), dim);
        for child in [left, right] {
            if let Some(n) = child {
                for (i, (lower, upper)) in n.bounds().iter().enumerate() {
                    bounds[i].0 = bounds[i].0.min(*lower);
                    bounds[i].1 = bounds[i].1.max(*upper);
                }
            }
        }
        bounds
    }
}
