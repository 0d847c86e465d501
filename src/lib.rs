//! Spatial maps and Pareto containers keyed by points in R^d.
//!
//! [`SpatialIndex`](spatial_index::SpatialIndex) is a generic associative
//! container keyed by spatial position. [`Front`] layers Pareto-dominance on
//! top of it, and [`Archive`] layers a capacity-bounded sequence of such
//! fronts on top of that. [`indicators`] computes quality metrics (hypervolume,
//! generational distance, coverage, crowding, conflict) over the point sets
//! either container exposes.

// useful additional warnings (missing docs, crates imported but unused, ...)
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
// #![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

// some more useful warnings (no shadowing, similar names, ...)
#![warn(clippy::similar_names)]
#![warn(clippy::print_stdout)]
#![warn(clippy::use_debug)]
#![warn(clippy::shadow_unrelated)]
#![warn(clippy::shadow_same)]
#![warn(clippy::shadow_reuse)]

/// a bounded sequence of Pareto fronts, deeper layers holding what shallower
/// ones dominate.
pub mod archive;

/// per-axis optimization sense (minimize/maximize) shared by [`Front`] and
/// [`Archive`].
pub mod direction;

/// the Pareto-dominance algebra shared by [`point::Point`] and [`Front`].
pub mod dominance;

/// the crate-wide error and result types.
pub mod error;

/// a dominance-preserving spatial map: no stored point dominates another.
pub mod front;

/// quality indicators (hypervolume, generational distance, coverage,
/// crowding, conflict) over raw point sets.
pub mod indicators;

/// a point in R^d and its arithmetic/dominance operations.
pub mod point;

/// the incremental k-d-tree backing [`front::Front`] and every plain
/// position-keyed lookup.
pub mod spatial_index;

pub use archive::Archive;
pub use direction::DirectionVector;
pub use error::{Error, Result};
pub use front::Front;
pub use point::Point;
pub use spatial_index::SpatialIndex;
