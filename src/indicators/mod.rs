//! Quality indicators over Fronts/Archives: hypervolume, the generational-
//! distance family, coverage, crowding distance, and objective-conflict
//! metrics (spec §4.5). Each submodule operates on raw `&[Point]` slices so
//! it applies equally to a `Front`'s or an `Archive`'s point set, or to an
//! externally supplied reference set.

pub mod conflict;
pub mod coverage;
pub mod crowding;
pub mod distance;
pub mod hypervolume;
