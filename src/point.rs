use std::cmp::Ordering;
use std::ops;

use crate::direction::DirectionVector;
use crate::dominance;
use crate::error::{Error, Result};

/// a fixed-dimension point in R^d.
///
/// `d` is fixed at construction. Arithmetic and dominance predicates against
/// another `Point` fail with [`Error::DimensionMismatch`] on a dimension
/// mismatch; arithmetic with a scalar always succeeds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    coords: Vec<f64>,
}

impl Point {
    /// builds a point from a sequence of coordinates; the dimension is fixed
    /// to the sequence's length.
    pub fn new(coords: impl Into<Vec<f64>>) -> Self {
        Self {
            coords: coords.into(),
        }
    }

    /// number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.coords.len()
    }

    /// the coordinates as a slice.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// coordinate at index `i`.
    pub fn get(&self, i: usize) -> f64 {
        self.coords[i]
    }

    fn check_dim(&self, other: &Point) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            })
        } else {
            Ok(())
        }
    }

    fn check_dir(&self, dir: &DirectionVector) -> Result<()> {
        if self.dimensions() != dir.dimensions() {
            Err(Error::DimensionMismatch {
                expected: self.dimensions(),
                actual: dir.dimensions(),
            })
        } else {
            Ok(())
        }
    }

    /// componentwise addition of another point.
    pub fn add_point(&self, other: &Point) -> Result<Point> {
        self.check_dim(other)?;
        Ok(Point::new(
            self.coords
                .iter()
                .zip(&other.coords)
                .map(|(a, b)| a + b)
                .collect::<Vec<_>>(),
        ))
    }

    /// componentwise subtraction of another point.
    pub fn sub_point(&self, other: &Point) -> Result<Point> {
        self.check_dim(other)?;
        Ok(Point::new(
            self.coords
                .iter()
                .zip(&other.coords)
                .map(|(a, b)| a - b)
                .collect::<Vec<_>>(),
        ))
    }

    /// componentwise multiplication by another point.
    pub fn mul_point(&self, other: &Point) -> Result<Point> {
        self.check_dim(other)?;
        Ok(Point::new(
            self.coords
                .iter()
                .zip(&other.coords)
                .map(|(a, b)| a * b)
                .collect::<Vec<_>>(),
        ))
    }

    /// componentwise division by another point.
    pub fn div_point(&self, other: &Point) -> Result<Point> {
        self.check_dim(other)?;
        Ok(Point::new(
            self.coords
                .iter()
                .zip(&other.coords)
                .map(|(a, b)| a / b)
                .collect::<Vec<_>>(),
        ))
    }

    /// squared Euclidean distance to another point.
    pub fn distance_squared(&self, other: &Point) -> Result<f64> {
        self.check_dim(other)?;
        Ok(self
            .coords
            .iter()
            .zip(&other.coords)
            .map(|(a, b)| (a - b) * (a - b))
            .sum())
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> Result<f64> {
        Ok(self.distance_squared(other)?.sqrt())
    }

    /// `self` dominates `other` under `dir` (defaults to all-minimize when
    /// `None`): no worse on every axis, strictly better on at least one.
    pub fn dominates(&self, other: &Point, dir: Option<&DirectionVector>) -> Result<bool> {
        self.check_dim(other)?;
        let owned;
        let dir = match dir {
            Some(d) => {
                self.check_dir(d)?;
                d
            }
            None => {
                owned = DirectionVector::all_minimize(self.dimensions());
                &owned
            }
        };
        Ok(dominance::dominates(&self.coords, &other.coords, dir))
    }

    /// `self` strongly dominates `other`: strictly better on every axis.
    pub fn strongly_dominates(&self, other: &Point, dir: Option<&DirectionVector>) -> Result<bool> {
        self.check_dim(other)?;
        let owned;
        let dir = match dir {
            Some(d) => {
                self.check_dir(d)?;
                d
            }
            None => {
                owned = DirectionVector::all_minimize(self.dimensions());
                &owned
            }
        };
        Ok(dominance::strongly_dominates(&self.coords, &other.coords, dir))
    }

    /// neither dominates the other.
    pub fn non_dominates(&self, other: &Point, dir: Option<&DirectionVector>) -> Result<bool> {
        Ok(!self.dominates(other, dir)? && !other.dominates(self, dir)?)
    }

    /// lexicographic comparison of coordinates, used as the deterministic
    /// tie-break in spatial queries.
    pub fn lexicographic_cmp(&self, other: &Point) -> Ordering {
        for (a, b) in self.coords.iter().zip(&other.coords) {
            match a.partial_cmp(b) {
                Some(Ordering::Equal) | None => continue,
                Some(o) => return o,
            }
        }
        self.coords.len().cmp(&other.coords.len())
    }
}

macro_rules! impl_scalar_ops {
    ($trait_:ident, $method:ident, $op:tt) => {
        impl ops::$trait_<f64> for &Point {
            type Output = Point;
            fn $method(self, scalar: f64) -> Point {
                Point::new(self.coords.iter().map(|c| c $op scalar).collect::<Vec<_>>())
            }
        }
        impl ops::$trait_<f64> for Point {
            type Output = Point;
            fn $method(self, scalar: f64) -> Point {
                (&self).$method(scalar)
            }
        }
    };
}

impl_scalar_ops!(Add, add, +);
impl_scalar_ops!(Sub, sub, -);
impl_scalar_ops!(Mul, mul, *);
impl_scalar_ops!(Div, div, /);
