//! Populations of records in the storage disciplines the benchmarks compare.
//!
//! Every population is built from a seed function mapping an index to a record, so two
//! populations built from the same seed hold the same values and differ only in how they are
//! stored.

use std::fmt;
use std::num::NonZero;
use std::slice;

use crate::{Circle, Point, Shape};

/// Records stored inline in one contiguous allocation.
#[derive(Clone, Debug)]
pub struct ValuePopulation {
    points: Vec<Point>,
}

impl ValuePopulation {
    /// Builds `len` points from `seed`, in index order.
    #[must_use]
    pub fn from_seed(len: NonZero<usize>, seed: impl FnMut(usize) -> Point) -> Self {
        let mut points = Vec::with_capacity(len.get());
        points.extend((0..len.get()).map(seed));

        Self { points }
    }

    /// The points, in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; populations hold at least one record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Records stored as individually boxed heap allocations, reached through a vector of pointers.
///
/// Each point is owned by exactly one box and released exactly once, when the population is
/// dropped.
#[derive(Debug)]
pub struct PointerPopulation {
    #[expect(
        clippy::vec_box,
        reason = "one heap allocation per point is the layout being measured"
    )]
    points: Vec<Box<Point>>,
}

impl PointerPopulation {
    /// Builds `len` separately allocated points from `seed`, in index order.
    #[must_use]
    pub fn from_seed(len: NonZero<usize>, mut seed: impl FnMut(usize) -> Point) -> Self {
        let mut points = Vec::with_capacity(len.get());
        points.extend((0..len.get()).map(|index| Box::new(seed(index))));

        Self { points }
    }

    /// Iterates over the points, in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter().map(|point| &**point)
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; populations hold at least one record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Circles stored inline in one contiguous allocation.
///
/// Both dispatch passes read this same storage, so any difference between them is the cost of
/// the call, not of the memory layout.
#[derive(Clone, Debug)]
pub struct ShapePopulation {
    circles: Vec<Circle>,
}

impl ShapePopulation {
    /// Builds `len` circles from `seed`, in index order.
    #[must_use]
    pub fn from_seed(len: NonZero<usize>, seed: impl FnMut(usize) -> Circle) -> Self {
        let mut circles = Vec::with_capacity(len.get());
        circles.extend((0..len.get()).map(seed));

        Self { circles }
    }

    /// Builds a population holding exactly the given radii.
    ///
    /// Returns `None` if `radii` is empty.
    #[must_use]
    pub fn from_radii(radii: &[i64]) -> Option<Self> {
        let len = NonZero::new(radii.len())?;
        let mut radii = radii.iter();

        Some(Self::from_seed(len, |_| {
            Circle::new(*radii.next().expect("seed is called exactly len times"))
        }))
    }

    /// The circles, in index order.
    #[must_use]
    pub fn as_slice(&self) -> &[Circle] {
        &self.circles
    }

    /// Number of circles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.circles.len()
    }

    /// Always `false`; populations hold at least one record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.circles.is_empty()
    }
}

/// Shapes stored as individually boxed trait objects.
///
/// This conflates pointer chasing with dynamic dispatch and exists to reproduce the classic
/// "vector of base class pointers" layout next to the cleaner dispatch-only comparison.
pub struct BoxedShapePopulation {
    shapes: Vec<Box<dyn Shape>>,
}

impl BoxedShapePopulation {
    /// Builds `len` separately allocated circles from `seed`, in index order.
    #[must_use]
    pub fn from_seed(len: NonZero<usize>, mut seed: impl FnMut(usize) -> Circle) -> Self {
        let mut shapes: Vec<Box<dyn Shape>> = Vec::with_capacity(len.get());
        shapes.extend(
            (0..len.get()).map(|index| -> Box<dyn Shape> { Box::new(seed(index)) }),
        );

        Self { shapes }
    }

    /// Iterates over the shapes, in index order.
    pub fn iter(&self) -> slice::Iter<'_, Box<dyn Shape>> {
        self.shapes.iter()
    }

    /// Number of shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Always `false`; populations hold at least one record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl<'a> IntoIterator for &'a BoxedShapePopulation {
    type Item = &'a Box<dyn Shape>;
    type IntoIter = slice::Iter<'a, Box<dyn Shape>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for BoxedShapePopulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedShapePopulation")
            .field("len", &self.shapes.len())
            .finish()
    }
}
