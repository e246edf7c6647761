//! The records that benchmark populations are made of.

use std::mem::size_of;

/// The approximation of pi used by [`Circle`] area calculations.
#[expect(
    clippy::approx_constant,
    reason = "five decimals, matching the published results these benchmarks reproduce"
)]
pub const PI_APPROX: f64 = 3.14159;

/// A trivial two-coordinate record.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "a plain coordinate pair, adding fields would change what the benchmarks measure"
)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Point {
    /// The default seed: both coordinates equal to the index.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in `i64`, which no realistic population reaches.
    #[must_use]
    pub fn diagonal(index: usize) -> Self {
        let value = i64::try_from(index).expect("population index fits in i64");
        Self { x: value, y: value }
    }

    /// The value every pointer chasing pass accumulates per element.
    #[inline]
    #[must_use]
    pub fn coordinate_sum(&self) -> i64 {
        self.x.wrapping_add(self.y)
    }
}

/// Number of filler words carried by a [`PaddedPoint`].
pub const PADDING_WORDS: usize = 10;

/// A [`Point`] with a fixed filler payload.
///
/// The payload makes the record large enough that allocators cannot serve it from their
/// smallest size classes, which keeps the allocation benchmarks honest.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[expect(
    clippy::exhaustive_structs,
    reason = "the layout is the point of this type"
)]
pub struct PaddedPoint {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
    /// Filler, zero unless a test says otherwise.
    pub data: [i64; PADDING_WORDS],
}

impl PaddedPoint {
    /// Size of one record in bytes, as reported in the realistic allocation header.
    pub const SIZE_BYTES: usize = size_of::<Self>();

    /// A zero-filled record with both coordinates equal to the index.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in `i64`.
    #[must_use]
    pub fn diagonal(index: usize) -> Self {
        let Point { x, y } = Point::diagonal(index);

        Self {
            x,
            y,
            data: [0; PADDING_WORDS],
        }
    }

    /// Sum of every field, payload included.
    #[must_use]
    pub fn field_sum(&self) -> i64 {
        self.data
            .iter()
            .fold(self.x.wrapping_add(self.y), |acc, word| acc.wrapping_add(*word))
    }
}

/// Something with an area, resolved at runtime when called through `&dyn Shape`.
pub trait Shape {
    /// Area of the shape.
    fn area(&self) -> f64;
}

/// A circle with an integer radius.
///
/// The inherent [`Circle::area()`] is the statically dispatched twin of the [`Shape`]
/// implementation; both compute exactly the same expression.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Circle {
    radius: i64,
}

impl Circle {
    /// Creates a circle with the given radius.
    #[must_use]
    pub const fn new(radius: i64) -> Self {
        Self { radius }
    }

    /// The default seed: radius equal to the index.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in `i64`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::new(i64::try_from(index).expect("population index fits in i64"))
    }

    /// Radius of the circle.
    #[must_use]
    pub const fn radius(&self) -> i64 {
        self.radius
    }

    /// Area of the circle, resolved at compile time.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "radii stay far below 2^52 in every benchmark"
    )]
    pub fn area(&self) -> f64 {
        let radius = self.radius as f64;
        PI_APPROX * radius * radius
    }
}

impl Shape for Circle {
    #[inline]
    fn area(&self) -> f64 {
        Self::area(self)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn diagonal_point_repeats_index() {
        assert_eq!(Point::diagonal(7), Point { x: 7, y: 7 });
        assert_eq!(Point::diagonal(7).coordinate_sum(), 14);
    }

    #[test]
    fn padded_point_sums_every_field() {
        let mut point = PaddedPoint::diagonal(3);
        assert_eq!(point.field_sum(), 6);

        point.data[9] = 4;
        assert_eq!(point.field_sum(), 10);
    }

    #[test]
    fn padded_point_is_larger_than_point() {
        assert_eq!(PaddedPoint::SIZE_BYTES, 96);
        assert!(PaddedPoint::SIZE_BYTES > size_of::<Point>());
    }

    #[test]
    fn pi_approx_keeps_five_decimals() {
        assert!(PI_APPROX < std::f64::consts::PI);
        assert!((std::f64::consts::PI - PI_APPROX) < 1e-5);
        assert!((Circle::new(1).area() - PI_APPROX).abs() < 1e-12);
    }

    #[test]
    fn dynamic_and_static_area_agree() {
        let circle = Circle::new(3);
        let shape: &dyn Shape = &circle;

        assert!((shape.area() - circle.area()).abs() < 1e-12);
        assert!((circle.area() - 9.0 * PI_APPROX).abs() < 1e-12);
    }
}
