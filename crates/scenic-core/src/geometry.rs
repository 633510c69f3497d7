//! Geometric primitives for scene layout and scoring.
//!
//! This module provides the geometric types shared by the layout simulator
//! and the quality scorer.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate or vector in scene space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Scenic uses the same coordinate system as SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Object positions are center-anchored. Rotation is never taken into account
//! here: overlap and clipping are computed on axis-aligned rectangles.

/// Lengths below this value are treated as zero when normalizing vectors.
pub const DISTANCE_EPSILON: f64 = 1e-6;

/// A 2D point representing a position (or a displacement) in scene space.
///
/// # Examples
///
/// ```
/// # use scenic_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(13.0, 24.0);
///
/// assert_eq!(p1.distance(p2), 5.0);
/// assert_eq!(p2.sub_point(p1), Point::new(3.0, 4.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Checks if both coordinates are finite (neither NaN nor infinite)
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Calculates the hypotenuse (Euclidean length of the vector)
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Squared length of the vector
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Point) -> f64 {
        self.sub_point(other).hypot()
    }

    /// Dot product of two vectors
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Returns the unit vector in the same direction, or the zero vector when
    /// the length is below [`DISTANCE_EPSILON`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use scenic_core::geometry::Point;
    /// assert_eq!(Point::new(0.0, 8.0).normalize_or_zero(), Point::new(0.0, 1.0));
    /// assert!(Point::new(1e-9, 0.0).normalize_or_zero().is_zero());
    /// ```
    pub fn normalize_or_zero(self) -> Self {
        let length = self.hypot();
        if length < DISTANCE_EPSILON || !length.is_finite() {
            return Self::default();
        }
        self.scale(1.0 / length)
    }

    /// Unit vector pointing along `degrees`, measured clockwise from +X in
    /// screen coordinates.
    pub fn from_angle_degrees(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self {
            x: radians.cos(),
            y: radians.sin(),
        }
    }

    /// Converts a point and size into a bounds rectangle
    ///
    /// The point is treated as the center of the bounds.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    /// Returns the area covered by this size
    pub fn area(self) -> f64 {
        self.width * self.height
    }

    /// Returns true if both width and height are strictly positive
    pub fn is_positive(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Represents an axis-aligned rectangle with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns the area of the bounds
    pub fn area(self) -> f64 {
        self.width() * self.height()
    }

    /// Area of the intersection of two rectangles, zero when they only touch
    /// or do not meet at all.
    ///
    /// # Examples
    ///
    /// ```
    /// # use scenic_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    /// let b = Bounds::new_from_top_left(Point::new(5.0, 5.0), Size::new(10.0, 10.0));
    /// assert_eq!(a.overlap_area(&b), 25.0);
    /// ```
    pub fn overlap_area(&self, other: &Self) -> f64 {
        let overlap_x = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let overlap_y = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            return 0.0;
        }
        overlap_x * overlap_y
    }

    /// Returns true if `other` lies entirely inside these bounds (edges inclusive)
    pub fn contains_bounds(&self, other: &Self) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// Clamps the center of a rectangle of `size` so that the rectangle lies
    /// inside these bounds.
    ///
    /// When the rectangle is larger than the bounds along an axis, it is
    /// centered on that axis instead.
    ///
    /// # Examples
    ///
    /// ```
    /// # use scenic_core::geometry::{Bounds, Point, Size};
    /// let canvas = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
    /// let clamped = canvas.clamp_center(Point::new(-20.0, 97.0), Size::new(10.0, 20.0));
    /// assert_eq!(clamped, Point::new(5.0, 90.0));
    /// ```
    pub fn clamp_center(&self, center: Point, size: Size) -> Point {
        Point::new(
            clamp_axis(center.x, size.width / 2.0, self.min_x, self.max_x),
            clamp_axis(center.y, size.height / 2.0, self.min_y, self.max_y),
        )
    }

    /// Returns true if the segment from `start` to `end` passes through the
    /// interior or the border of these bounds.
    ///
    /// Uses Liang–Barsky clipping of the parametric segment against the four
    /// slabs of the rectangle.
    pub fn intersects_segment(&self, start: Point, end: Point) -> bool {
        let delta = end.sub_point(start);
        let mut t_enter: f64 = 0.0;
        let mut t_exit: f64 = 1.0;

        let slabs = [
            (-delta.x, start.x - self.min_x),
            (delta.x, self.max_x - start.x),
            (-delta.y, start.y - self.min_y),
            (delta.y, self.max_y - start.y),
        ];

        for (p, q) in slabs {
            if p == 0.0 {
                // Parallel to this slab: reject when outside of it
                if q < 0.0 {
                    return false;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t_enter = t_enter.max(t);
            } else {
                t_exit = t_exit.min(t);
            }
            if t_enter > t_exit {
                return false;
            }
        }

        true
    }
}

fn clamp_axis(center: f64, half_extent: f64, min: f64, max: f64) -> f64 {
    let low = min + half_extent;
    let high = max - half_extent;
    if low > high {
        (min + max) / 2.0
    } else {
        center.clamp(low, high)
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f64..1000.0,
            -1000.0f64..1000.0,
            1.0f64..500.0,
            1.0f64..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn fraction_strategy() -> impl Strategy<Value = (f64, f64)> {
        (0.01f64..1.0, 0.01f64..1.0)
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Overlap area is symmetric and never exceeds the smaller rectangle.
    fn check_overlap_is_symmetric_and_bounded(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let forward = b1.overlap_area(&b2);
        let backward = b2.overlap_area(&b1);

        prop_assert!(approx_eq!(f64, forward, backward));
        prop_assert!(forward >= 0.0);
        prop_assert!(forward <= b1.area().min(b2.area()) + 1e-6);
        Ok(())
    }

    /// A clamped rectangle that fits the canvas always lies inside it.
    fn check_clamp_keeps_rectangle_inside(
        canvas: Bounds,
        center: Point,
        fraction: (f64, f64),
    ) -> Result<(), TestCaseError> {
        let size = Size::new(canvas.width() * fraction.0, canvas.height() * fraction.1);

        let clamped = canvas.clamp_center(center, size);
        let rect = clamped.to_bounds(size);

        prop_assert!(rect.min_x() >= canvas.min_x() - 1e-9);
        prop_assert!(rect.min_y() >= canvas.min_y() - 1e-9);
        prop_assert!(rect.max_x() <= canvas.max_x() + 1e-9);
        prop_assert!(rect.max_y() <= canvas.max_y() + 1e-9);
        Ok(())
    }

    /// Normalized vectors have unit length unless they collapse to zero.
    fn check_normalize_is_unit_or_zero(p: Point) -> Result<(), TestCaseError> {
        let unit = p.normalize_or_zero();
        if unit.is_zero() {
            prop_assert!(p.hypot() < DISTANCE_EPSILON);
        } else {
            prop_assert!(approx_eq!(f64, unit.hypot(), 1.0, epsilon = 1e-9));
        }
        Ok(())
    }

    /// A segment between a point inside the rectangle and any other point hits it.
    fn check_segment_from_center_hits(bounds: Bounds, other: Point) -> Result<(), TestCaseError> {
        prop_assert!(bounds.intersects_segment(bounds.center(), other));
        prop_assert!(bounds.intersects_segment(other, bounds.center()));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn overlap_is_symmetric_and_bounded(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_overlap_is_symmetric_and_bounded(b1, b2)?;
        }

        #[test]
        fn clamp_keeps_rectangle_inside(canvas in bounds_strategy(), center in point_strategy(), fraction in fraction_strategy()) {
            check_clamp_keeps_rectangle_inside(canvas, center, fraction)?;
        }

        #[test]
        fn normalize_is_unit_or_zero(p in point_strategy()) {
            check_normalize_is_unit_or_zero(p)?;
        }

        #[test]
        fn segment_from_center_hits(bounds in bounds_strategy(), other in point_strategy()) {
            check_segment_from_center_hits(bounds, other)?;
        }
    }
}
