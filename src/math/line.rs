use crate::math::Vector;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Line {
    /// Start of the segment
    pub begin: Vector,

    /// End of the segment
    pub end: Vector,
}

impl Line {
    /// Creates a new line segment
    #[inline]
    pub fn new(begin: Vector, end: Vector) -> Self {
        Self { begin, end }
    }

    /// Slope of the line as `dy / dx`. Infinite for vertical lines.
    #[inline]
    pub fn slope(&self) -> f32 {
        (self.end.y - self.begin.y) / (self.end.x - self.begin.x)
    }

    /// Y-intercept of the infinite line through the segment
    #[inline]
    pub fn intercept(&self) -> f32 {
        self.begin.y - self.slope() * self.begin.x
    }

    /// Unit normal of the segment
    #[inline]
    pub fn normal(&self) -> Vector {
        self.edge().normal()
    }

    /// Unit vector from `begin` toward `end`.
    ///
    /// Undefined (returned as zero) for a zero-length segment.
    #[inline]
    pub fn direction(&self) -> Vector {
        self.edge().normalize()
    }

    /// The raw vector `end - begin`
    #[inline]
    pub fn edge(&self) -> Vector {
        self.end - self.begin
    }

    /// Length of the segment
    #[inline]
    pub fn length(&self) -> f32 {
        self.begin.distance(&self.end)
    }

    /// Midpoint of the segment
    #[inline]
    pub fn midpoint(&self) -> Vector {
        self.begin.average(&self.end)
    }

    /// Returns the same segment with its endpoints swapped
    #[inline]
    pub fn flip(&self) -> Self {
        Self::new(self.end, self.begin)
    }

    /// Returns true if the segment has (approximately) no length
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.edge().is_zero()
    }

    /// Perpendicular distance from a point to the infinite line through the segment
    pub fn distance_to_point(&self, point: Vector) -> f32 {
        let length = self.length();
        if length <= crate::math::EPSILON {
            return self.begin.distance(&point);
        }

        let dy = self.end.y - self.begin.y;
        let dx = self.end.x - self.begin.x;
        let numerator = (dy * point.x - dx * point.y + self.end.x * self.begin.y - self.end.y * self.begin.x).abs();
        numerator / length
    }

    /// Vector from the closest point on the infinite line to `point`
    pub fn find_vector_to_point(&self, point: Vector) -> Vector {
        let direction = self.direction();
        let along = (point - self.begin).dot(&direction);
        point - (self.begin + direction * along)
    }

    /// Returns true if `point` lies on the segment within `threshold`
    pub fn has_point(&self, point: Vector, threshold: f32) -> bool {
        let to_point = point - self.begin;
        let edge = self.edge();

        if to_point.cross(&edge).abs() > threshold {
            return false;
        }

        if edge.x.abs() >= edge.y.abs() {
            if edge.x > 0.0 {
                self.begin.x <= point.x && point.x <= self.end.x
            } else {
                self.end.x <= point.x && point.x <= self.begin.x
            }
        } else if edge.y > 0.0 {
            self.begin.y <= point.y && point.y <= self.end.y
        } else {
            self.end.y <= point.y && point.y <= self.begin.y
        }
    }

    /// Point on the infinite line with the given x, if the line is not vertical
    pub fn point_at_x(&self, x: f32) -> Option<Vector> {
        let slope = self.slope();
        if !slope.is_finite() {
            return None;
        }
        Some(Vector::new(x, slope * x + self.intercept()))
    }

    /// Point on the infinite line with the given y, if the line is not horizontal
    pub fn point_at_y(&self, y: f32) -> Option<Vector> {
        let slope = self.slope();
        if !slope.is_finite() || crate::math::approx_zero(slope) {
            return None;
        }
        Some(Vector::new((y - self.intercept()) / slope, y))
    }
}
