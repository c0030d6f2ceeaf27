use crate::math::{Vector, Line};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Ray representation for intersection tests
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Ray {
    /// Origin of the ray
    pub origin: Vector,

    /// Unit direction of the ray
    pub direction: Vector,
}

impl Ray {
    /// Creates a new ray, normalizing the direction
    #[inline]
    pub fn new(origin: Vector, direction: Vector) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Returns the point at a given time along the ray
    #[inline]
    pub fn point_at(&self, t: f32) -> Vector {
        self.origin + self.direction * t
    }

    /// Returns a copy of the ray with its origin moved along the direction
    #[inline]
    pub fn advanced(&self, distance: f32) -> Self {
        Self {
            origin: self.point_at(distance),
            direction: self.direction,
        }
    }

    /// Tests the ray against a line segment.
    ///
    /// Returns the intersection time `t >= 0`, or `-1.0` when the ray never
    /// reaches the segment (behind the origin, parallel, or degenerate).
    pub fn intersect(&self, line: &Line) -> f32 {
        let length = line.length();
        if length <= crate::math::EPSILON {
            return -1.0;
        }

        let numerator = line.begin - self.origin;
        let slope = line.direction();
        let divisor = self.direction.cross(&slope);

        // Parallel, collinear or not, never yields a single crossing
        if divisor == 0.0 {
            return -1.0;
        }

        let t = numerator.cross(&slope) / divisor;
        if t.is_finite() && t >= 0.0 {
            let u = numerator.cross(&self.direction) / divisor / length;
            if (0.0..=1.0).contains(&u) {
                return t;
            }
        }

        -1.0
    }

    /// Returns the closest point on the ray to a given point
    pub fn closest_point(&self, point: Vector) -> Vector {
        let project_length = (point - self.origin).dot(&self.direction);

        if project_length < 0.0 {
            return self.origin;
        }

        self.origin + self.direction * project_length
    }

    /// Returns the distance from the ray to a point
    #[inline]
    pub fn distance_to_point(&self, point: Vector) -> f32 {
        (point - self.closest_point(point)).length()
    }
}
