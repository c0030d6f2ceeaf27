use crate::collision::BoundingBox;
use crate::math::{Projection, Ray, Transform, Vector};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A circular collision shape
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Circle {
    /// The radius of the circle
    radius: f32,

    /// Offset of the center from the owning body's position
    offset: Vector,

    /// Last transform the world geometry was built from
    transform: Transform,

    /// World-space center
    world_center: Vector,

    /// Body transform version the world geometry belongs to
    stamp: Option<u64>,
}

impl Circle {
    /// Creates a new circle with the given radius
    pub fn new(radius: f32, offset: Vector) -> Self {
        let mut circle = Self {
            radius: radius.max(0.0),
            offset,
            transform: Transform::identity(),
            world_center: offset,
            stamp: None,
        };
        circle.recalc(&Transform::identity());
        circle
    }

    /// Returns the radius of the circle
    pub fn get_radius(&self) -> f32 {
        self.radius
    }

    /// Sets the radius of the circle
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn get_offset(&self) -> Vector {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vector) {
        self.offset = offset;
        let transform = self.transform;
        self.recalc(&transform);
    }

    pub(crate) fn transform(&self) -> Transform {
        self.transform
    }

    pub(crate) fn stamp(&self) -> Option<u64> {
        self.stamp
    }

    pub(crate) fn set_stamp(&mut self, stamp: Option<u64>) {
        self.stamp = stamp;
    }

    /// Rebuilds the world-space center. The offset follows the body's
    /// position but is not rotated or scaled.
    pub fn recalc(&mut self, transform: &Transform) {
        self.transform = *transform;
        self.world_center = transform.position + self.offset;
    }

    /// World-space center
    #[inline]
    pub fn center(&self) -> Vector {
        self.world_center
    }

    pub fn bounds(&self) -> BoundingBox {
        let c = self.world_center;
        BoundingBox::new(c.x - self.radius, c.y - self.radius, c.x + self.radius, c.y + self.radius)
    }

    pub fn local_bounds(&self) -> BoundingBox {
        let o = self.offset;
        BoundingBox::new(o.x - self.radius, o.y - self.radius, o.x + self.radius, o.y + self.radius)
    }

    /// Returns true if the point is inside or on the circle
    pub fn contains(&self, point: Vector) -> bool {
        self.world_center.distance(&point) <= self.radius
    }

    /// Point on the circle furthest along `direction`
    pub fn furthest_point(&self, direction: Vector) -> Vector {
        self.world_center + direction.normalize() * self.radius
    }

    /// Projects the circle onto a unit axis
    pub fn project(&self, axis: Vector) -> Projection {
        let d = self.world_center.dot(&axis);
        Projection::new(d - self.radius, d + self.radius)
    }

    /// Moment of inertia of a solid disc
    pub fn inertia(&self, mass: f32) -> f32 {
        mass * self.radius * self.radius / 2.0
    }

    /// Casts a ray against the circle, returning the nearest hit at most
    /// `max` along the ray.
    pub fn ray_cast(&self, ray: &Ray, max: f32) -> Option<Vector> {
        // Line-sphere intersection with a unit direction
        let oc = ray.origin - self.world_center;
        let b = ray.direction.dot(&oc);
        let discriminant = b * b - oc.length_squared() + self.radius * self.radius;

        if discriminant < 0.0 || !discriminant.is_finite() {
            return None;
        }

        if discriminant == 0.0 {
            let toi = -b;
            return if toi > 0.0 && toi < max { Some(ray.point_at(toi)) } else { None };
        }

        let root = discriminant.sqrt();
        let toi = [-b - root, -b + root]
            .into_iter()
            .filter(|t| *t >= 0.0)
            .fold(f32::INFINITY, f32::min);

        if toi <= max {
            let hit = ray.point_at(toi);
            if hit.is_valid() {
                return Some(hit);
            }
        }
        None
    }
}
