use crate::collision::BoundingBox;
use crate::math::{Line, Projection, Ray, Transform, Vector};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// A one-sided line segment, used for static boundaries
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Local start point
    begin: Vector,

    /// Local end point
    end: Vector,

    offset: Vector,
    transform: Transform,
    world_begin: Vector,
    world_end: Vector,
    stamp: Option<u64>,
}

impl Edge {
    /// Creates an edge between two points local to the owning body
    pub fn new(begin: Vector, end: Vector) -> Self {
        let mut edge = Self {
            begin,
            end,
            offset: Vector::ZERO,
            transform: Transform::identity(),
            world_begin: begin,
            world_end: end,
            stamp: None,
        };
        edge.recalc(&Transform::identity());
        edge
    }

    pub fn get_begin(&self) -> Vector {
        self.begin
    }

    pub fn get_end(&self) -> Vector {
        self.end
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

    /// Rebuilds the world endpoints. Edges rotate with their body but ignore scale.
    pub fn recalc(&mut self, transform: &Transform) {
        self.transform = *transform;
        let pos = transform.position + self.offset;
        self.world_begin = self.begin.rotate(transform.rotation) + pos;
        self.world_end = self.end.rotate(transform.rotation) + pos;
    }

    /// World-space start point
    pub fn world_begin(&self) -> Vector {
        self.world_begin
    }

    /// World-space end point
    pub fn world_end(&self) -> Vector {
        self.world_end
    }

    /// Midpoint of the world segment
    pub fn center(&self) -> Vector {
        self.world_begin.average(&self.world_end)
    }

    /// Unit direction from begin to end
    pub fn slope(&self) -> Vector {
        (self.world_end - self.world_begin).normalize()
    }

    pub fn length(&self) -> f32 {
        self.world_begin.distance(&self.world_end)
    }

    /// World-space segment
    pub fn as_line(&self) -> Line {
        Line::new(self.world_begin, self.world_end)
    }

    /// Segment in local coordinates
    pub fn as_local_line(&self) -> Line {
        Line::new(self.begin, self.end)
    }

    /// Separating axes: the normal and the direction, both ways
    pub fn axes(&self) -> [Vector; 4] {
        let normal = (self.world_end - self.world_begin).normal();
        let along = normal.normal();
        [normal, -normal, along, -along]
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.world_begin.x.min(self.world_end.x),
            self.world_begin.y.min(self.world_end.y),
            self.world_begin.x.max(self.world_end.x),
            self.world_begin.y.max(self.world_end.y),
        )
    }

    pub fn local_bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.begin.x.min(self.end.x),
            self.begin.y.min(self.end.y),
            self.begin.x.max(self.end.x),
            self.begin.y.max(self.end.y),
        )
        .translate(self.offset)
    }

    /// Edges have no area and contain nothing
    pub fn contains(&self, _point: Vector) -> bool {
        false
    }

    /// Endpoint furthest along `direction`
    pub fn furthest_point(&self, direction: Vector) -> Vector {
        if direction.dot(&self.world_begin) > direction.dot(&self.world_end) {
            self.world_begin
        } else {
            self.world_end
        }
    }

    pub fn project(&self, axis: Vector) -> Projection {
        let a = self.world_begin.dot(&axis);
        let b = self.world_end.dot(&axis);
        Projection::new(a.min(b), a.max(b))
    }

    /// Moment of inertia of a thin rod about its center
    pub fn inertia(&self, mass: f32) -> f32 {
        let half = self.length() / 2.0;
        mass * half * half
    }

    /// Segment-segment intersection of the ray with the edge, within `max`
    pub fn ray_cast(&self, ray: &Ray, max: f32) -> Option<Vector> {
        let numerator = self.world_begin - ray.origin;
        let slope = self.slope();
        let divisor = ray.direction.cross(&slope);

        // Parallel lines never yield a single crossing
        if divisor == 0.0 {
            return None;
        }

        let t = numerator.cross(&slope) / divisor;
        if !(0.0..=max).contains(&t) {
            return None;
        }

        let u = numerator.cross(&ray.direction) / divisor / self.length();
        if (0.0..=1.0).contains(&u) {
            let hit = ray.point_at(t);
            if hit.is_valid() {
                return Some(hit);
            }
        }
        None
    }
}
